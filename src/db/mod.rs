// Re-export the Database struct and row types
mod article;
mod core;

pub use self::article::{NewArticle, PersistedArticle};
pub use self::core::Database;
