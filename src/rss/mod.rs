//! Candidate ingestion from configured news feeds.
//!
//! This is plumbing in front of the pipeline: each category maps to a
//! small set of feed sources, and a failing source degrades to zero items
//! rather than failing the category.

mod fetcher;
mod sources;
mod types;
mod util;

pub use self::fetcher::RssFeed;
pub use self::sources::sources_for;
pub use self::types::{CandidateItem, FeedSource};
pub use self::util::{clean_text, is_valid_url};
