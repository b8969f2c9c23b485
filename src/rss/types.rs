//! Type definitions and constants for the feed module.

use chrono::{DateTime, Utc};
use tokio::time::Duration;

/// A single configured feed within a category.
#[derive(Debug, Clone, Copy)]
pub struct FeedSource {
    pub name: &'static str,
    pub url: &'static str,
}

/// A candidate news item handed to the pipeline. Immutable for the
/// duration of one pipeline pass; `url` is the unique key.
#[derive(Debug, Clone)]
pub struct CandidateItem {
    pub title: String,
    pub content: String,
    pub source_name: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

// Constants
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const SOURCE_FETCH_PAUSE: Duration = Duration::from_millis(300);
pub const MAX_ITEMS_PER_SOURCE: usize = 3;
pub const MIN_CONTENT_CHARS: usize = 50;
