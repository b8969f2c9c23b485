//! Sequential generate-score-publish loop over candidate items.
//!
//! The generation backend is rate limited, so everything here is strictly
//! serial: one category at a time, one item at a time, one attempt at a
//! time, with explicit pauses between generation calls. Those pauses are
//! the concurrency control; there is nothing else to coordinate.

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Duration, Instant};
use tracing::{error, info, warn};

use crate::db::{Database, NewArticle};
use crate::llm::LlmError;
use crate::originality::{check_age, run_checks, SemanticCheck};
use crate::rewrite::{RewriteAttempt, Rewriter};
use crate::rss::CandidateItem;
use crate::{TARGET_DB, TARGET_LLM_REQUEST};

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "general",
    "technology",
    "business",
    "science",
    "health",
    "sports",
    "entertainment",
    "world",
    "politics",
    "environment",
];

/// Narrow seam over the feed collaborator.
#[async_trait]
pub trait CandidateFeed {
    async fn fetch(&self, category: &str) -> Result<Vec<CandidateItem>>;
}

/// Knobs for one pipeline run. The defaults stay well under a
/// requests-per-minute generation quota.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub categories: Vec<String>,
    pub max_articles_per_run: usize,
    pub max_retries: u32,
    pub delay_between_calls: Duration,
    pub rate_limit_cooldown: Duration,
    pub item_deadline: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            max_articles_per_run: 100,
            max_retries: 2,
            delay_between_calls: Duration::from_secs(5),
            rate_limit_cooldown: Duration::from_secs(60),
            item_deadline: Duration::from_secs(300),
        }
    }
}

/// Counters reported at the end of a run. `attempted` counts items that
/// reached the generation backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub published: usize,
    pub skipped: usize,
}

enum ItemOutcome {
    Published,
    Skipped,
}

/// Run the pipeline once over every configured category.
pub async fn run(
    db: &Database,
    feed: &impl CandidateFeed,
    rewriter: &impl Rewriter,
    semantic: &SemanticCheck,
    config: &PipelineConfig,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for category in &config.categories {
        if summary.attempted >= config.max_articles_per_run {
            warn!(
                "Reached limit of {} articles for this run",
                config.max_articles_per_run
            );
            break;
        }

        info!("Processing category: {}", category);

        let items = match feed.fetch(category).await {
            Ok(items) => items,
            Err(err) => {
                error!("Failed to fetch candidates for {}: {}", category, err);
                continue;
            }
        };
        info!("Found {} candidate items in {}", items.len(), category);

        for item in items {
            if summary.attempted >= config.max_articles_per_run {
                break;
            }

            match db.article_exists(&item.url).await {
                Ok(true) => {
                    summary.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    // Ambiguous state: never risk a double publish.
                    warn!(target: TARGET_DB, "Dedup lookup failed for {}, skipping: {}", item.url, err);
                    summary.skipped += 1;
                    continue;
                }
            }

            let age = check_age(item.published_at);
            if !age.passed {
                info!(
                    "Too new ({}h of {}h): {}",
                    age.age_hours, age.required_hours, item.url
                );
                summary.skipped += 1;
                continue;
            }

            summary.attempted += 1;
            match process_item(db, rewriter, semantic, config, category, &item).await {
                ItemOutcome::Published => summary.published += 1,
                ItemOutcome::Skipped => summary.skipped += 1,
            }

            // Primary request-rate control: pause after every item that
            // reached the generation backend.
            sleep(config.delay_between_calls).await;
        }
    }

    info!(
        "Run complete: attempted {}, published {}, skipped {}",
        summary.attempted, summary.published, summary.skipped
    );
    summary
}

async fn process_item(
    db: &Database,
    rewriter: &impl Rewriter,
    semantic: &SemanticCheck,
    config: &PipelineConfig,
    category: &str,
    item: &CandidateItem,
) -> ItemOutcome {
    let started = Instant::now();

    for attempt in 1..=config.max_retries {
        if started.elapsed() >= config.item_deadline {
            warn!(
                "Abandoning {} after {:?} without an accepted rewrite",
                item.url,
                started.elapsed()
            );
            break;
        }

        info!(target: TARGET_LLM_REQUEST, "Generating rewrite (attempt {}): {}", attempt, item.url);

        let rewrite = match rewriter.generate(item, attempt).await {
            Ok(rewrite) => rewrite,
            Err(LlmError::RateLimited) => {
                warn!(
                    target: TARGET_LLM_REQUEST,
                    "Rate limited, cooling down for {:?}", config.rate_limit_cooldown
                );
                sleep(config.rate_limit_cooldown).await;
                continue;
            }
            Err(err) => {
                warn!(target: TARGET_LLM_REQUEST, "Generation attempt {} failed: {}", attempt, err);
                if attempt < config.max_retries {
                    sleep(config.delay_between_calls).await;
                }
                continue;
            }
        };

        // Score against the source content, not the headline.
        let checks = run_checks(&item.content, &rewrite.summary, semantic).await;
        if checks.passed {
            return match publish(db, category, item, &rewrite).await {
                Ok(()) => {
                    info!("Published rewrite of {}", item.url);
                    ItemOutcome::Published
                }
                Err(err) => {
                    error!(target: TARGET_DB, "Failed to store article {}: {}", item.url, err);
                    ItemOutcome::Skipped
                }
            };
        }

        warn!(
            "Rewrite too similar ({}): {}",
            checks.warnings.join(", "),
            item.url
        );
        if attempt < config.max_retries {
            sleep(config.delay_between_calls).await;
        }
    }

    ItemOutcome::Skipped
}

async fn publish(
    db: &Database,
    category: &str,
    item: &CandidateItem,
    rewrite: &RewriteAttempt,
) -> Result<(), sqlx::Error> {
    db.insert_article(&NewArticle {
        source_url: &item.url,
        original_headline: &item.title,
        source_name: &item.source_name,
        headline: &rewrite.headline,
        summary: &rewrite.summary,
        category,
        published_at: &item.published_at.to_rfc3339(),
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    const SOURCE_TEXT: &str =
        "The cat sat on the mat near the old oak tree by the river bank and watched the water";

    fn item(url: &str, age_hours: i64) -> CandidateItem {
        CandidateItem {
            title: "Quiet riverside afternoon observed".to_string(),
            content: SOURCE_TEXT.to_string(),
            source_name: "BBC News".to_string(),
            url: url.to_string(),
            published_at: Utc::now() - chrono::Duration::hours(age_hours),
        }
    }

    fn fast_config(categories: &[&str]) -> PipelineConfig {
        PipelineConfig {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            max_articles_per_run: 100,
            max_retries: 2,
            delay_between_calls: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
            item_deadline: Duration::from_secs(300),
        }
    }

    /// Feed serving canned items and recording which categories were asked.
    struct StaticFeed {
        items: HashMap<String, Vec<CandidateItem>>,
        queried: Mutex<Vec<String>>,
    }

    impl StaticFeed {
        fn new(items: HashMap<String, Vec<CandidateItem>>) -> Self {
            Self {
                items,
                queried: Mutex::new(Vec::new()),
            }
        }

        fn single(category: &str, items: Vec<CandidateItem>) -> Self {
            Self::new(HashMap::from([(category.to_string(), items)]))
        }
    }

    #[async_trait]
    impl CandidateFeed for StaticFeed {
        async fn fetch(&self, category: &str) -> Result<Vec<CandidateItem>> {
            self.queried.lock().unwrap().push(category.to_string());
            Ok(self.items.get(category).cloned().unwrap_or_default())
        }
    }

    /// Rewriter that parrots the source content back; every attempt fails
    /// the literal check.
    struct VerbatimRewriter {
        calls: AtomicU32,
    }

    impl VerbatimRewriter {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Rewriter for VerbatimRewriter {
        async fn generate(
            &self,
            item: &CandidateItem,
            attempt: u32,
        ) -> Result<RewriteAttempt, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RewriteAttempt {
                headline: item.title.clone(),
                summary: item.content.clone(),
                attempt,
            })
        }
    }

    /// Rewriter that produces an acceptably original summary, optionally
    /// after a scripted number of failures.
    struct FreshRewriter {
        calls: AtomicU32,
        failures_before_success: u32,
        failure: fn() -> LlmError,
    }

    impl FreshRewriter {
        fn new() -> Self {
            Self::failing_first(0, || LlmError::Backend("unused".to_string()))
        }

        fn failing_first(failures: u32, failure: fn() -> LlmError) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures_before_success: failures,
                failure,
            }
        }
    }

    #[async_trait]
    impl Rewriter for FreshRewriter {
        async fn generate(
            &self,
            _item: &CandidateItem,
            attempt: u32,
        ) -> Result<RewriteAttempt, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err((self.failure)());
            }
            Ok(RewriteAttempt {
                headline: "Lazy afternoon unfolds beside local waterway".to_string(),
                summary: "Witnesses recalled an uneventful scene! Nothing disturbed anyone."
                    .to_string(),
                attempt,
            })
        }
    }

    #[tokio::test]
    async fn verbatim_rewrite_is_rejected_and_retried() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/a", 72)]);
        let rewriter = VerbatimRewriter::new();

        let summary = run(
            &db,
            &feed,
            &rewriter,
            &SemanticCheck::disabled(),
            &fast_config(&["general"]),
        )
        .await;

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.published, 0);
        assert_eq!(summary.skipped, 1);
        // Both configured attempts were spent on the copy.
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 2);
        assert!(!db.article_exists("https://example.com/a").await.unwrap());
    }

    #[tokio::test]
    async fn too_recent_item_skips_without_any_generation_call() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/b", 10)]);
        let rewriter = FreshRewriter::new();

        let summary = run(
            &db,
            &feed,
            &rewriter,
            &SemanticCheck::disabled(),
            &fast_config(&["general"]),
        )
        .await;

        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn acceptable_rewrite_is_published() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/c", 72)]);
        let rewriter = FreshRewriter::new();

        let summary = run(
            &db,
            &feed,
            &rewriter,
            &SemanticCheck::disabled(),
            &fast_config(&["general"]),
        )
        .await;

        assert_eq!(summary.published, 1);
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 1);
        assert!(db.article_exists("https://example.com/c").await.unwrap());

        let stored = db.get_articles("general", 10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].original_headline, "Quiet riverside afternoon observed");
        assert_eq!(stored[0].headline, "Lazy afternoon unfolds beside local waterway");
    }

    #[tokio::test]
    async fn already_published_item_is_skipped_as_duplicate() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/d", 72)]);
        let rewriter = FreshRewriter::new();
        let config = fast_config(&["general"]);

        run(&db, &feed, &rewriter, &SemanticCheck::disabled(), &config).await;
        let second = run(&db, &feed, &rewriter, &SemanticCheck::disabled(), &config).await;

        assert_eq!(second.attempted, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn run_budget_stops_before_querying_further_categories() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::new(HashMap::from([
            ("general".to_string(), vec![item("https://example.com/e", 72)]),
            ("science".to_string(), vec![item("https://example.com/f", 72)]),
        ]));
        let rewriter = FreshRewriter::new();
        let mut config = fast_config(&["general", "science"]);
        config.max_articles_per_run = 1;

        let summary = run(&db, &feed, &rewriter, &SemanticCheck::disabled(), &config).await;

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.published, 1);
        assert_eq!(*feed.queried.lock().unwrap(), vec!["general".to_string()]);
    }

    #[tokio::test]
    async fn rate_limited_attempt_cools_down_and_retries() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/g", 72)]);
        let rewriter = FreshRewriter::failing_first(1, || LlmError::RateLimited);

        let summary = run(
            &db,
            &feed,
            &rewriter,
            &SemanticCheck::disabled(),
            &fast_config(&["general"]),
        )
        .await;

        assert_eq!(summary.published, 1);
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn generation_failures_exhaust_retries_into_a_skip() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/h", 72)]);
        let rewriter =
            FreshRewriter::failing_first(2, || LlmError::Backend("boom".to_string()));

        let summary = run(
            &db,
            &feed,
            &rewriter,
            &SemanticCheck::disabled(),
            &fast_config(&["general"]),
        )
        .await;

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.published, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_item_deadline_abandons_remaining_attempts() {
        let db = Database::open_in_memory().await.unwrap();
        let feed = StaticFeed::single("general", vec![item("https://example.com/i", 72)]);
        let rewriter = FreshRewriter::new();
        let mut config = fast_config(&["general"]);
        config.item_deadline = Duration::ZERO;

        let summary = run(&db, &feed, &rewriter, &SemanticCheck::disabled(), &config).await;

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.published, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(rewriter.calls.load(Ordering::SeqCst), 0);
    }
}
