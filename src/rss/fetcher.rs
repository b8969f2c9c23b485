//! Fetching and parsing of the configured feeds into candidate items.

use anyhow::Result;
use async_trait::async_trait;
use feed_rs::parser;
use reqwest::header;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use super::sources::sources_for;
use super::types::{
    CandidateItem, FeedSource, MAX_ITEMS_PER_SOURCE, MIN_CONTENT_CHARS, REQUEST_TIMEOUT,
    SOURCE_FETCH_PAUSE,
};
use super::util::{clean_text, is_valid_url};
use crate::pipeline::CandidateFeed;
use crate::TARGET_WEB_REQUEST;

const USER_AGENT: &str = "recast-bot/0.3";

/// Feed collaborator backed by the per-category source table.
pub struct RssFeed {
    client: reqwest::Client,
}

impl RssFeed {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self { client })
    }

    async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<CandidateItem>> {
        if !is_valid_url(source.url) {
            return Err(anyhow::anyhow!("invalid feed URL: {}", source.url));
        }

        debug!(target: TARGET_WEB_REQUEST, "Loading feed from {}", source.url);

        let response = timeout(
            REQUEST_TIMEOUT,
            self.client
                .get(source.url)
                .header(header::USER_AGENT, USER_AGENT)
                .send(),
        )
        .await
        .map_err(|_| anyhow::anyhow!("request to {} timed out", source.url))??;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "status {} from {}",
                response.status(),
                source.url
            ));
        }

        let body = response.text().await?;
        let feed = parser::parse(body.as_bytes())?;

        let mut items = Vec::new();
        for entry in feed.entries {
            let title = match entry.title {
                Some(title) => clean_text(&title.content),
                None => continue,
            };
            let url = match entry.links.first() {
                Some(link) => link.href.clone(),
                None => continue,
            };
            let content = entry
                .summary
                .map(|text| clean_text(&text.content))
                .or_else(|| entry.content.and_then(|c| c.body).map(|b| clean_text(&b)))
                .unwrap_or_default();
            // An unparseable publication date is a data error; the age
            // gate never sees such items.
            let published_at = match entry.published.or(entry.updated) {
                Some(date) => date,
                None => {
                    debug!(target: TARGET_WEB_REQUEST, "Dropping undated entry from {}: {}", source.name, url);
                    continue;
                }
            };

            if title.is_empty() || content.chars().count() < MIN_CONTENT_CHARS {
                continue;
            }

            items.push(CandidateItem {
                title,
                content,
                source_name: source.name.to_string(),
                url,
                published_at,
            });
            if items.len() >= MAX_ITEMS_PER_SOURCE {
                break;
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl CandidateFeed for RssFeed {
    async fn fetch(&self, category: &str) -> Result<Vec<CandidateItem>> {
        let mut items = Vec::new();

        for source in sources_for(category) {
            // One broken source must not cost the category its other feeds.
            match self.fetch_source(source).await {
                Ok(mut found) => {
                    debug!(target: TARGET_WEB_REQUEST, "{}: {} usable entries", source.name, found.len());
                    items.append(&mut found);
                }
                Err(err) => {
                    warn!(target: TARGET_WEB_REQUEST, "{}: {}", source.name, err);
                }
            }
            sleep(SOURCE_FETCH_PAUSE).await;
        }

        Ok(items)
    }
}
