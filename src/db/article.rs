use serde::Serialize;
use sqlx::FromRow;
use tracing::debug;

use super::core::Database;
use crate::TARGET_DB;

/// A published rewrite, as stored and as served by the read API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PersistedArticle {
    pub id: i64,
    pub source_url: String,
    pub original_headline: String,
    pub source_name: String,
    pub headline: String,
    pub summary: String,
    pub category: String,
    pub published_at: String,
    pub created_at: Option<String>,
}

/// Fields of a newly accepted rewrite, keyed on the immutable source URL.
#[derive(Debug, Clone)]
pub struct NewArticle<'a> {
    pub source_url: &'a str,
    pub original_headline: &'a str,
    pub source_name: &'a str,
    pub headline: &'a str,
    pub summary: &'a str,
    pub category: &'a str,
    pub published_at: &'a str,
}

impl Database {
    /// Dedup lookup on the unique source URL. No retries: an ambiguous
    /// answer must surface to the caller.
    pub async fn article_exists(&self, url: &str) -> Result<bool, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM articles WHERE source_url = ?")
            .bind(url)
            .fetch_optional(self.pool())
            .await?;
        Ok(id.is_some())
    }

    /// Insert-or-ignore keyed on `source_url`, so a race between the
    /// dedup lookup and insertion cannot create a second record.
    pub async fn insert_article(&self, article: &NewArticle<'_>) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO articles
                (source_url, original_headline, source_name, headline, summary, category, published_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(article.source_url)
        .bind(article.original_headline)
        .bind(article.source_name)
        .bind(article.headline)
        .bind(article.summary)
        .bind(article.category)
        .bind(article.published_at)
        .execute(self.pool())
        .await?;

        debug!(target: TARGET_DB, "Stored article for {}", article.source_url);
        Ok(())
    }

    /// Published articles for a category, newest first.
    pub async fn get_articles(
        &self,
        category: &str,
        limit: i64,
    ) -> Result<Vec<PersistedArticle>, sqlx::Error> {
        sqlx::query_as::<_, PersistedArticle>(
            r#"
            SELECT id, source_url, original_headline, source_name, headline,
                   summary, category, published_at, created_at
            FROM articles
            WHERE category = ?1
            ORDER BY published_at DESC
            LIMIT ?2
            "#,
        )
        .bind(category)
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }
}
