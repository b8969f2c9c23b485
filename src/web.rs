//! Read-only query API over published articles. The pipeline never goes
//! through this; it exists for the presentation layer.

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::db::{Database, PersistedArticle};

#[derive(Deserialize)]
struct ArticlesQuery {
    category: Option<String>,
    limit: Option<i64>,
}

#[derive(Serialize)]
struct Category {
    id: &'static str,
    label: &'static str,
}

const CATEGORIES: &[Category] = &[
    Category { id: "general", label: "Top Stories" },
    Category { id: "technology", label: "Tech" },
    Category { id: "business", label: "Business" },
    Category { id: "science", label: "Science" },
    Category { id: "health", label: "Health" },
    Category { id: "sports", label: "Sports" },
    Category { id: "entertainment", label: "Entertainment" },
    Category { id: "world", label: "World" },
    Category { id: "politics", label: "Politics" },
    Category { id: "environment", label: "Environment" },
];

/// Serve the read API until the process is stopped.
pub async fn serve(db: Database, port: u16) -> Result<()> {
    let app = Router::new()
        .route("/articles", get(list_articles))
        .route("/categories", get(list_categories))
        .with_state(db);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Read API listening on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn list_articles(
    State(db): State<Database>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<Vec<PersistedArticle>>, StatusCode> {
    let category = query.category.unwrap_or_else(|| "general".to_string());
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    match db.get_articles(&category, limit).await {
        Ok(articles) => Ok(Json(articles)),
        Err(err) => {
            error!("Failed to fetch articles for {}: {}", category, err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn list_categories() -> Json<&'static [Category]> {
    Json(CATEGORIES)
}
