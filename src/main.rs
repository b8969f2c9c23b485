use anyhow::Result;
use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use clap::{Parser, Subcommand};
use ollama_rs::Ollama;
use std::env;
use tracing::info;

use recast::db::Database;
use recast::environment::get_env_var_as_vec;
use recast::logging::configure_logging;
use recast::originality::SemanticCheck;
use recast::pipeline::{self, PipelineConfig};
use recast::rewrite::RewriteClient;
use recast::rss::RssFeed;
use recast::{web, LLMClient, LLMParams};

#[derive(Parser)]
#[command(name = "recast", about = "News rewriting service with an originality gate")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch candidate items and run one rewrite pass
    Process,
    /// Serve the read-only article API
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let cli = Cli::parse();

    let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "recast.db".to_string());
    let db = Database::new(&database_path).await?;

    match cli.command {
        Command::Process => process(db).await,
        Command::Serve => {
            let port: u16 = env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080);
            web::serve(db, port).await
        }
    }
}

async fn process(db: Database) -> Result<()> {
    let llm_client = build_llm_client();
    let model = env::var("LLM_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());
    // A little heat keeps retry attempts from reproducing the rejected wording.
    let temperature: f32 = env::var("LLM_TEMPERATURE")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(0.7);

    let mut config = PipelineConfig::default();
    let categories = get_env_var_as_vec("CATEGORIES", ';');
    if !categories.is_empty() {
        config.categories = categories;
    }
    if let Some(limit) = env::var("MAX_ARTICLES_PER_RUN")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.max_articles_per_run = limit;
    }

    info!(
        "Starting rewrite run: budget {} items, model {}",
        config.max_articles_per_run, model
    );

    let feed = RssFeed::new()?;
    let rewriter = RewriteClient::new(LLMParams {
        llm_client,
        model,
        temperature,
    });
    let semantic = SemanticCheck::from_env();

    pipeline::run(&db, &feed, &rewriter, &semantic, &config).await;
    Ok(())
}

fn build_llm_client() -> LLMClient {
    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Ok(api_base) = env::var("OPENAI_API_BASE") {
            config = config.with_api_base(api_base);
        }
        info!("Using OpenAI-compatible generation backend");
        LLMClient::OpenAI(OpenAIClient::with_config(config))
    } else {
        let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);
        info!("Connecting to Ollama at {}:{}", host, port);
        LLMClient::Ollama(Ollama::new(host, port))
    }
}
