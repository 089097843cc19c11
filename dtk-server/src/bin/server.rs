use anyhow::Context;
use dtk_cache::InMemoryStatusCache;
use dtk_history::InMemoryHistoryStore;
use dtk_model::OpenAiModel;
use dtk_server::{ServerConfig, create_app};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let llm = Arc::new(OpenAiModel::from_env().context("chat model configuration")?);
    let mut config = ServerConfig::new(
        llm,
        Arc::new(InMemoryStatusCache::new()),
        Arc::new(InMemoryHistoryStore::new()),
    );
    if let Ok(temp_path) = std::env::var("TEMP_PATH") {
        config = config.with_temp_dir(temp_path);
    }

    let addr = std::env::var("DTK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener =
        tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("bind {}", addr))?;
    info!(addr = %addr, "dtk server listening");

    axum::serve(listener, create_app(config)).await?;
    Ok(())
}
