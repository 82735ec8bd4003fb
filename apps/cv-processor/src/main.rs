mod cache;
mod config;
mod cv;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::ResultCache;
use crate::config::Config;
use crate::cv::analyzer::LlmCvAnalyzer;
use crate::extraction::PdfTextExtractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV processor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize result cache
    let cache = ResultCache::open(&config.cache_dir, config.cache_ttl)
        .await
        .context("Failed to open cache directory")?;
    if let Some(every) = config.cache_sweep_interval {
        cache.clone().spawn_sweeper(every);
        info!("Cache sweeper running every {}s", every.as_secs());
    }

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.openai_model.clone(),
        config.llm_timeout,
    )
    .context("Failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, base url: {})",
        llm.model(),
        config.openai_base_url
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        extractor: Arc::new(PdfTextExtractor),
        analyzer: Arc::new(LlmCvAnalyzer(llm)),
        cache,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
