mod assistant;
mod compile;
mod config;
mod errors;
mod latex;
mod llm_client;
mod models;
mod routes;
mod state;
mod sync;
mod templates;
mod workspace;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::Assistant;
use crate::compile::{HttpLatexCompiler, PdfStore};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workspace::Workspace;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
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

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Shared editing session
    let workspace = Arc::new(Workspace::new(&config.default_template));
    let pdfs = Arc::new(PdfStore::new());

    // Remote LaTeX compiler
    let compiler = HttpLatexCompiler::new(config.latex_api_url.clone(), config.latex_compiler.clone())
        .context("failed to build the LaTeX compiler HTTP client")?;
    info!(
        "LaTeX compiler: {} ({})",
        config.latex_api_url, config.latex_compiler
    );

    // Background controllers
    sync::spawn(workspace.clone(), config.sync);
    compile::spawn(
        workspace.clone(),
        Arc::new(compiler),
        pdfs.clone(),
        config.compile,
    );

    // AI assistant
    let llm = LlmClient::new(
        config.ai_api_url.clone(),
        config.ai_api_key.clone(),
        config.ai_model.clone(),
    )
    .context("failed to build the AI HTTP client")?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("AI_API_KEY is not set; AI routes will return the input unchanged");
    }
    let assistant = Assistant::new(Arc::new(llm));

    // Build app state
    let state = AppState {
        workspace,
        pdfs,
        assistant,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
