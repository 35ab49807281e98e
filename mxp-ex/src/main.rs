//! mxp-ex - Media explainability microservice
//!
//! Accepts image/video uploads, hands them to the external analyzer and
//! scanner, and explains the resulting metrics through a text-generation
//! backend.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mxp_common::PromptBuilder;
use mxp_ex::config::{Args, ServiceConfig};
use mxp_ex::services::{
    CatalogVoteVerdict, ChatCompletionsGenerator, ExplanationOrchestrator, HttpMediaAnalyzer,
    HttpVerdictSource, MediaAnalyzer, MediaStore, VerdictSource,
};
use mxp_ex::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Errors before logging is up surface through main's return value
    let loaded = mxp_common::config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(&args, &loaded.config).context("Invalid configuration")?;

    // RUST_LOG wins over the TOML level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "mxp_ex={level},mxp_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    loaded.source.log();

    info!(
        "Starting mxp-ex v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        backend = %config.generator.base_url,
        model = %config.generator.model,
        timeout_secs = config.generator.timeout.as_secs(),
        max_concurrent = config.max_concurrent,
        "Text-generation backend configured"
    );

    let media_store = MediaStore::new(&config.media_dir);
    media_store
        .ensure_dir()
        .with_context(|| format!("Failed to create media folder {}", config.media_dir.display()))?;
    info!("Media folder: {}", config.media_dir.display());

    let generator = ChatCompletionsGenerator::new(config.generator.clone())
        .context("Failed to build text-generation client")?;
    let orchestrator = ExplanationOrchestrator::new(
        Arc::new(generator),
        PromptBuilder::new(config.templates.clone()),
    )
    .with_max_concurrent(config.max_concurrent);

    let analyzer: Arc<dyn MediaAnalyzer> = Arc::new(
        HttpMediaAnalyzer::new(&config.analyzer_url, config.generator.timeout)
            .context("Failed to build analyzer client")?,
    );
    info!("Media analyzer: {}", config.analyzer_url);

    let verdict_source: Arc<dyn VerdictSource> = match &config.scanner_url {
        Some(url) => {
            info!("Authenticity scanner: {}", url);
            Arc::new(
                HttpVerdictSource::new(url, config.generator.timeout)
                    .context("Failed to build scanner client")?,
            )
        }
        None => {
            info!("No scanner configured, verdicts come from the catalog vote");
            Arc::new(CatalogVoteVerdict)
        }
    };

    let state = AppState::new(orchestrator, analyzer, verdict_source, media_store)
        .with_cors_origins(config.cors_origins.clone())
        .with_max_upload_bytes(config.max_upload_bytes)
        .with_backend_model(&config.generator.model);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_addr))?;
    info!("Listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
