//! Petmatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use petmatch::config::Config;
use petmatch::embedding::{CaptionEmbedder, EmbedderConfig};
use petmatch::gateway::{HandlerState, create_router_with_state};
use petmatch::recommend::RecommendationEngine;
use petmatch::upstream::{HttpMediaSource, HttpPetDirectory};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        top_k = config.top_petstars,
        "Petmatch starting"
    );

    let embedder_config = if let Some(path) = &config.model_path {
        EmbedderConfig::new(path.clone())
    } else {
        tracing::warn!("No PETMATCH_MODEL_PATH configured, running embedder in stub mode");
        EmbedderConfig::stub()
    };
    let embedder = CaptionEmbedder::load(embedder_config)?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;
    let directory = HttpPetDirectory::new(http_client.clone(), config.pet_service_url.clone());
    let media = HttpMediaSource::new(http_client, config.sns_service_url.clone());

    let engine = RecommendationEngine::new(directory, media, embedder, config.top_petstars);
    let state = HandlerState::new(engine);
    let app = create_router_with_state(state, &config);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Petmatch shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PETMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
