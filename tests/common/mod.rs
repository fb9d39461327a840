//! Test server harness.
//!
//! Spawns the full router on a real listener over mock upstreams and a stub
//! embedder, so tests drive the service exactly like a network client.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use petmatch::config::Config;
use petmatch::embedding::{CaptionEmbedder, EmbedderConfig};
use petmatch::gateway::{HandlerState, create_router_with_state};
use petmatch::recommend::RecommendationEngine;
use petmatch::upstream::{MockMediaSource, MockPetDirectory};

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Spawns a server over the given mocks with default config and stub embedder.
pub async fn spawn_test_server(
    directory: Arc<MockPetDirectory>,
    media: Arc<MockMediaSource>,
    top_k: usize,
) -> TestServer {
    spawn_test_server_with_config(directory, media, top_k, Config::default()).await
}

pub async fn spawn_test_server_with_config(
    directory: Arc<MockPetDirectory>,
    media: Arc<MockMediaSource>,
    top_k: usize,
    config: Config,
) -> TestServer {
    let embedder = CaptionEmbedder::load(EmbedderConfig::stub()).expect("stub embedder");
    let engine = RecommendationEngine::new(directory, media, embedder, top_k);
    let app = create_router_with_state(HandlerState::new(engine), &config);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("test server");
    });

    TestServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    }
}
