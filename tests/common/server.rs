//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server pointed at its own upstream.

use super::constants::*;
use narwhal_gallery_server::collection::RijksmuseumClient;
use narwhal_gallery_server::config::{CollectionSettings, GallerySettings};
use narwhal_gallery_server::gallery::ArtworkAggregator;
use narwhal_gallery_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server with default gallery settings against `upstream_base_url`.
    pub async fn spawn(upstream_base_url: &str) -> Self {
        Self::spawn_with_settings(upstream_base_url, GallerySettings::default()).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the collection client cannot be built, the port cannot be
    /// bound or the server doesn't become ready within timeout.
    pub async fn spawn_with_settings(upstream_base_url: &str, settings: GallerySettings) -> Self {
        let collection = CollectionSettings {
            api_key: TEST_API_KEY.to_string(),
            base_url: upstream_base_url.to_string(),
            request_timeout_sec: FETCH_TIMEOUT_SECS,
        };
        let client =
            RijksmuseumClient::new(&collection).expect("Failed to build collection client");
        let aggregator = Arc::new(ArtworkAggregator::new(
            Arc::new(client),
            GallerySettings {
                fetch_timeout_sec: FETCH_TIMEOUT_SECS,
                ..settings
            },
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
            ping_message: TEST_PING_MESSAGE.to_string(),
        };
        let app = make_app(config, aggregator);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the ping endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/api/ping", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
