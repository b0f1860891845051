//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database and its own fake
//! lyrics API.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use song_library_server::enrichment::LyricsApiClient;
use song_library_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use song_library_server::song_store::SqliteSongStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

async fn fake_lyrics_lookup(
    State(calls): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);

    let song = params.get("song").map(String::as_str).unwrap_or_default();
    let group = params.get("group").map(String::as_str).unwrap_or_default();
    match (song, group) {
        (KNOWN_SONG, KNOWN_GROUP) => Json(json!({
            "releaseDate": KNOWN_RELEASE_DATE,
            "text": KNOWN_TEXT,
            "link": KNOWN_LINK,
        }))
        .into_response(),
        (SECOND_SONG, SECOND_GROUP) | (CYRILLIC_SONG, CYRILLIC_GROUP) => Json(json!({
            "releaseDate": "01.01.1970",
            "text": format!("{}\n{}", song, group),
            "link": "https://example.com",
        }))
        .into_response(),
        (FAILING_SONG, _) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        (GARBLED_SONG, _) => "<html>not json</html>".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Spawns the fake lyrics API and returns its `/info` URL.
async fn spawn_fake_lyrics_api(
    calls: Arc<AtomicUsize>,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake lyrics API");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();

    let app = Router::new()
        .route("/info", get(fake_lyrics_lookup))
        .with_state(calls);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Fake lyrics API failed");
    });

    format!("http://127.0.0.1:{}/info", port)
}

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    lyrics_api_calls: Arc<AtomicUsize>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    _lyrics_shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Starts a fake lyrics API on a random port
    /// 2. Opens a fresh songs database in a temporary directory
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of the above fails.
    pub async fn spawn() -> Self {
        let lyrics_api_calls = Arc::new(AtomicUsize::new(0));
        let (lyrics_shutdown_tx, lyrics_shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let lyrics_api_url =
            spawn_fake_lyrics_api(lyrics_api_calls.clone(), lyrics_shutdown_rx).await;

        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteSongStore::new(temp_db_dir.path().join("songs.db"))
                .expect("Failed to open song store"),
        );
        let enricher = Arc::new(
            LyricsApiClient::new(lyrics_api_url, 5).expect("Failed to create lyrics client"),
        );

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
            requests_logging_level: RequestsLoggingLevel::None,
            host: "127.0.0.1".to_string(),
            port,
        };
        let app = make_app(config, store, enricher);

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
            lyrics_api_calls,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
            _lyrics_shutdown_tx: Some(lyrics_shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Number of requests the fake lyrics API has received so far
    pub fn lyrics_api_calls(&self) -> usize {
        self.lyrics_api_calls.load(Ordering::SeqCst)
    }

    /// Waits for the server to become ready by polling the home endpoint
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

            match client.get(format!("{}/", self.base_url)).send().await {
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
        if let Some(tx) = self._lyrics_shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
