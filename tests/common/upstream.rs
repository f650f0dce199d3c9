//! Fake Rijksmuseum collection API
//!
//! Answers `GET /api/en/collection` from a closure so each test can script
//! what the upstream returns per page, and records every query it receives.

use super::constants::*;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Query parameters of one upstream request, in arrival order.
pub type QueryParams = Vec<(String, String)>;

type Script = dyn Fn(u32, &HashMap<String, String>) -> Option<Value> + Send + Sync;

#[derive(Clone)]
struct UpstreamState {
    script: Arc<Script>,
    requests: Arc<Mutex<Vec<QueryParams>>>,
}

pub struct FakeUpstream {
    /// Base URL to configure the collection client with
    pub base_url: String,

    requests: Arc<Mutex<Vec<QueryParams>>>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn parse_query(raw: Option<String>) -> QueryParams {
    let url = Url::parse(&format!("http://upstream/?{}", raw.unwrap_or_default()))
        .expect("Failed to parse upstream query");
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

async fn collection(State(state): State<UpstreamState>, RawQuery(raw): RawQuery) -> Response {
    let params = parse_query(raw);
    let page = params
        .iter()
        .find(|(k, _)| k == "p")
        .and_then(|(_, v)| v.parse::<u32>().ok())
        .unwrap_or(0);
    let lookup: HashMap<String, String> = params.iter().cloned().collect();
    state.requests.lock().unwrap().push(params);

    match (state.script)(page, &lookup) {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
    }
}

impl FakeUpstream {
    /// Spawns the fake API on a random port.
    ///
    /// `script` receives the requested page and the query parameters; it
    /// returns the JSON body to serve, or `None` to answer with a 500.
    pub async fn spawn<F>(script: F) -> Self
    where
        F: Fn(u32, &HashMap<String, String>) -> Option<Value> + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = UpstreamState {
            script: Arc::new(script),
            requests: requests.clone(),
        };
        let app = Router::new()
            .route(COLLECTION_PATH, get(collection))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// All queries received so far.
    pub fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().unwrap().clone()
    }

    /// Requested page numbers, sorted.
    pub fn requested_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self
            .requests()
            .iter()
            .filter_map(|params| {
                params
                    .iter()
                    .find(|(k, _)| k == "p")
                    .and_then(|(_, v)| v.parse().ok())
            })
            .collect();
        pages.sort();
        pages
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A collection record with an image.
pub fn artwork_json(object_number: &str, image_url: &str) -> Value {
    json!({
        "objectNumber": object_number,
        "title": format!("Artwork {}", object_number),
        "longTitle": format!("Artwork {}, anonymous, 1650", object_number),
        "principalOrFirstMaker": "anonymous",
        "webImage": { "url": image_url, "width": 800, "height": 600 }
    })
}

/// A collection page body.
pub fn page_json(count: u64, records: &[Value]) -> Value {
    json!({ "count": count, "artObjects": records })
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
