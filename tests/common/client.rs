//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per gallery-server endpoint.
//! When API routes change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// GET /api/ping
    pub async fn ping(&self) -> Response {
        self.client
            .get(format!("{}/api/ping", self.base_url))
            .send()
            .await
            .expect("Ping request failed")
    }

    /// GET /api/rijksmuseum with a raw query string (without the `?`)
    pub async fn get_gallery_response(&self, query: &str) -> Response {
        let url = if query.is_empty() {
            format!("{}/api/rijksmuseum", self.base_url)
        } else {
            format!("{}/api/rijksmuseum?{}", self.base_url, query)
        };
        self.client
            .get(url)
            .send()
            .await
            .expect("Gallery request failed")
    }

    /// GET /api/rijksmuseum, asserting a 200 and returning the JSON body
    pub async fn get_gallery(&self, query: &str) -> Value {
        let response = self.get_gallery_response(query).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Gallery endpoint must always answer 200"
        );
        response.json().await.expect("Gallery body is not JSON")
    }
}
