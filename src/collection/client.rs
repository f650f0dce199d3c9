//! HTTP client for the Rijksmuseum collection API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use super::models::CollectionPage;
use super::source::{CollectionError, CollectionSource, PageRequest};
use crate::config::CollectionSettings;

const COLLECTION_PATH: &str = "/api/en/collection";

pub struct RijksmuseumClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl RijksmuseumClient {
    /// Create a new client.
    ///
    /// Fails if the configured base URL cannot be turned into a valid
    /// collection endpoint or the HTTP client cannot be built.
    pub fn new(settings: &CollectionSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("narwhal-gallery-server/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.request_timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        // Ensure base_url doesn't have trailing slash
        let base_url = settings.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{}{}", base_url, COLLECTION_PATH))
            .with_context(|| format!("Invalid collection base URL: {}", settings.base_url))?;

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
        })
    }

    /// Build the full request URL for a page, including filter parameters.
    pub fn page_url(&self, request: &PageRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("format", "json")
            .append_pair("ps", &request.page_size.to_string())
            .append_pair("p", &request.page.to_string())
            .append_pair("imgonly", "true")
            .extend_pairs(request.filters.upstream_params());
        url
    }
}

#[async_trait]
impl CollectionSource for RijksmuseumClient {
    fn name(&self) -> &str {
        "rijksmuseum"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<CollectionPage, CollectionError> {
        debug!(
            page = request.page,
            filters = ?request.filters.descriptors(),
            "Fetching collection page"
        );

        let response = self
            .client
            .get(self.page_url(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollectionError::Timeout
                } else {
                    CollectionError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectionError::Api {
                status: status.as_u16(),
            });
        }

        response
            .json::<CollectionPage>()
            .await
            .map_err(|e| CollectionError::InvalidResponse(e.to_string()))
    }
}
