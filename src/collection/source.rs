use async_trait::async_trait;
use thiserror::Error;

use super::models::CollectionPage;
use crate::gallery::FilterSpec;

/// Errors raised while fetching a single page from the collection API.
///
/// Every variant is transient from the aggregator's point of view: the page
/// simply contributes no records.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status})")]
    Api { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A request for one page of filtered search results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub filters: FilterSpec,
}

/// Source of raw artwork records.
///
/// Implemented over HTTP by [`super::RijksmuseumClient`]; tests plug in
/// scripted sources.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch a single page of results.
    async fn fetch_page(&self, request: &PageRequest) -> Result<CollectionPage, CollectionError>;
}
