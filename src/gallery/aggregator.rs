//! Artwork aggregation over the collection API.
//!
//! Each call walks the [`Strategy`] plan for the request's filters, fetching
//! the pages of every phase concurrently. Records from all phases that ran
//! are merged, deduplicated by object number, normalized and shuffled. When
//! nothing usable comes back, a curated fallback set is served instead.

use futures::stream::{self, StreamExt};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::artwork::{fallback_artworks, Artwork};
use super::strategy::{PhaseYield, Strategy};
use super::FilterSpec;
use crate::collection::{CollectionPage, CollectionSource, PageRequest, RawRecord};
use crate::config::GallerySettings;
use crate::server::metrics;

/// Diagnostic information returned alongside a successful aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchMetadata {
    /// Number of artworks returned.
    pub total_fetched: usize,
    /// Highest `count` reported by any upstream page.
    pub total_available: u64,
    pub duplicates_removed: usize,
    pub skipped_without_image: usize,
    pub failed_pages: usize,
    pub filters: Vec<String>,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryResult {
    pub artworks: Vec<Artwork>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Upstream answered, but nothing usable matched.
    NoMatches,
    /// No page fetch succeeded at all.
    UpstreamUnavailable,
}

impl FallbackReason {
    pub fn message(&self) -> &'static str {
        match self {
            FallbackReason::NoMatches => "API returned no results",
            FallbackReason::UpstreamUnavailable => "Failed to fetch from Rijksmuseum API",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FallbackReason::NoMatches => "fallback_no_matches",
            FallbackReason::UpstreamUnavailable => "fallback_unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResult {
    pub artworks: Vec<Artwork>,
    pub reason: FallbackReason,
}

impl FallbackResult {
    pub fn new(reason: FallbackReason) -> Self {
        Self {
            artworks: fallback_artworks(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    Collected(GalleryResult),
    Fallback(FallbackResult),
}

impl AggregateOutcome {
    pub fn artworks(&self) -> &[Artwork] {
        match self {
            AggregateOutcome::Collected(result) => &result.artworks,
            AggregateOutcome::Fallback(fallback) => &fallback.artworks,
        }
    }
}

/// JSON body of `GET /api/rijksmuseum`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub success: bool,
    pub artworks: Vec<Artwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FetchMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AggregateOutcome> for GalleryResponse {
    fn from(outcome: AggregateOutcome) -> Self {
        match outcome {
            AggregateOutcome::Collected(result) => GalleryResponse {
                success: true,
                artworks: result.artworks,
                metadata: Some(result.metadata),
                error: None,
            },
            AggregateOutcome::Fallback(fallback) => GalleryResponse {
                success: false,
                artworks: fallback.artworks,
                metadata: None,
                error: Some(fallback.reason.message().to_string()),
            },
        }
    }
}

/// Records gathered by one phase.
struct PhaseFetch {
    records: Vec<RawRecord>,
    max_count: u64,
    summary: PhaseYield,
}

struct Deduplicated {
    artworks: Vec<Artwork>,
    duplicates_removed: usize,
    skipped_without_image: usize,
}

/// Drops records without a usable image and repeated object numbers, then
/// normalizes the survivors. The first occurrence of an object number wins.
fn deduplicate(records: Vec<RawRecord>) -> Deduplicated {
    let mut seen = HashSet::new();
    let mut artworks = Vec::with_capacity(records.len());
    let mut duplicates_removed = 0;
    let mut skipped_without_image = 0;

    for raw in records {
        if !raw.has_usable_image() {
            skipped_without_image += 1;
            continue;
        }
        if raw.object_number.trim().is_empty() {
            debug!("Skipping record without object number");
            continue;
        }
        if !seen.insert(raw.object_number.clone()) {
            duplicates_removed += 1;
            continue;
        }
        if let Some(artwork) = Artwork::from_raw(raw) {
            artworks.push(artwork);
        }
    }

    Deduplicated {
        artworks,
        duplicates_removed,
        skipped_without_image,
    }
}

pub struct ArtworkAggregator {
    source: Arc<dyn CollectionSource>,
    settings: GallerySettings,
}

impl ArtworkAggregator {
    pub fn new(source: Arc<dyn CollectionSource>, settings: GallerySettings) -> Self {
        Self { source, settings }
    }

    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    /// Fetches, merges, normalizes and shuffles artworks for `filters`.
    ///
    /// Never fails: upstream errors degrade to fewer records and, at worst,
    /// to the curated fallback set.
    pub async fn aggregate<R: Rng + Send + ?Sized>(
        &self,
        filters: &FilterSpec,
        rng: &mut R,
    ) -> AggregateOutcome {
        let filters_active = filters.has_active_filters();
        let mut records: Vec<RawRecord> = Vec::new();
        let mut total_available = 0u64;
        let mut answered_pages = 0;
        let mut failed_pages = 0;
        let mut winner: Option<Strategy> = None;

        for strategy in Strategy::plan(filters) {
            let pages = strategy.pages(filters_active, &self.settings, rng);
            info!(
                "Trying {} strategy on pages {:?} via {}",
                strategy,
                pages,
                self.source.name()
            );

            let phase = self.run_phase(&pages, filters).await;
            info!(
                "{} phase: {} records ({} with images), {} pages failed",
                strategy,
                phase.summary.raw_records,
                phase.summary.usable_records,
                phase.summary.failed_pages
            );

            total_available = total_available.max(phase.max_count);
            answered_pages += phase.summary.answered_pages;
            failed_pages += phase.summary.failed_pages;
            records.extend(phase.records);

            if winner.is_none() && strategy.succeeded(&phase.summary) {
                winner = Some(strategy);
            }
            if strategy.is_sufficient(&phase.summary, &self.settings) {
                break;
            }
        }

        if !records.iter().any(RawRecord::is_usable) {
            let reason = if answered_pages > 0 {
                FallbackReason::NoMatches
            } else {
                FallbackReason::UpstreamUnavailable
            };
            warn!(
                "No usable artworks ({} pages answered, {} failed), serving fallback set",
                answered_pages, failed_pages
            );
            metrics::record_gallery_outcome(reason.label());
            return AggregateOutcome::Fallback(FallbackResult::new(reason));
        }

        let raw_count = records.len();
        let Deduplicated {
            mut artworks,
            duplicates_removed,
            skipped_without_image,
        } = deduplicate(records);
        artworks.shuffle(rng);

        let strategy = winner.unwrap_or(Strategy::Sequential);
        let descriptors = filters.descriptors();
        info!(
            "Collected {} unique artworks from {} records ({} duplicates, {} without image), strategy {}, filters {:?}, {} available",
            artworks.len(),
            raw_count,
            duplicates_removed,
            skipped_without_image,
            strategy,
            descriptors,
            total_available
        );
        metrics::record_gallery_outcome(strategy.tag());

        AggregateOutcome::Collected(GalleryResult {
            metadata: FetchMetadata {
                total_fetched: artworks.len(),
                total_available,
                duplicates_removed,
                skipped_without_image,
                failed_pages,
                filters: descriptors,
                strategy,
            },
            artworks,
        })
    }

    /// Fetches `pages` with bounded concurrency; failed pages contribute
    /// nothing and never affect their siblings.
    async fn run_phase(&self, pages: &[u32], filters: &FilterSpec) -> PhaseFetch {
        let results: Vec<Option<CollectionPage>> = stream::iter(pages.iter().copied())
            .map(|page| self.fetch_page(page, filters))
            .buffered(self.settings.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let mut fetch = PhaseFetch {
            records: Vec::new(),
            max_count: 0,
            summary: PhaseYield::default(),
        };
        for result in results {
            match result {
                Some(page) => {
                    fetch.summary.answered_pages += 1;
                    fetch.max_count = fetch.max_count.max(page.count);
                    fetch.records.extend(page.art_objects);
                }
                None => fetch.summary.failed_pages += 1,
            }
        }
        fetch.summary.raw_records = fetch.records.len();
        fetch.summary.usable_records = fetch
            .records
            .iter()
            .filter(|r| r.is_usable())
            .count();
        fetch
    }

    async fn fetch_page(&self, page: u32, filters: &FilterSpec) -> Option<CollectionPage> {
        let request = PageRequest {
            page,
            page_size: self.settings.page_size,
            filters: filters.clone(),
        };

        match tokio::time::timeout(self.settings.fetch_timeout(), self.source.fetch_page(&request))
            .await
        {
            Ok(Ok(result)) => {
                debug!(
                    "Page {}: {} total, {} returned",
                    page,
                    result.count,
                    result.art_objects.len()
                );
                metrics::record_upstream_fetch("ok");
                Some(result)
            }
            Ok(Err(err)) => {
                warn!("Failed to fetch page {}: {}", page, err);
                metrics::record_upstream_fetch("error");
                None
            }
            Err(_) => {
                warn!(
                    "Fetching page {} timed out after {:?}",
                    page,
                    self.settings.fetch_timeout()
                );
                metrics::record_upstream_fetch("timeout");
                None
            }
        }
    }
}
