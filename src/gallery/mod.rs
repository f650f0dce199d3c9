//! Gallery artwork aggregation.
//!
//! Turns a [`FilterSpec`] into a diversified list of [`Artwork`]s by querying
//! a [`crate::collection::CollectionSource`] through an ordered list of fetch
//! strategies.

mod aggregator;
mod artwork;
mod filters;
mod strategy;

pub use aggregator::{
    AggregateOutcome, ArtworkAggregator, FallbackReason, FallbackResult, FetchMetadata,
    GalleryResponse, GalleryResult,
};
pub use artwork::{
    aspect_ratio, fallback_artworks, upgrade_to_https, Artwork, WebImage, DEGENERATE_ASPECT_RATIO,
    UNKNOWN_ARTIST, UNKNOWN_DATE, UNTITLED,
};
pub use filters::{FilterSpec, GalleryQuery};
pub use strategy::{PhaseYield, Strategy};
