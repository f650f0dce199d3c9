//! Narwhal Gallery Server Library
//!
//! Proxies the Rijksmuseum collection API and serves a shuffled,
//! deduplicated artwork set to the gallery frontend.

pub mod collection;
pub mod config;
pub mod gallery;
pub mod server;

// Re-export commonly used types for convenience
pub use collection::{CollectionSource, RijksmuseumClient};
pub use gallery::{ArtworkAggregator, FilterSpec, GalleryResponse};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
