//! Access to the upstream museum collection API.
//!
//! The aggregator only sees the [`CollectionSource`] trait; the HTTP
//! implementation lives in [`client`].

mod client;
mod models;
mod source;

pub use client::RijksmuseumClient;
pub use models::{CollectionPage, RawDating, RawImage, RawRecord};
pub use source::{CollectionError, CollectionSource, PageRequest};
