//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeUpstream, TestClient, TestServer};
//!
//! #[tokio::test]
//! async fn test_gallery() {
//!     let upstream = FakeUpstream::spawn(|_page, _params| Some(common::page_json(0, &[]))).await;
//!     let server = TestServer::spawn(&upstream.base_url).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let body = client.get_gallery("").await;
//!     assert_eq!(body["success"], false);
//! }
//! ```

mod client;
mod constants;
mod server;
mod upstream;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;
pub use upstream::{artwork_json, page_json, unreachable_base_url, FakeUpstream};
