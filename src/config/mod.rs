mod file_config;

pub use file_config::{FileConfig, GalleryConfig, RijksmuseumConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_COLLECTION_BASE_URL: &str = "https://www.rijksmuseum.nl";

/// The collection API caps page size at 100.
const MAX_PAGE_SIZE: u32 = 100;
const MAX_RANDOM_OFFSET_PAGE: u32 = 10_000;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub ping_message: String,
    pub api_key: Option<String>,
    pub collection_base_url: String,
    pub request_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::default(),
            frontend_dir_path: None,
            ping_message: "ping".to_string(),
            api_key: None,
            collection_base_url: DEFAULT_COLLECTION_BASE_URL.to_string(),
            request_timeout_sec: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub ping_message: String,

    pub collection: CollectionSettings,
    pub gallery: GallerySettings,
}

/// Connection settings for the upstream collection API.
#[derive(Debug, Clone)]
pub struct CollectionSettings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_sec: u64,
}

/// Tuning knobs of the artwork aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySettings {
    /// Records requested per upstream page.
    pub page_size: u32,
    /// Random offsets are drawn from `0..random_offset_max_page`.
    pub random_offset_max_page: u32,
    /// Raw records below which a random-offset phase escalates.
    pub min_random_offset_records: usize,
    pub sequential_pages_unfiltered: u32,
    pub sequential_pages_filtered: u32,
    /// Upper bound on in-flight page fetches within one phase.
    pub max_concurrent_fetches: usize,
    pub fetch_timeout_sec: u64,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            random_offset_max_page: 100,
            min_random_offset_records: 20,
            sequential_pages_unfiltered: 5,
            sequential_pages_filtered: 3,
            max_concurrent_fetches: 5,
            fetch_timeout_sec: 15,
        }
    }
}

impl GallerySettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_sec)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            bail!(
                "gallery.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                self.page_size
            );
        }
        if !(1..=MAX_RANDOM_OFFSET_PAGE).contains(&self.random_offset_max_page) {
            bail!(
                "gallery.random_offset_max_page must be between 1 and {}, got {}",
                MAX_RANDOM_OFFSET_PAGE,
                self.random_offset_max_page
            );
        }
        if self.max_concurrent_fetches == 0 {
            bail!("gallery.max_concurrent_fetches must be at least 1");
        }
        if self.sequential_pages_unfiltered == 0 || self.sequential_pages_filtered == 0 {
            bail!("gallery sequential page counts must be at least 1");
        }
        if self.fetch_timeout_sec == 0 {
            bail!("gallery.fetch_timeout_sec must be at least 1");
        }
        Ok(())
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        if let Some(dir) = &frontend_dir_path {
            let path = PathBuf::from(dir);
            if !path.is_dir() {
                bail!("Frontend directory does not exist: {:?}", path);
            }
        }

        let ping_message = file
            .ping_message
            .unwrap_or_else(|| cli.ping_message.clone());

        let rijks = file.rijksmuseum.unwrap_or_default();
        let api_key = rijks
            .api_key
            .or_else(|| cli.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("api_key must be specified via --api-key or in config file")
            })?;
        let base_url = rijks
            .base_url
            .unwrap_or_else(|| cli.collection_base_url.clone());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("Collection base URL must be http(s): {}", base_url);
        }
        let collection = CollectionSettings {
            api_key,
            base_url,
            request_timeout_sec: rijks
                .request_timeout_sec
                .unwrap_or(cli.request_timeout_sec),
        };

        // Gallery settings - merge file config with defaults
        let defaults = GallerySettings::default();
        let g = file.gallery.unwrap_or_default();
        let gallery = GallerySettings {
            page_size: g.page_size.unwrap_or(defaults.page_size),
            random_offset_max_page: g
                .random_offset_max_page
                .unwrap_or(defaults.random_offset_max_page),
            min_random_offset_records: g
                .min_random_offset_records
                .unwrap_or(defaults.min_random_offset_records),
            sequential_pages_unfiltered: g
                .sequential_pages_unfiltered
                .unwrap_or(defaults.sequential_pages_unfiltered),
            sequential_pages_filtered: g
                .sequential_pages_filtered
                .unwrap_or(defaults.sequential_pages_filtered),
            max_concurrent_fetches: g
                .max_concurrent_fetches
                .unwrap_or(defaults.max_concurrent_fetches),
            fetch_timeout_sec: g
                .fetch_timeout_sec
                .unwrap_or(collection.request_timeout_sec),
        };
        gallery.validate()?;

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            ping_message,
            collection,
            gallery,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
