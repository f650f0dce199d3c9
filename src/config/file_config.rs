use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub ping_message: Option<String>,

    // Feature configs
    pub rijksmuseum: Option<RijksmuseumConfig>,
    pub gallery: Option<GalleryConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RijksmuseumConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct GalleryConfig {
    pub page_size: Option<u32>,
    pub random_offset_max_page: Option<u32>,
    pub min_random_offset_records: Option<usize>,
    pub sequential_pages_unfiltered: Option<u32>,
    pub sequential_pages_filtered: Option<u32>,
    pub max_concurrent_fetches: Option<usize>,
    pub fetch_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
