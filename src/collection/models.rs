//! Wire types of the upstream collection API.
//!
//! Only the fields consumed by the gallery are modelled; everything else the
//! API returns is ignored during deserialization. A malformed entry in
//! `artObjects` is dropped on its own instead of failing the whole page.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// One page of search results as returned by `GET /api/en/collection`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    /// Total number of objects upstream reports for the query.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_records")]
    pub art_objects: Vec<RawRecord>,
}

/// An upstream-shaped artwork entry before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub object_number: String,
    pub title: Option<String>,
    pub long_title: Option<String>,
    pub principal_or_first_maker: Option<String>,
    pub web_image: Option<RawImage>,
    pub dating: Option<RawDating>,
    pub materials: Option<Vec<String>>,
    pub techniques: Option<Vec<String>>,
    pub object_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDating {
    pub presenting_date: Option<String>,
}

impl RawRecord {
    /// Returns the image URL when the record carries a usable image.
    pub fn usable_image_url(&self) -> Option<&str> {
        self.web_image
            .as_ref()
            .and_then(|image| image.url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn has_usable_image(&self) -> bool {
        self.usable_image_url().is_some()
    }

    /// A record can be shown only with an object number and an image.
    pub fn is_usable(&self) -> bool {
        !self.object_number.trim().is_empty() && self.has_usable_image()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawRecord>(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Dropping malformed collection record: {}", err);
                None
            }
        })
        .collect())
}
