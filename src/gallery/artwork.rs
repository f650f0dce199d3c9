//! Normalized artwork shape served to the gallery frontend.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::collection::RawRecord;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_DATE: &str = "Date unknown";

/// Aspect ratio reported when an image has a zero or missing dimension.
pub const DEGENERATE_ASPECT_RATIO: f64 = 1.0;

lazy_static! {
    static ref YEAR_PATTERN: Regex = Regex::new("[0-9]{4}").expect("valid year pattern");
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebImage {
    /// Always `https`.
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Upstream object number, unique within a response.
    pub id: String,
    pub object_number: String,
    pub title: String,
    pub artist: String,
    pub dating: String,
    pub web_image: WebImage,
    pub aspect_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_maker: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub object_types: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Forces an image URL onto https, including protocol-relative URLs.
pub fn upgrade_to_https(url: &str) -> String {
    let url = url.trim();
    match url.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => {
            format!("https://{}", &url[7..])
        }
        _ if url.starts_with("//") => format!("https:{}", url),
        _ => url.to_string(),
    }
}

/// Best-effort display date: a year from the long title, then the
/// presenting date, then a placeholder.
fn extract_dating(long_title: Option<&str>, presenting_date: Option<String>) -> String {
    long_title
        .and_then(|title| YEAR_PATTERN.find(title))
        .map(|m| m.as_str().to_string())
        .or_else(|| non_empty(presenting_date))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if width == 0 || height == 0 {
        DEGENERATE_ASPECT_RATIO
    } else {
        width as f64 / height as f64
    }
}

impl Artwork {
    /// Normalizes a raw upstream record.
    ///
    /// Returns `None` when the record has no usable image or no object number.
    pub fn from_raw(raw: RawRecord) -> Option<Artwork> {
        if raw.object_number.trim().is_empty() {
            return None;
        }
        let url = upgrade_to_https(raw.usable_image_url()?);
        let image = raw.web_image.unwrap_or_default();
        let width = image.width.unwrap_or(0);
        let height = image.height.unwrap_or(0);

        let principal_maker = non_empty(raw.principal_or_first_maker);
        let dating = extract_dating(
            raw.long_title.as_deref(),
            raw.dating.and_then(|d| d.presenting_date),
        );

        Some(Artwork {
            id: raw.object_number.clone(),
            object_number: raw.object_number,
            title: non_empty(raw.title).unwrap_or_else(|| UNTITLED.to_string()),
            artist: principal_maker
                .clone()
                .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            dating,
            web_image: WebImage { url, width, height },
            aspect_ratio: aspect_ratio(width, height),
            principal_maker,
            materials: raw.materials.unwrap_or_default(),
            techniques: raw.techniques.unwrap_or_default(),
            object_types: raw.object_types.unwrap_or_default(),
        })
    }
}

fn curated(
    object_number: &str,
    title: &str,
    artist: &str,
    dating: &str,
    url: &str,
    (width, height): (u32, u32),
    aspect_ratio: f64,
) -> Artwork {
    Artwork {
        id: object_number.to_string(),
        object_number: object_number.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        dating: dating.to_string(),
        web_image: WebImage {
            url: url.to_string(),
            width,
            height,
        },
        aspect_ratio,
        principal_maker: Some(artist.to_string()),
        materials: Vec::new(),
        techniques: Vec::new(),
        object_types: Vec::new(),
    }
}

/// Well-known artworks served when no upstream data is available.
pub fn fallback_artworks() -> Vec<Artwork> {
    let night_watch = curated(
        "SK-C-5",
        "The Night Watch",
        "Rembrandt van Rijn",
        "1642",
        "https://lh3.googleusercontent.com/SsEIJWka3_cYRXXSE8VD3XNOgtOxoZhqW1uB8UFj78eg8gq3G4jAqL4Z_5KwA12aD7Leqp27F653aBkYkRBkEQyeKxfaZPyDx0O8CzWg=s0",
        (2500, 2034),
        1.23,
    );
    let milkmaid = curated(
        "SK-A-1718",
        "The Milkmaid",
        "Johannes Vermeer",
        "1658",
        "https://lh3.googleusercontent.com/cRtF3WdYfRQEraAcQz8dWDJOq3XsRX-h244rOw3r7bHFmKen6C5Pn7u8LDXJPootdqK4ZMruYYYbZDSNmROLmVxvTQ=s0",
        (2031, 2308),
        0.88,
    );
    let cupboard = Artwork {
        materials: vec!["wood".to_string()],
        techniques: vec!["woodworking".to_string()],
        object_types: vec!["furniture".to_string()],
        ..curated(
            "BK-1975-81",
            "Cupboard",
            "Herman Doomer",
            "1635",
            "https://lh3.googleusercontent.com/ZYQ7IcfJ45yQOPnmhzBkZK2mc2F_e7bUMDgKaY-miSl0f8y3o-Q--H3R81q-2q1cfqFqoDlDgyLDW3OHJqin_ugnB_KRIfZaV-9xX2Y=s0",
            (5958, 6805),
            0.88,
        )
    };

    vec![night_watch, milkmaid, cupboard]
}
