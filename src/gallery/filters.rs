//! Gallery filter parsing and forwarding.

use serde::Deserialize;

/// Sentinel the frontend sends for "no filter".
const ALL: &str = "all";

/// Upstream facet parameter for colour filters.
const COLOR_PARAM: &str = "f.normalized32Colors.hex";

/// Raw query string accepted by `GET /api/rijksmuseum`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryQuery {
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub century: Option<String>,
    pub material: Option<String>,
    pub technique: Option<String>,
    #[serde(rename = "topPieces")]
    pub top_pieces: Option<String>,
    /// Comma-joined colour tokens.
    pub colors: Option<String>,
}

/// Request-scoped filter specification.
///
/// Values equal to `"all"` or blank are dropped at construction, so a
/// `Some` field is always an active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub object_type: Option<String>,
    pub century: Option<String>,
    pub material: Option<String>,
    pub technique: Option<String>,
    pub top_pieces_only: bool,
    pub colors: Vec<String>,
}

impl GalleryQuery {
    /// Builds a query from decoded key/value pairs.
    ///
    /// The first occurrence of a repeated key wins and unknown keys are
    /// ignored, so any query string yields a usable query.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = GalleryQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "type" => &mut query.object_type,
                "century" => &mut query.century,
                "material" => &mut query.material,
                "technique" => &mut query.technique,
                "topPieces" => &mut query.top_pieces,
                "colors" => &mut query.colors,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

fn active_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != ALL)
}

/// Normalizes a colour token to the `#RRGGBB` form the facet expects.
fn normalize_color(token: &str) -> String {
    format!("#{}", token.trim().trim_start_matches('#').to_uppercase())
}

impl From<GalleryQuery> for FilterSpec {
    fn from(query: GalleryQuery) -> Self {
        let colors = query
            .colors
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty() && *c != ALL)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        FilterSpec {
            object_type: active_value(query.object_type),
            century: active_value(query.century),
            material: active_value(query.material),
            technique: active_value(query.technique),
            top_pieces_only: query.top_pieces.as_deref().map(str::trim) == Some("true"),
            colors,
        }
    }
}

impl FilterSpec {
    pub fn has_active_filters(&self) -> bool {
        self.object_type.is_some()
            || self.century.is_some()
            || self.material.is_some()
            || self.technique.is_some()
            || self.top_pieces_only
            || !self.colors.is_empty()
    }

    /// Human-readable descriptors of the active filters, e.g. `material:gold`.
    pub fn descriptors(&self) -> Vec<String> {
        let mut descriptors = Vec::new();
        if let Some(t) = &self.object_type {
            descriptors.push(format!("type:{}", t));
        }
        if let Some(c) = &self.century {
            descriptors.push(format!("century:{}", c));
        }
        if let Some(m) = &self.material {
            descriptors.push(format!("material:{}", m));
        }
        if let Some(t) = &self.technique {
            descriptors.push(format!("technique:{}", t));
        }
        if self.top_pieces_only {
            descriptors.push("topPieces".to_string());
        }
        if !self.colors.is_empty() {
            descriptors.push(format!("colors:{}", self.colors.join(",")));
        }
        descriptors
    }

    /// Query parameters to append to an upstream page request.
    ///
    /// Values are left unencoded; the URL builder percent-encodes them.
    pub fn upstream_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(t) = &self.object_type {
            params.push(("type", t.clone()));
        }
        if let Some(c) = &self.century {
            params.push(("f.dating.period", c.clone()));
        }
        if let Some(m) = &self.material {
            params.push(("material", m.clone()));
        }
        if let Some(t) = &self.technique {
            params.push(("technique", t.clone()));
        }
        if self.top_pieces_only {
            params.push(("toppieces", "true".to_string()));
        }
        for color in &self.colors {
            params.push((COLOR_PARAM, normalize_color(color)));
        }
        params
    }
}
