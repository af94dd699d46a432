//! Image metadata, search queries and cache keys
//!
//! The remote search backend answers a paged query with an Elasticsearch-style
//! body: `{"hits": {"hits": [{"_source": {...}}]}}`. Only the fields the
//! gallery shows are extracted.

use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of results requested per page
pub const PAGING_SIZE: usize = 64;

/// Rendition used when the caller does not name one
pub const DEFAULT_RENDITION: &str = "thumbnail";

/// One indexed photo as returned by the search backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: String,
    pub thumbnail: Option<String>,
    pub date: Option<String>,
}

impl ImageMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thumbnail: None,
            date: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Parse the creation date
    ///
    /// The backend emits full timestamps (`2020-01-01T10:00:00.000+0000`),
    /// older indices carry plain dates.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?;

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z") {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Cache key (and request path) for a rendition of an image
pub fn cache_key(name: &str, rendition: &str) -> String {
    format!("image/{rendition}?name={name}")
}

/// Sort direction in a search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub order: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortClause {
    pub created: SortOrder,
}

/// Ranked, paginated query body sent to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub from: usize,
    pub size: usize,
    pub sort: Vec<SortClause>,
}

impl PageQuery {
    /// Newest images first, starting at `from`
    pub fn newest_first(from: usize, size: usize) -> Self {
        Self {
            from,
            size,
            sort: vec![SortClause {
                created: SortOrder {
                    order: SortDirection::Desc,
                },
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Option<HitList>,
}

#[derive(Debug, Deserialize)]
struct HitList {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Debug, Deserialize)]
struct HitSource {
    name: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    created: Option<String>,
}

impl From<Hit> for ImageMetadata {
    fn from(hit: Hit) -> Self {
        Self {
            name: hit.source.name,
            thumbnail: hit.source.thumbnail,
            date: hit.source.created,
        }
    }
}

/// Extract image metadata from a search response body
///
/// A body without `hits` yields an empty page.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<ImageMetadata>> {
    let response: SearchResponse = serde_json::from_slice(body)?;

    Ok(response
        .hits
        .map(|list| list.hits.into_iter().map(ImageMetadata::from).collect())
        .unwrap_or_default())
}
