//! Builders for search backend responses

use bytes::Bytes;
use serde_json::{Value, json};

/// Builds a search response body in the shape the backend returns
///
/// ```rust
/// use zeitmaschine_test_utils::SearchResponseBuilder;
///
/// let body = SearchResponseBuilder::new()
///     .hit("a.jpg", "b64...", "2020-01-01")
///     .build();
/// assert!(!body.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct SearchResponseBuilder {
    hits: Vec<Value>,
}

impl SearchResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hit with all displayed fields
    pub fn hit(mut self, name: &str, thumbnail: &str, created: &str) -> Self {
        self.hits.push(json!({
            "_index": "zeitmaschine",
            "_source": {
                "name": name,
                "thumbnail": thumbnail,
                "created": created,
            }
        }));
        self
    }

    /// Add `count` hits named `image-<n>.jpg`, numbered from `start`
    pub fn numbered_hits(mut self, start: usize, count: usize) -> Self {
        for n in start..start + count {
            self = self.hit(&format!("image-{n}.jpg"), "", "2020-01-01T00:00:00.000+0000");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn build(self) -> Bytes {
        let total = self.hits.len();
        let body = json!({
            "took": 1,
            "hits": {
                "total": total,
                "hits": self.hits,
            }
        });
        Bytes::from(body.to_string())
    }
}
