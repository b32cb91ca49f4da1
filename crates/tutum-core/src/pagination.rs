//! List envelope returned by Tutum collection endpoints.
//!
//! ```json
//! {"meta": {"limit": 25, "next": "/api/v1/stack/?limit=25&offset=25", "offset": 0,
//!           "previous": null, "total_count": 42},
//!  "objects": [...]}
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::API_PATH_PREFIX;
use crate::error::Result;

/// One page of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    /// Pagination metadata.
    #[serde(default)]
    pub meta: PageMeta,
    /// Items on this page, in server order.
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
}

impl<T> Page<T> {
    /// Returns the next page reference when it is present and non-empty.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        self.meta.next.as_deref().filter(|next| !next.is_empty())
    }
}

/// Pagination metadata of a [`Page`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Reference to the following page; `null` or empty on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// Reference to the preceding page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Index of the first item of this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Size of the whole collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

/// Turns a link handed out by the API (a `meta.next` reference or a `resource_uri`) into
/// a request path for a client whose base URL has the path `base_path`.
///
/// The link may be an absolute URL or root-relative; only its path and query are kept, so
/// the follow-up request always goes to the client's own host. A path under `base_path`
/// or under the API prefix `/api/v1/` comes back relative to the base URL, which keeps it
/// beneath any prefix the base URL carries. Any other path stays root-relative.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidEndpoint`] when the reference cannot be parsed.
pub fn request_path(link: &str, base_path: &str) -> Result<String> {
    let anchor = Url::parse("http://localhost/")?;
    let url = anchor.join(link)?;
    let full = url.path();
    let path = full
        .strip_prefix(base_path)
        .or_else(|| full.strip_prefix(API_PATH_PREFIX))
        .unwrap_or(full);
    Ok(match url.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    })
}
