//! Pagination metadata carried in response headers.
//!
//! Collection endpoints report the total number of items in `X-Total-Count`
//! and navigation targets in an RFC 5988 `Link` header:
//!
//! ```text
//! </api/weights?page=1&size=20>; rel="next",</api/weights?page=4&size=20>; rel="last",</api/weights?page=0&size=20>; rel="first"
//! ```

use thiserror::Error;

/// Name of the header carrying the total item count
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Name of the header carrying navigation links
pub const LINK_HEADER: &str = "Link";

/// Error raised when pagination headers are malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Link header was present but empty
    #[error("Link header must not be empty")]
    EmptyLinkHeader,

    /// A link section was not of the form `<url>; rel="name"`
    #[error("Malformed link section: {0}")]
    MalformedLink(String),

    /// A link URL had no usable `page` parameter
    #[error("Link without page number: {0}")]
    MissingPage(String),

    /// Total count header was not a non-negative integer
    #[error("Invalid total count: {0}")]
    InvalidTotalCount(String),
}

/// Page numbers keyed by link relation (`first`, `prev`, `next`, `last`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    links: Vec<(String, u32)>,
}

impl PageLinks {
    /// Parse a `Link` header value
    pub fn parse(header: &str) -> Result<Self, PaginationError> {
        if header.trim().is_empty() {
            return Err(PaginationError::EmptyLinkHeader);
        }

        let mut links = Vec::new();
        for part in header.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (target, rel) = part
                .split_once(';')
                .ok_or_else(|| PaginationError::MalformedLink(part.to_string()))?;

            let url = target
                .trim()
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .ok_or_else(|| PaginationError::MalformedLink(part.to_string()))?;

            let name = rel
                .trim()
                .strip_prefix("rel=\"")
                .and_then(|r| r.strip_suffix('"'))
                .ok_or_else(|| PaginationError::MalformedLink(part.to_string()))?;

            let page = page_param(url).ok_or_else(|| PaginationError::MissingPage(url.to_string()))?;

            links.push((name.to_string(), page));
        }

        Ok(Self { links })
    }

    /// Compute the links for page `page` of a collection of `total` items.
    ///
    /// `next` and `prev` are present only when such a page exists; `last`
    /// and `first` are always present.
    pub fn for_page(page: u32, size: u32, total: u64) -> Self {
        let size = u64::from(size.max(1));
        let total_pages = total.div_ceil(size);
        let last = u32::try_from(total_pages.saturating_sub(1)).unwrap_or(u32::MAX);

        let mut links = Vec::new();
        if u64::from(page) + 1 < total_pages {
            links.push(("next".to_string(), page + 1));
        }
        if page > 0 {
            links.push(("prev".to_string(), page - 1));
        }
        links.push(("last".to_string(), last));
        links.push(("first".to_string(), 0));

        Self { links }
    }

    /// Render as a `Link` header value pointing at `base_url`
    pub fn to_header(&self, base_url: &str, size: u32) -> String {
        self.links
            .iter()
            .map(|(rel, page)| format!("<{}?page={}&size={}>; rel=\"{}\"", base_url, page, size, rel))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Page number for an arbitrary relation
    pub fn get(&self, rel: &str) -> Option<u32> {
        self.links.iter().find(|(name, _)| name == rel).map(|(_, page)| *page)
    }

    pub fn first(&self) -> Option<u32> {
        self.get("first")
    }

    pub fn prev(&self) -> Option<u32> {
        self.get("prev")
    }

    pub fn next(&self) -> Option<u32> {
        self.get("next")
    }

    pub fn last(&self) -> Option<u32> {
        self.get("last")
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Parse an `X-Total-Count` header value
pub fn parse_total_count(value: &str) -> Result<u64, PaginationError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| PaginationError::InvalidTotalCount(value.to_string()))
}

fn page_param(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
