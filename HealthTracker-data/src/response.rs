use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use health_tracker_domain::pagination::{self, LINK_HEADER, TOTAL_COUNT_HEADER};
use health_tracker_domain::{PageLinks, PaginationError};

use crate::errors::ClientResult;
use crate::transport::RawResponse;

/// Items of a collection response together with its headers and status
#[derive(Debug, Clone)]
pub struct ResponseWrapper<T> {
    /// Response headers, unchanged
    pub headers: HeaderMap,
    /// Decoded items, in the order sent by the server
    pub items: Vec<T>,
    /// HTTP status code
    pub status: StatusCode,
}

impl<T> ResponseWrapper<T> {
    pub fn new(headers: HeaderMap, items: Vec<T>, status: StatusCode) -> Self {
        Self { headers, items, status }
    }

    /// Total number of items across all pages, from `X-Total-Count`
    pub fn total_count(&self) -> ClientResult<Option<u64>> {
        match self.headers.get(TOTAL_COUNT_HEADER) {
            None => Ok(None),
            Some(value) => {
                let raw = header_str(value, || PaginationError::InvalidTotalCount(format!("{:?}", value)))?;
                Ok(Some(pagination::parse_total_count(raw)?))
            }
        }
    }

    /// Navigation links from the `Link` header; empty when the header is absent
    pub fn links(&self) -> ClientResult<PageLinks> {
        match self.headers.get(LINK_HEADER) {
            None => Ok(PageLinks::default()),
            Some(value) => {
                let raw = header_str(value, || PaginationError::MalformedLink(format!("{:?}", value)))?;
                Ok(PageLinks::parse(raw)?)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: DeserializeOwned> ResponseWrapper<T> {
    /// Decode a JSON array body, keeping headers and status
    pub fn from_raw(raw: RawResponse) -> ClientResult<Self> {
        let items = raw.json()?;
        Ok(Self::new(raw.headers, items, raw.status))
    }
}

fn header_str<F>(value: &HeaderValue, on_error: F) -> Result<&str, PaginationError>
where
    F: FnOnce() -> PaginationError,
{
    value.to_str().map_err(|_| on_error())
}

/// Notification attached by the backend to a response through its
/// `X-<app>-alert` / `X-<app>-error` and `X-<app>-params` headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAlert {
    /// Message key, e.g. `healthTrackerApp.weight.created` or `error.idexists`
    pub message: String,
    /// Parameter of the message, usually the entity id or name
    pub param: Option<String>,
    /// Whether the alert came from an error header
    pub is_error: bool,
}

impl EntityAlert {
    /// Extract the alert from response headers, if the backend sent one
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let mut alert: Option<(String, bool)> = None;
        let mut param = None;

        for (name, value) in headers.iter() {
            let name = name.as_str();
            if !name.starts_with("x-") {
                continue;
            }
            let Ok(value) = value.to_str() else {
                continue;
            };

            if name.ends_with("-alert") {
                alert = Some((value.to_string(), false));
            } else if name.ends_with("-error") {
                alert = Some((value.to_string(), true));
            } else if name.ends_with("-params") {
                param = Some(value.to_string());
            }
        }

        alert.map(|(message, is_error)| Self {
            message,
            param,
            is_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_from_raw_keeps_headers() {
        let raw = RawResponse {
            status: StatusCode::OK,
            headers: headers(&[("x-total-count", "2"), ("x-custom", "kept")]),
            body: b"[1, 2]".to_vec(),
        };

        let wrapper: ResponseWrapper<i32> = ResponseWrapper::from_raw(raw).unwrap();
        assert_eq!(wrapper.items, vec![1, 2]);
        assert_eq!(wrapper.status, StatusCode::OK);
        assert_eq!(wrapper.headers.get("x-custom").unwrap(), "kept");
        assert_eq!(wrapper.total_count().unwrap(), Some(2));
        assert_eq!(wrapper.len(), 2);
    }

    #[test]
    fn test_missing_pagination_headers() {
        let wrapper: ResponseWrapper<i32> = ResponseWrapper::new(HeaderMap::new(), vec![], StatusCode::OK);
        assert_eq!(wrapper.total_count().unwrap(), None);
        assert!(wrapper.links().unwrap().is_empty());
        assert!(wrapper.is_empty());
    }

    #[test]
    fn test_links_and_bad_count() {
        let wrapper: ResponseWrapper<i32> = ResponseWrapper::new(
            headers(&[
                ("link", "</api/weights?page=1&size=2>; rel=\"next\",</api/weights?page=0&size=2>; rel=\"first\""),
                ("x-total-count", "lots"),
            ]),
            vec![],
            StatusCode::OK,
        );

        assert_eq!(wrapper.links().unwrap().next(), Some(1));
        assert!(wrapper.total_count().is_err());
    }

    #[test]
    fn test_alert_from_headers() {
        let alert = EntityAlert::from_headers(&headers(&[
            ("x-healthtrackerapp-alert", "healthTrackerApp.weight.created"),
            ("x-healthtrackerapp-params", "12"),
        ]))
        .unwrap();

        assert_eq!(alert.message, "healthTrackerApp.weight.created");
        assert_eq!(alert.param.as_deref(), Some("12"));
        assert!(!alert.is_error);

        let error = EntityAlert::from_headers(&headers(&[("x-healthtrackerapp-error", "error.idexists")])).unwrap();
        assert!(error.is_error);
        assert_eq!(error.param, None);

        assert_eq!(EntityAlert::from_headers(&headers(&[("x-total-count", "3")])), None);
    }
}
