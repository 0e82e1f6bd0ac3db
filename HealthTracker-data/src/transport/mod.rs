// HTTP transport layer
mod reqwest_transport;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientResult;
use crate::response::EntityAlert;

pub use reqwest_transport::ReqwestTransport;

/// A request relative to the backend base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb
    pub method: Method,
    /// Path relative to the base URL, e.g. `api/weights/3`
    pub path: String,
    /// Query-string pairs, in order
    pub query: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    /// Attach query-string pairs
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// A successful response as received from the transport, body untouched
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Alert announced by the backend in the response headers
    pub fn alert(&self) -> Option<EntityAlert> {
        EntityAlert::from_headers(&self.headers)
    }
}

/// Performs one HTTP round trip.
///
/// Implementations resolve [`ApiRequest::path`] against their base URL and
/// turn any non-2xx answer into `ClientError::Status`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_constructors() {
        let request = ApiRequest::post("api/weights", json!({"weight": 80.5}));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "api/weights");
        assert_eq!(request.body, Some(json!({"weight": 80.5})));
        assert!(request.query.is_empty());

        let request = ApiRequest::get("api/weights").with_query(vec![("page".to_string(), "1".to_string())]);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.body, None);
        assert_eq!(request.query.len(), 1);

        assert_eq!(ApiRequest::delete("api/weights/1").method, Method::DELETE);
        assert_eq!(ApiRequest::put("api/weights", json!({})).method, Method::PUT);
    }

    #[test]
    fn test_raw_response_decoding() {
        let response = RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: br#"{"id": 5}"#.to_vec(),
        };
        let value: Value = response.json().unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(response.text(), r#"{"id": 5}"#);

        let garbage = RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: b"<html>".to_vec(),
        };
        assert!(garbage.json::<Value>().is_err());
    }
}
