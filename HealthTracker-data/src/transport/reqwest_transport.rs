use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, error};
use url::Url;

use super::{ApiRequest, HttpTransport, RawResponse};
use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::response::EntityAlert;

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let url = self.base_url.join(&request.path)?;
        debug!("{} {} query={:?}", request.method, url, request.query);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            let error_key = EntityAlert::from_headers(&headers)
                .filter(|alert| alert.is_error)
                .map(|alert| alert.message);
            error!("{} {} failed with status {}", request.method, request.path, status);

            return Err(ClientError::Status {
                status,
                error_key,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!("{} {} -> {} ({} bytes)", request.method, request.path, status, body.len());

        Ok(RawResponse { status, headers, body })
    }
}
