//! Document API client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::Credentials;
use crate::document::{DocumentFile, DocumentNode};

use super::error::FetchError;

/// Header carrying the personal access token.
const TOKEN_HEADER: &str = "X-Figma-Token";

/// Fallback when a 429 carries no usable Retry-After.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const MAX_RETRY_AFTER_SECS: u64 = 3600;

/// Response of the image export endpoint.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImageExport {
    /// Node id to rendered SVG URL. `None` when the node could not be rendered.
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
    #[serde(default)]
    pub err: Option<String>,
}

/// Calls the pipeline makes against the design document service.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Fetch the whole document tree.
    async fn fetch_document(&self) -> Result<DocumentNode, FetchError>;

    /// Request SVG renders for a batch of node ids.
    async fn export_svgs(&self, node_ids: &[String]) -> Result<ImageExport, FetchError>;

    /// Download one rendered SVG.
    async fn download(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed client for the Figma REST API.
pub struct FigmaClient {
    client: Client,
    base: String,
    credentials: Credentials,
}

impl FigmaClient {
    pub fn new(
        base: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("swatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base, endpoint, self.credentials.document_key)
    }
}

#[async_trait]
impl DocumentApi for FigmaClient {
    async fn fetch_document(&self) -> Result<DocumentNode, FetchError> {
        let url = self.url("files");
        debug!("Fetching document: {}", url);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.credentials.token)
            .send()
            .await?;
        let file: DocumentFile = check_status(response).await?.json().await?;
        debug!(name = %file.name, "document fetched");
        Ok(file.document)
    }

    async fn export_svgs(&self, node_ids: &[String]) -> Result<ImageExport, FetchError> {
        let url = self.url("images");
        debug!("Requesting {} exports", node_ids.len());

        let ids = node_ids.join(",");
        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.credentials.token)
            .query(&[("ids", ids.as_str()), ("format", "svg")])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn download(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        Ok(check_status(response).await?.text().await?)
    }
}

/// Map non-success statuses onto `FetchError`.
async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok());
        return Err(FetchError::RateLimited {
            retry_after_ms: retry_after_ms(retry_after),
        });
    }

    Err(FetchError::Http {
        status: status.as_u16(),
        message: response.text().await.unwrap_or_default(),
    })
}

/// Milliseconds to wait for a `Retry-After` header value in seconds.
///
/// Missing or non-numeric values fall back to the default. Values are
/// capped at an hour.
fn retry_after_ms(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
        .min(MAX_RETRY_AFTER_SECS)
        .saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_response_with_nulls() {
        let json = r#"{"err": null, "images": {"1:1": "https://cdn/a.svg", "1:2": null}, "status": 200}"#;
        let export: ImageExport = serde_json::from_str(json).unwrap();

        assert_eq!(export.err, None);
        assert_eq!(export.images["1:1"].as_deref(), Some("https://cdn/a.svg"));
        assert_eq!(export.images["1:2"], None);
    }

    #[test]
    fn test_export_error_body() {
        let json = r#"{"err": "Render timeout", "images": {}}"#;
        let export: ImageExport = serde_json::from_str(json).unwrap();
        assert_eq!(export.err.as_deref(), Some("Render timeout"));
    }

    #[test]
    fn test_endpoint_urls() {
        let credentials = Credentials {
            token: "t".to_string(),
            document_key: "abc123".to_string(),
        };
        let client =
            FigmaClient::new("https://api.figma.com/v1/", credentials, Duration::from_secs(5))
                .unwrap();

        assert_eq!(client.url("files"), "https://api.figma.com/v1/files/abc123");
        assert_eq!(client.url("images"), "https://api.figma.com/v1/images/abc123");
    }

    #[test]
    fn test_retry_after_header() {
        assert_eq!(retry_after_ms(Some("5")), 5_000);
        assert_eq!(retry_after_ms(Some(" 12 ")), 12_000);
        assert_eq!(retry_after_ms(None), DEFAULT_RETRY_AFTER_SECS * 1000);
        assert_eq!(retry_after_ms(Some("soon")), DEFAULT_RETRY_AFTER_SECS * 1000);
    }

    #[test]
    fn test_huge_retry_after_is_capped() {
        assert_eq!(
            retry_after_ms(Some("18446744073709551615")),
            MAX_RETRY_AFTER_SECS * 1000
        );
    }
}
