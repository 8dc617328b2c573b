//! HTTP implementation of [`BlobTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, ETAG, IF_MATCH};
use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use super::transport::{BlobTransport, FetchedBlob, VersionToken};
use crate::crypto::{AccessCredential, KdfParams};
use crate::error::{DiaryError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const JOURNAL_PATH: &str = "/journal";
const KDF_PATH: &str = "/journal/kdf";

/// Client for the journal blob endpoints.
#[derive(Debug, Clone)]
pub struct SyncClient {
    base_url: String,
    http: reqwest::Client,
}

impl SyncClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8787`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DiaryError::InvalidInput(format!(
                "Server URL must start with http:// or https:// (got {})",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiaryError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BlobTransport for SyncClient {
    async fn kdf_params(&self) -> Result<KdfParams> {
        let url = self.url(KDF_PATH);
        debug!(%url, "fetching key-derivation parameters");

        let response = check_status(self.http.get(&url).send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| DiaryError::Network(format!("Invalid KDF parameters from server: {}", e)))
    }

    async fn fetch_blob(&self, credential: &AccessCredential) -> Result<FetchedBlob> {
        let url = self.url(JOURNAL_PATH);
        debug!(%url, "fetching journal blob");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, credential.as_str())
            .send()
            .await?;
        let response = check_status(response).await?;
        let version = etag(&response);
        let body = response.text().await?;

        debug!(bytes = body.len(), version = ?version, "fetched journal blob");
        Ok(FetchedBlob { body, version })
    }

    async fn push_blob(
        &self,
        credential: &AccessCredential,
        blob: &str,
        expected: Option<&VersionToken>,
    ) -> Result<Option<VersionToken>> {
        let url = self.url(JOURNAL_PATH);
        debug!(%url, bytes = blob.len(), conditional = expected.is_some(), "pushing journal blob");

        let mut request = self
            .http
            .put(&url)
            .header(AUTHORIZATION, credential.as_str())
            .header(CONTENT_TYPE, "text/plain")
            .body(blob.to_string());
        if let Some(version) = expected {
            request = request.header(IF_MATCH, version.to_header());
        }

        let response = check_status(request.send().await?).await?;
        Ok(etag(&response))
    }
}

fn etag(response: &Response) -> Option<VersionToken> {
    response
        .headers()
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .and_then(VersionToken::from_header)
}

/// Map non-success responses onto the error taxonomy.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(DiaryError::Unauthorized),
        StatusCode::PRECONDITION_FAILED => Err(DiaryError::Conflict),
        _ => {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "server returned an error");
            Err(DiaryError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
