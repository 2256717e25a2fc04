use std::time::Duration;

use bytes::BytesMut;
use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;

use crate::{FailureKind, FetchError, RetrievalOutput};

/// Path of the retrieval collaborator's endpoint, relative to the configured base.
pub const FETCH_PATH: &str = "fetch";

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    /// Base URL of the retrieval collaborator.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FetchResponseBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Single attempt; no retries.
    async fn retrieve(&self, url: &str) -> Result<RetrievalOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRetriever {
    settings: RetrievalSettings,
}

impl ReqwestRetriever {
    pub fn new(settings: RetrievalSettings) -> Self {
        Self { settings }
    }

    pub fn fetch_url(&self) -> Result<Url, FetchError> {
        let mut base = Url::parse(&self.settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(FETCH_PATH)
            .map_err(|err| FetchError::new(FailureKind::InvalidEndpoint, err.to_string()))
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<BytesMut, FetchError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Retriever for ReqwestRetriever {
    async fn retrieve(&self, url: &str) -> Result<RetrievalOutput, FetchError> {
        let endpoint = self.fetch_url()?;
        let client = self.build_client()?;
        let payload = serde_json::json!({ "url": url }).to_string();

        engine_debug!("POST {} for url_len={}", endpoint, url.len());
        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response).await?;
        let parsed = serde_json::from_slice::<FetchResponseBody>(&body);

        if !status.is_success() {
            let error = parsed.ok().and_then(|body| body.error);
            return Err(FetchError::new(
                FailureKind::HttpStatus {
                    status: status.as_u16(),
                    error,
                },
                status.to_string(),
            ));
        }

        let parsed = parsed.map_err(|err| {
            engine_warn!("Retrieval response for {} is not valid JSON: {}", url, err);
            FetchError::new(FailureKind::MalformedResponse, err.to_string())
        })?;

        if let Some(error) = parsed.error {
            return Err(FetchError::new(
                FailureKind::RemoteError {
                    status: status.as_u16(),
                    error: error.clone(),
                },
                error,
            ));
        }

        let content = parsed.content.ok_or_else(|| {
            FetchError::new(
                FailureKind::MalformedResponse,
                "response has no content field",
            )
        })?;

        Ok(RetrievalOutput {
            title: parsed.title,
            content,
            status: status.as_u16(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
