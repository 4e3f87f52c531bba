use std::time::Duration;

use factcheck_logging::{fc_debug, fc_info};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::types::ServiceErrorBody;
use crate::{FailureKind, PredictionError, PredictionRequest, PredictionResponse};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: Url,
    /// `None` keeps the transport default.
    pub connect_timeout: Option<Duration>,
    /// `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl ClientSettings {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: 64 * 1024,
        }
    }

    /// Parses `endpoint` and accepts only http(s) URLs.
    pub fn parse(endpoint: &str) -> Result<Self, PredictionError> {
        let url = Url::parse(endpoint.trim())
            .map_err(|err| PredictionError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(Self::new(url)),
            other => Err(PredictionError::new(
                FailureKind::InvalidEndpoint,
                format!("unsupported scheme {other}"),
            )),
        }
    }
}

#[async_trait::async_trait]
pub trait PredictionClient: Send + Sync {
    /// Performs exactly one request/response exchange. No retries.
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPredictionClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestPredictionClient {
    pub fn new(settings: ClientSettings) -> Result<Self, PredictionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| PredictionError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, PredictionError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl PredictionClient for ReqwestPredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| PredictionError::new(FailureKind::InvalidRequest, err.to_string()))?;
        fc_debug!(
            "POST {} title_len={} text_len={}",
            self.settings.endpoint,
            request.title.len(),
            request.text.len()
        );

        let response = self
            .client
            .post(self.settings.endpoint.clone())
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // The body is only used to enrich the diagnostic.
            let detail = self
                .read_body(response)
                .await
                .ok()
                .and_then(|bytes| serde_json::from_slice::<ServiceErrorBody>(&bytes).ok())
                .map(|body| body.error)
                .unwrap_or_else(|| status.to_string());
            return Err(PredictionError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail,
            ));
        }

        let bytes = self.read_body(response).await?;
        let parsed: PredictionResponse = serde_json::from_slice(&bytes)
            .map_err(|err| PredictionError::new(FailureKind::MalformedBody, err.to_string()))?;
        fc_info!(
            "prediction={} probability={:?}",
            parsed.prediction,
            parsed.probability
        );
        Ok(parsed)
    }
}

fn too_large(max_bytes: u64, actual: u64) -> PredictionError {
    PredictionError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> PredictionError {
    if err.is_timeout() {
        return PredictionError::new(FailureKind::Timeout, err.to_string());
    }
    PredictionError::new(FailureKind::Network, err.to_string())
}
