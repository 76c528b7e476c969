//! Transport to the prediction service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;
use wind_common::{InputRecord, WindError, WindResult};

use crate::config::ClientConfig;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Reply of the service health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub scaler_loaded: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded && self.scaler_loaded
    }
}

/// Operations the prediction service offers.
///
/// `predict` returns the raw reply body; shape decoding is the caller's job.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(&self, input: &InputRecord) -> WindResult<Value>;

    async fn health(&self) -> WindResult<HealthStatus>;
}

/// HTTP implementation of [`PredictionApi`].
#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    client: Client,
    config: ClientConfig,
}

impl HttpPredictionApi {
    pub fn new(config: ClientConfig) -> WindResult<Self> {
        config.validate()?;

        let mut builder = Client::builder().tcp_nodelay(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WindError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    #[instrument(skip(self, input), fields(url = %self.config.predict_url()))]
    async fn predict(&self, input: &InputRecord) -> WindResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, "Sending prediction request");

        let response = self
            .client
            .post(self.config.predict_url())
            .header(REQUEST_ID_HEADER, &request_id)
            .json(input)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    #[instrument(skip(self), fields(url = %self.config.health_url()))]
    async fn health(&self) -> WindResult<HealthStatus> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_json(response).await?;
        serde_json::from_value(body)
            .map_err(|e| WindError::MalformedResponse(format!("health reply is invalid: {}", e)))
    }
}

/// Read a reply body, turning non-2xx statuses into server errors.
async fn read_json(response: Response) -> WindResult<Value> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;
    debug!(status = status.as_u16(), bytes = body.len(), "Received reply");

    if !status.is_success() {
        return Err(WindError::Server {
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| WindError::MalformedResponse(format!("reply body is not JSON: {}", e)))
}

/// Pull the `error` text out of a failure body, if it has a usable one.
pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")?
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn transport_error(err: reqwest::Error) -> WindError {
    if err.is_timeout() {
        WindError::Transport(format!("request timed out: {}", err))
    } else {
        WindError::Transport(err.to_string())
    }
}
