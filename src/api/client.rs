use crate::core::config::EsteiraConfig;
use crate::core::entities::{
    Client, Operation, OperationComment, OperationPayload, StatusHistoryEntry,
};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::workflow::TransitionRequest;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// Errors raised by the pipeline API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        let category = match &error {
            ApiError::Decode(_) => ErrorCategory::SerializationError,
            ApiError::InvalidUrl(_) => ErrorCategory::ConfigError,
            _ => ErrorCategory::TransportError,
        };
        let message = error.to_string();
        AppError::with_source(category, message, Box::new(error))
    }
}

/// Collaborator contract of the external persistence API. The engine only
/// ever reads the pipeline and submits explicit updates; the server remains
/// the source of truth.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// All operations currently in the pipeline.
    async fn fetch_pipeline(&self) -> Result<Vec<Operation>, ApiError>;

    /// Submit a status transition; returns the updated record.
    async fn update_operation_status(
        &self,
        operation_id: i64,
        request: &TransitionRequest,
    ) -> Result<Operation, ApiError>;

    /// Update an operation's flat fields and ficha payload.
    async fn update_operation(
        &self,
        operation_id: i64,
        payload: &OperationPayload,
    ) -> Result<Operation, ApiError>;

    /// Create an operation for a client from a projected ficha payload.
    async fn create_operation(
        &self,
        client_id: i64,
        payload: &OperationPayload,
    ) -> Result<Operation, ApiError>;

    /// Seller-side submit/resend into the pipeline.
    async fn send_to_pipeline(&self, operation_id: i64) -> Result<(), ApiError>;

    async fn fetch_status_history(
        &self,
        operation_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, ApiError>;

    async fn fetch_comments(&self, operation_id: i64) -> Result<Vec<OperationComment>, ApiError>;

    async fn add_comment(
        &self,
        operation_id: i64,
        message: &str,
    ) -> Result<OperationComment, ApiError>;

    async fn fetch_client(&self, client_id: i64) -> Result<Client, ApiError>;
}

/// Reqwest-backed client targeting the configured API base URL.
#[derive(Clone)]
pub struct HttpPipelineClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    #[allow(dead_code)]
    message: String,
}

impl HttpPipelineClient {
    /// Build a client from the loaded configuration.
    pub fn from_config(config: &EsteiraConfig) -> Result<Self, ApiError> {
        let timeout = config
            .request_timeout()
            .map_err(|e| ApiError::InvalidUrl(e.message))?;
        let base_url = Url::parse(config.api.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api.base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpPipelineClient {
            http,
            base_url,
            token: config.api.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }
        // Error payloads arrive as {"error": "..."}; anything else falls
        // back to the HTTP status line.
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        self.request(builder)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

#[async_trait]
impl PipelineApi for HttpPipelineClient {
    async fn fetch_pipeline(&self) -> Result<Vec<Operation>, ApiError> {
        let response = self.send(self.http.get(self.endpoint("pipeline"))).await?;
        Self::decode(response).await
    }

    async fn update_operation_status(
        &self,
        operation_id: i64,
        request: &TransitionRequest,
    ) -> Result<Operation, ApiError> {
        let url = self.endpoint(&format!("operations/{}", operation_id));
        let response = self.send(self.http.put(url).json(request)).await?;
        Self::decode(response).await
    }

    async fn update_operation(
        &self,
        operation_id: i64,
        payload: &OperationPayload,
    ) -> Result<Operation, ApiError> {
        let url = self.endpoint(&format!("operations/{}", operation_id));
        let response = self.send(self.http.put(url).json(payload)).await?;
        Self::decode(response).await
    }

    async fn create_operation(
        &self,
        client_id: i64,
        payload: &OperationPayload,
    ) -> Result<Operation, ApiError> {
        let url = self.endpoint(&format!("clients/{}/operations", client_id));
        let response = self.send(self.http.post(url).json(payload)).await?;
        Self::decode(response).await
    }

    async fn send_to_pipeline(&self, operation_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("operations/{}/send", operation_id));
        let response = self.send(self.http.put(url)).await?;
        let _: MessageBody = Self::decode(response).await?;
        Ok(())
    }

    async fn fetch_status_history(
        &self,
        operation_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, ApiError> {
        let url = self.endpoint(&format!("operations/{}/history", operation_id));
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    async fn fetch_comments(&self, operation_id: i64) -> Result<Vec<OperationComment>, ApiError> {
        let url = self.endpoint(&format!("operations/{}/comments", operation_id));
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    async fn add_comment(
        &self,
        operation_id: i64,
        message: &str,
    ) -> Result<OperationComment, ApiError> {
        let url = self.endpoint(&format!("operations/{}/comments", operation_id));
        let body = serde_json::json!({ "message": message });
        let response = self.send(self.http.post(url).json(&body)).await?;
        Self::decode(response).await
    }

    async fn fetch_client(&self, client_id: i64) -> Result<Client, ApiError> {
        let url = self.endpoint(&format!("clients/{}", client_id));
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }
}
