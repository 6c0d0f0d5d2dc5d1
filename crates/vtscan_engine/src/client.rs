use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;
use vtscan_core::{FileSubmission, IndicatorKind};

pub const DEFAULT_BASE_URL: &str = "https://www.virustotal.com/api/v3";

const API_KEY_HEADER: &str = "x-apikey";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    /// `None` leaves the call bounded only by the transport.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response body (status {status}): {message}")]
    MalformedBody { status: u16, message: String },
}

/// Status code and decoded JSON body of one round trip.
///
/// Error statuses are not turned into `Err`; callers decide what a
/// non-success means for their step.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `error.message` from an error body.
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|err| err.get("message"))
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
    }

    /// `data.id` from a submission body.
    pub fn analysis_id(&self) -> Option<&str> {
        self.body
            .get("data")
            .and_then(|data| data.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// `data.attributes.status` from an analysis body.
    pub fn analysis_status(&self) -> Option<&str> {
        self.body
            .get("data")
            .and_then(|data| data.get("attributes"))
            .and_then(|attrs| attrs.get("status"))
            .and_then(Value::as_str)
    }
}

#[async_trait::async_trait]
pub trait VtApi: Send + Sync {
    /// `GET /files/{sha256}`
    async fn file_report(&self, sha256: &str) -> Result<ApiResponse, ApiError>;
    /// `POST /files` with multipart field `file`.
    async fn upload_file(&self, file: &FileSubmission) -> Result<ApiResponse, ApiError>;
    /// `GET /analyses/{id}`
    async fn analysis(&self, analysis_id: &str) -> Result<ApiResponse, ApiError>;
    /// `POST /urls` with multipart field `url`.
    async fn submit_url(&self, url: &str) -> Result<ApiResponse, ApiError>;
    /// `GET /urls/{url_id}`
    async fn url_report(&self, url_id: &str) -> Result<ApiResponse, ApiError>;
    /// `GET /domains/{v}`, `/ip_addresses/{v}` or `/files/{v}` depending on `kind`.
    async fn indicator_report(
        &self,
        kind: IndicatorKind,
        value: &str,
    ) -> Result<ApiResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestVtClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestVtClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::Client(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.get(self.endpoint(path))).await
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<ApiResponse, ApiError> {
        self.send(self.client.post(self.endpoint(path)).multipart(form))
            .await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.settings.api_key)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(err) if status.is_success() => {
                    return Err(ApiError::MalformedBody {
                        status: status.as_u16(),
                        message: err.to_string(),
                    });
                }
                // Error pages are often HTML; the status alone is enough there.
                Err(_) => Value::Null,
            }
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait::async_trait]
impl VtApi for ReqwestVtClient {
    async fn file_report(&self, sha256: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("files/{sha256}")).await
    }

    async fn upload_file(&self, file: &FileSubmission) -> Result<ApiResponse, ApiError> {
        let body = reqwest::Body::from(file.bytes().clone());
        let part = Part::stream_with_length(body, file.size()).file_name(file.name().to_string());
        self.post_form("files", Form::new().part("file", part)).await
    }

    async fn analysis(&self, analysis_id: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("analyses/{analysis_id}")).await
    }

    async fn submit_url(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.post_form("urls", Form::new().text("url", url.to_string()))
            .await
    }

    async fn url_report(&self, url_id: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("urls/{url_id}")).await
    }

    async fn indicator_report(
        &self,
        kind: IndicatorKind,
        value: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.get(&format!("{}/{value}", kind.resource())).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    ApiError::Network(err.to_string())
}
