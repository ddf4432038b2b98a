// Transport trait for reaching the telemetry API
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// Path plus encoded query string, e.g. `/api/data/table?page=2&per_page=20`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.to_string();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Status and undecoded body of a completed exchange, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Short status for the connectivity banner.
    pub fn status_text(&self) -> String {
        match self {
            TransportError::Unreachable(_) => "unreachable".to_string(),
            TransportError::Status { status, .. } => format!("HTTP {}", status),
            TransportError::Decode(_) => "malformed response".to_string(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request. Only failures to complete the exchange are errors;
    /// non-2xx responses come back as `RawResponse`.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}
