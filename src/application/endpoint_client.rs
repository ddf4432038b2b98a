// Endpoint client - One request, one classified outcome
use crate::application::connectivity_monitor::ConnectivityMonitor;
use crate::application::transport::{ApiRequest, Method, Transport, TransportError};
use crate::domain::pagination::PageWindow;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentSnapshot,
    LatestReading,
    Stats,
    History,
    Table,
    OccupancyHistory,
    EstimatorStatus,
    RegressionStatus,
    RegressionScatter,
    RegressionTrain,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CurrentSnapshot => "/api/occupancy/current",
            Endpoint::LatestReading => "/api/data/latest",
            Endpoint::Stats => "/api/data/stats",
            Endpoint::History => "/api/data/history",
            Endpoint::Table => "/api/data/table",
            Endpoint::OccupancyHistory => "/api/occupancy/history",
            Endpoint::EstimatorStatus => "/api/estimator/status",
            Endpoint::RegressionStatus => "/api/regression/status",
            Endpoint::RegressionScatter => "/api/regression/scatter",
            Endpoint::RegressionTrain => "/api/regression/train",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::RegressionTrain => Method::Post,
            _ => Method::Get,
        }
    }
}

/// Standard response shape of every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    pagination: Option<PageWindow>,
}

#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub data: T,
    pub pagination: Option<PageWindow>,
    pub message: Option<String>,
}

/// Outcome of one call. Transport problems never escape as errors; they are
/// logged, reported to the connectivity monitor and collapsed into `Failed`.
#[derive(Debug, Clone)]
pub enum CallResult<T> {
    Success(Payload<T>),
    /// The server answered with `success: false`.
    Rejected { error: String },
    Failed,
}

impl<T> CallResult<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, CallResult::Failed)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    connectivity: Arc<ConnectivityMonitor>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, connectivity: Arc<ConnectivityMonitor>) -> Self {
        Self {
            transport,
            connectivity,
        }
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> CallResult<T> {
        let request = ApiRequest {
            method: endpoint.method(),
            path: endpoint.path(),
            query,
        };

        match self.exchange(&request).await {
            Ok(result) => {
                self.connectivity.record_response(request.path);
                if let CallResult::Rejected { error } = &result {
                    tracing::debug!("{} rejected: {}", request.path, error);
                }
                result
            }
            Err(e) => {
                tracing::warn!("API error {}: {}", request.path_and_query(), e);
                self.connectivity.record_failure(request.path, &e);
                CallResult::Failed
            }
        }
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<CallResult<T>, TransportError> {
        let response = self.transport.send(request).await?;

        let envelope = match serde_json::from_str::<Envelope>(&response.body) {
            Ok(envelope) => envelope,
            Err(_) if !response.is_success() => {
                return Err(TransportError::Status {
                    status: response.status,
                    body: response.body,
                });
            }
            Err(e) => return Err(TransportError::Decode(e.to_string())),
        };

        if !envelope.success {
            let error = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Ok(CallResult::Rejected { error });
        }

        let data = serde_json::from_value::<T>(envelope.data)
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(CallResult::Success(Payload {
            data,
            pagination: envelope.pagination,
            message: envelope.message,
        }))
    }
}
