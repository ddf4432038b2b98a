// Scripted transport for deterministic tests
use crate::application::transport::{ApiRequest, RawResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Clone)]
enum Reply {
    Response(RawResponse),
    Unreachable,
}

struct Queued {
    reply: Reply,
    gate: Option<oneshot::Receiver<()>>,
}

/// Replies per path: queued one-shot replies first, then the standing reply.
/// Paths with nothing scripted are unreachable.
#[derive(Default)]
pub struct ScriptedTransport {
    standing: Mutex<HashMap<&'static str, Reply>>,
    queued: Mutex<HashMap<&'static str, VecDeque<Queued>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &'static str, status: u16, body: &str) {
        self.standing.lock().unwrap().insert(
            path,
            Reply::Response(RawResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, path: &'static str) {
        self.standing.lock().unwrap().insert(path, Reply::Unreachable);
    }

    /// Queue a single reply that is held back until the returned sender fires.
    pub fn respond_gated(&self, path: &'static str, status: u16, body: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queued
            .lock()
            .unwrap()
            .entry(path)
            .or_default()
            .push_back(Queued {
                reply: Reply::Response(RawResponse {
                    status,
                    body: body.to_string(),
                }),
                gate: Some(rx),
            });
        tx
    }

    /// Every request seen so far, as path plus query.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.split('?').next() == Some(path))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.path_and_query());

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(request.path)
            .and_then(|q| q.pop_front());

        let reply = match queued {
            Some(Queued { reply, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                reply
            }
            None => self
                .standing
                .lock()
                .unwrap()
                .get(request.path)
                .cloned()
                .unwrap_or(Reply::Unreachable),
        };

        match reply {
            Reply::Response(response) => Ok(response),
            Reply::Unreachable => Err(TransportError::Unreachable("connection refused".to_string())),
        }
    }
}

/// Session backed by the in-memory chart engine and display board.
pub fn test_session() -> (
    std::sync::Arc<crate::application::session::Session>,
    std::sync::Arc<crate::infrastructure::retained_chart::RetainedChartEngine>,
    std::sync::Arc<crate::presentation::display_board::DisplayBoard>,
) {
    use crate::application::session::Session;
    use crate::application::widget_cache::StaleWritePolicy;
    use crate::infrastructure::retained_chart::RetainedChartEngine;
    use crate::presentation::display_board::DisplayBoard;
    use std::sync::Arc;

    let engine = Arc::new(RetainedChartEngine::new());
    let board = Arc::new(DisplayBoard::new());
    let session = Arc::new(Session::new(engine.clone(), board.clone(), StaleWritePolicy::Accept));
    (session, engine, board)
}
