//! Test utilities for spendsim-core
//!
//! Provides a mock OpenAI-compatible server that records the requests it
//! receives, for backend tests and local development.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Content returned by a successful mock chat completion
pub const MOCK_SUMMARY: &str = "You spent most on groceries, mainly at Tesco.";

/// How the mock server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockChatReply {
    /// 200 with a single choice containing `MOCK_SUMMARY`
    Summary,
    /// 500 on every endpoint
    ServerError,
    /// 200 with an empty `choices` array
    NoChoices,
}

/// A chat completion request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: MockChatReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock OpenAI-compatible server for testing
pub struct MockChatServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockChatServer {
    /// Start a server that answers with a summary
    pub async fn start() -> Self {
        Self::start_with(MockChatReply::Summary).await
    }

    /// Start the mock server on an available port
    pub async fn start_with(reply: MockChatReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            requests,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Chat completion requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing (health check)
async fn handle_models(State(state): State<MockState>) -> Response {
    if state.reply == MockChatReply::ServerError {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model registry offline").into_response();
    }

    Json(json!({
        "object": "list",
        "data": [{ "id": "mock-model", "object": "model", "owned_by": "spendsim" }]
    }))
    .into_response()
}

async fn handle_chat(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let model = body["model"].as_str().unwrap_or("mock-model").to_string();

    let request = RecordedRequest {
        authorization,
        body,
    };
    state.requests.lock().unwrap().push(request);

    let choices = match state.reply {
        MockChatReply::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream overloaded").into_response();
        }
        MockChatReply::NoChoices => json!([]),
        MockChatReply::Summary => json!([{
            "index": 0,
            "message": { "role": "assistant", "content": MOCK_SUMMARY },
            "finish_reason": "stop"
        }]),
    };

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": choices
    }))
    .into_response()
}
