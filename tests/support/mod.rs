//! Local HTTP stand-in for the Provider's POST endpoint.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-token";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub token: Option<String>,
    pub method: String,
    pub parameters: Value,
}

type Responder = dyn Fn(&RecordedRequest) -> (StatusCode, String) + Send + Sync;

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Box<Responder>,
}

pub struct MockProvider {
    pub url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockProvider {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let state = Arc::new(MockState {
            requests: Mutex::new(vec![]),
            responder: Box::new(responder),
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock provider");
        let addr = listener.local_addr().expect("mock provider addr");
        let app = Router::new().route("/", post(handle)).with_state(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock provider server");
        });

        Self {
            url: format!("http://{}/", addr),
            state,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("mock provider poisoned").clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.method).collect()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let parameters = form
        .get("parameters")
        .and_then(|p| serde_json::from_str(p).ok())
        .unwrap_or(Value::Null);
    let recorded = RecordedRequest {
        token: headers
            .get("X-API-TOKEN")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        method: form.get("method").cloned().unwrap_or_default(),
        parameters,
    };
    let reply = (state.responder)(&recorded);
    state.requests.lock().expect("mock provider poisoned").push(recorded);
    reply
}

pub fn ok(body: Value) -> (StatusCode, String) {
    (StatusCode::OK, body.to_string())
}

pub fn orders(ids: impl IntoIterator<Item = u64>) -> Value {
    let orders: Vec<Value> = ids
        .into_iter()
        .map(|i| json!({"order_id": i, "order_status_id": 1, "email": format!("buyer{}@example.com", i)}))
        .collect();
    json!({"status": "SUCCESS", "orders": orders})
}
