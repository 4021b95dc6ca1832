//! An in-memory stand-in for the Kubernetes API server.
//!
//! It understands just enough of the REST conventions for `get`, `create` and `replace`: objects
//! are stored by their item path, creating assigns a `uid` and a `resourceVersion`, replacing
//! keeps the `uid` and bumps the `resourceVersion`.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use http::{Method, Request, Response, StatusCode};
use kube::client::Body;
use kube_builders::client::Client;
use serde_json::{Value, json};
use tower::Service;

pub const FIELD_MANAGER: &str = "kube-builders-test";

/// A request as seen by the [`FakeApiServer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Value>,
    requests: Vec<RecordedRequest>,
    failures: HashMap<(Method, String), StatusCode>,
    next_uid: u64,
}

#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a [`Client`] talking to this server.
    pub fn client(&self) -> Client {
        Client::new(
            kube::Client::new(self.clone(), "default"),
            Some(FIELD_MANAGER.to_string()),
        )
    }

    /// Stores `object` at `path`, as if it had been created before.
    pub fn insert(&self, path: &str, mut object: Value) {
        let mut state = self.state.lock().unwrap();
        state.next_uid += 1;
        object["metadata"]["uid"] = json!(format!("uid-{}", state.next_uid));
        object["metadata"]["resourceVersion"] = json!("1");
        state.objects.insert(path.to_string(), object);
    }

    pub fn object(&self, path: &str) -> Option<Value> {
        self.state.lock().unwrap().objects.get(path).cloned()
    }

    /// Answers every `method` request for `path` with `status`.
    pub fn fail(&self, method: Method, path: &str, status: StatusCode) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), status);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Returns the method and path of every request, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|request| (request.method, request.path))
            .collect()
    }
}

impl State {
    fn handle(&mut self, method: Method, path: &str, body: &[u8]) -> (StatusCode, Value) {
        if let Some(status) = self.failures.get(&(method.clone(), path.to_string())) {
            return status_response(*status, "injected failure");
        }

        match method {
            Method::GET => match self.objects.get(path) {
                Some(object) => (StatusCode::OK, object.clone()),
                None => status_response(StatusCode::NOT_FOUND, "not found"),
            },
            Method::POST => {
                let mut object: Value = serde_json::from_slice(body).unwrap();
                let name = object["metadata"]["name"].as_str().unwrap().to_string();
                let item_path = format!("{path}/{name}");
                if self.objects.contains_key(&item_path) {
                    return status_response(StatusCode::CONFLICT, "already exists");
                }

                self.next_uid += 1;
                object["metadata"]["uid"] = json!(format!("uid-{}", self.next_uid));
                object["metadata"]["resourceVersion"] = json!("1");
                self.objects.insert(item_path, object.clone());
                (StatusCode::CREATED, object)
            }
            Method::PUT => {
                let Some(current) = self.objects.get(path) else {
                    return status_response(StatusCode::NOT_FOUND, "not found");
                };

                let resource_version = current["metadata"]["resourceVersion"]
                    .as_str()
                    .and_then(|version| version.parse::<u64>().ok())
                    .unwrap_or_default();
                let mut object: Value = serde_json::from_slice(body).unwrap();
                object["metadata"]["uid"] = current["metadata"]["uid"].clone();
                object["metadata"]["resourceVersion"] =
                    json!((resource_version + 1).to_string());
                self.objects.insert(path.to_string(), object.clone());
                (StatusCode::OK, object)
            }
            _ => status_response(StatusCode::METHOD_NOT_ALLOWED, "unsupported method"),
        }
    }
}

fn status_response(status: StatusCode, message: &str) -> (StatusCode, Value) {
    let reason = match status {
        StatusCode::NOT_FOUND => "NotFound",
        StatusCode::CONFLICT => "AlreadyExists",
        StatusCode::FORBIDDEN => "Forbidden",
        _ => "InternalError",
    };

    (
        status,
        json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": message,
            "reason": reason,
            "code": status.as_u16(),
        }),
    )
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = body.collect_bytes().await?;

            let (status, value) = {
                let mut state = state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    method: parts.method.clone(),
                    path: parts.uri.path().to_string(),
                    query: parts.uri.query().map(str::to_string),
                });
                state.handle(parts.method, parts.uri.path(), &body)
            };

            let response = Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&value)?))?;
            Ok(response)
        })
    }
}
