//! Shared fixtures for unit tests: a scripted transport and sample payloads.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::transport::{ApiRequest, RawResponse, Transport};

#[derive(Clone, Debug)]
pub(crate) enum MockReply {
    Status(u16, String),
    /// Same as `Status`, answered only after the given extra delay.
    After(Duration, u16, String),
    NetworkDown,
}

pub(crate) fn ok(body: Value) -> MockReply {
    MockReply::Status(200, body.to_string())
}

pub(crate) fn empty_ok() -> MockReply {
    MockReply::Status(200, String::new())
}

pub(crate) fn status(code: u16, body: &str) -> MockReply {
    MockReply::Status(code, body.to_owned())
}

/// Transport that replays canned replies per `"METHOD /path"` route.
///
/// Queued replies are consumed in order; the last one repeats forever.
/// Unknown routes answer `404`.
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<MockReply>>>,
    calls: Mutex<Vec<ApiRequest>>,
    latency: Duration,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self { routes: Mutex::new(HashMap::new()), calls: Mutex::new(Vec::new()), latency: Duration::ZERO }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn on(self, method: &str, path: &str, reply: MockReply) -> Self {
        self.push(method, path, reply);
        self
    }

    pub(crate) fn push(&self, method: &str, path: &str, reply: MockReply) {
        self.routes
            .lock()
            .unwrap()
            .entry(format!("{method} {path}"))
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, method: &str, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method.as_str() == method && req.path == path)
            .count()
    }

    fn next_reply(&self, route: &str) -> Option<MockReply> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(route)?;
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let route = format!("{} {}", request.method, request.path);
        self.calls.lock().unwrap().push(request);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.next_reply(&route) {
            Some(MockReply::Status(code, body)) => Ok(raw(code, body)),
            Some(MockReply::After(delay, code, body)) => {
                tokio::time::sleep(delay).await;
                Ok(raw(code, body))
            }
            Some(MockReply::NetworkDown) => Err(ApiError::Network("connection refused".to_owned())),
            None => Ok(raw(404, String::new())),
        }
    }
}

fn raw(code: u16, body: String) -> RawResponse {
    RawResponse {
        status: code,
        status_text: reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_owned(),
        body,
    }
}

pub(crate) fn client_over(transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::new(Arc::clone(transport) as Arc<dyn Transport>)
}

pub(crate) fn user_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "email": format!("user{id}@example.com"), "role": "student" })
}

pub(crate) fn login_json(id: i64, name: &str) -> Value {
    json!({ "success": true, "user": user_json(id, name), "message": "Login successful" })
}

pub(crate) fn course_json(id: i64, title: &str, published: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("About {title}"),
        "teacher_id": 3,
        "is_published": published
    })
}

pub(crate) fn enrollment_row_json(enrollment_id: i64, course_id: i64, progress: u8) -> Value {
    json!({
        "enrollment_id": enrollment_id,
        "course": course_json(course_id, "Introduction to Python", true),
        "progress_percent": progress
    })
}

pub(crate) fn comment_json(id: i64, course_id: i64, text: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "course_id": course_id,
        "text": text,
        "created_at": "2024-11-15T10:00:00Z",
        "user_name": "Alice Johnson"
    })
}
