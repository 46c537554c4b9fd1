//! Mock content transport for testing.

use async_trait::async_trait;
use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use imgbed_store::{ContentRequest, ContentResponse, ContentTransport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with a status and body
    Response(u16, Vec<u8>),
    /// Fail without a response
    Unreachable(String),
}

/// Transport that replays scripted replies and records every request.
///
/// Clones share the same script and request log, so a test can keep one handle while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ContentRequest>>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push_response(&self, status: u16, body: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Response(status, body.into().into_bytes()));
        self
    }

    /// Queue a response with a binary body.
    pub fn push_bytes(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Response(status, body.into()));
        self
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push_response(status, body.to_string())
    }

    /// Queue a transport failure.
    pub fn push_unreachable(&self, message: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Unreachable(message.into()));
        self
    }

    /// Number of requests sent through this transport.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Snapshot of the recorded requests.
    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> ContentRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl ContentTransport for MockTransport {
    async fn send(&self, request: ContentRequest) -> StoreResult<ContentResponse> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Response(status, body)) => Ok(ContentResponse::new(status, body)),
            Some(MockReply::Unreachable(message)) => {
                Err(StoreError::new(StoreErrorKind::RemoteUnavailable {
                    status: None,
                    message,
                }))
            }
            None => panic!("MockTransport received an unscripted request"),
        }
    }
}
