//! Recording mock transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use adapters::error::{ExchangeError, Result};
use adapters::transport::{RawResponse, Request, Transport};
use parking_lot::Mutex;

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses.lock().push_back(Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.respond(status, &body.to_string());
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(ExchangeError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<RawResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ExchangeError::Transport("no response queued".into())))
    }
}
