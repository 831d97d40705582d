//! An in-memory `ProtocolHandler` for integration tests that don't want
//! real sockets (§6, used by the orchestrator's own test suite). Gated
//! behind the `test-support` feature so it never ships in the default
//! build. Uses `Mutex` rather than `RefCell` so the mock can sit behind the
//! same `&dyn ProtocolHandler` the concurrent stylesheet fetch fan-out
//! shares across threads.

use std::collections::HashMap;
use std::sync::Mutex;

use url::Url;

use crate::error::NetError;
use crate::handler::ProtocolHandler;
use crate::response::Response;

#[derive(Default)]
pub struct MockProtocolHandler {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<String>>,
}

impl MockProtocolHandler {
    pub fn new() -> Self {
        MockProtocolHandler::default()
    }

    pub fn set(&self, url: &str, response: Response) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProtocolHandler for MockProtocolHandler {
    fn handle(&self, url: &Url) -> Result<Response, NetError> {
        self.calls.lock().unwrap().push(url.as_str().to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| NetError::Unresolved(format!("no mock response registered for {url}")))
    }
}
