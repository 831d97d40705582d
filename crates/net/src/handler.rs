//! Protocol handlers (§6 "Protocol handler"): the seam the orchestrator
//! fetches through. Grounded on hastur's `protocol/handler_factory.h`, which
//! dispatches by URL scheme to a registered handler and fails closed for
//! schemes nobody registered.

use std::collections::HashMap;
use std::io::Read;

use url::Url;

use crate::error::NetError;
use crate::response::{Response, StatusLine};

/// `Sync`: the orchestrator's stylesheet fetch fan-out (§4.8 step 6, §5)
/// shares one handler across threads.
pub trait ProtocolHandler: Sync {
    fn handle(&self, url: &Url) -> Result<Response, NetError>;
}

/// Dispatches by scheme to a registered handler. Unregistered schemes fail
/// with `NetError::Unhandled` rather than silently falling through to HTTP.
pub struct MultiProtocolHandler {
    handlers: HashMap<String, Box<dyn ProtocolHandler>>,
}

impl MultiProtocolHandler {
    /// Registers `http`/`https` against [`HttpProtocolHandler`].
    pub fn with_default_user_agent(user_agent: impl Into<String>) -> Self {
        let mut m = MultiProtocolHandler { handlers: HashMap::new() };
        let http = HttpProtocolHandler::new(user_agent.into());
        m.handlers.insert("http".to_string(), Box::new(http.clone()));
        m.handlers.insert("https".to_string(), Box::new(http));
        m
    }

    pub fn register(&mut self, scheme: impl Into<String>, handler: Box<dyn ProtocolHandler>) {
        self.handlers.insert(scheme.into(), handler);
    }
}

impl ProtocolHandler for MultiProtocolHandler {
    fn handle(&self, url: &Url) -> Result<Response, NetError> {
        match self.handlers.get(url.scheme()) {
            Some(h) => h.handle(url),
            None => Err(NetError::Unhandled(url.scheme().to_string())),
        }
    }
}

/// Plain HTTP(S) fetch via `ureq`. Redirects are disabled at the transport
/// level (`redirects(0)`) so 3xx responses come back intact for the
/// orchestrator's bounded redirect loop in [`crate::load`] to inspect.
#[derive(Clone)]
pub struct HttpProtocolHandler {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpProtocolHandler {
    pub fn new(user_agent: String) -> Self {
        let agent = ureq::AgentBuilder::new().redirects(0).build();
        HttpProtocolHandler { agent, user_agent }
    }
}

impl ProtocolHandler for HttpProtocolHandler {
    fn handle(&self, url: &Url) -> Result<Response, NetError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(NetError::Unhandled(url.scheme().to_string()));
        }

        let req = self.agent.get(url.as_str()).set("User-Agent", &self.user_agent);
        match req.call() {
            Ok(resp) => convert(resp),
            Err(ureq::Error::Status(_, resp)) => convert(resp),
            Err(ureq::Error::Transport(t)) => Err(NetError::Unresolved(t.to_string())),
        }
    }
}

fn convert(resp: ureq::Response) -> Result<Response, NetError> {
    let status_line = StatusLine {
        version: format!("HTTP/{}", resp.http_version()),
        code: resp.status(),
        reason: resp.status_text().to_string(),
    };
    let headers = resp
        .headers_names()
        .into_iter()
        .filter_map(|name| resp.header(&name).map(|v| (name, v.to_string())))
        .collect();

    let mut body = Vec::new();
    resp.into_reader()
        .read_to_end(&mut body)
        .map_err(|e| NetError::InvalidResponse(format!("failed to read body: {e}")))?;

    Ok(Response { status_line, headers, body })
}
