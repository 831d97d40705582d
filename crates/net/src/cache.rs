//! An in-memory response cache keyed by canonical URL, reset at the start
//! of each navigation so a page's sub-resources (stylesheets, images) are
//! fetched once even when referenced from several places in the document.
//! Not part of the hastur source; added because the orchestrator's
//! concurrent stylesheet fan-out (§4.8) can otherwise issue the same
//! request twice when two `<link>` elements share an `href`.

use std::collections::HashMap;
use std::sync::Mutex;

use url::Url;

use crate::error::NetError;
use crate::handler::ProtocolHandler;
use crate::response::Response;

/// `Mutex`, not `RefCell`: the stylesheet fetch fan-out (§4.8 step 6, §5)
/// shares one handler across threads, so this cache has to be `Sync`.
pub struct ResponseCache<H> {
    inner: H,
    entries: Mutex<HashMap<String, Response>>,
}

impl<H: ProtocolHandler> ResponseCache<H> {
    pub fn new(inner: H) -> Self {
        ResponseCache { inner, entries: Mutex::new(HashMap::new()) }
    }

    /// Called at the start of a fresh navigation; a cache surviving across
    /// navigations would serve stale redirects/stylesheets forever.
    pub fn reset(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl<H: ProtocolHandler> ProtocolHandler for ResponseCache<H> {
    fn handle(&self, url: &Url) -> Result<Response, NetError> {
        let key = url.as_str().to_string();
        if let Some(hit) = self.entries.lock().unwrap().get(&key) {
            return Ok(hit.clone());
        }
        let response = self.inner.handle(url)?;
        self.entries.lock().unwrap().insert(key, response.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProtocolHandler;
    use crate::response::StatusLine;

    #[test]
    fn second_fetch_of_the_same_url_hits_the_cache() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/style.css",
            Response { status_line: StatusLine::default(), headers: Vec::new(), body: b"body{color:red}".to_vec() },
        );
        let cached = ResponseCache::new(mock);
        let url = Url::parse("https://a.example/style.css").unwrap();

        cached.handle(&url).unwrap();
        cached.handle(&url).unwrap();

        assert_eq!(cached.inner.call_count(), 1);
    }

    #[test]
    fn reset_clears_the_cache() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/x",
            Response { status_line: StatusLine::default(), headers: Vec::new(), body: b"one".to_vec() },
        );
        let cached = ResponseCache::new(mock);
        let url = Url::parse("https://a.example/x").unwrap();

        cached.handle(&url).unwrap();
        cached.reset();
        cached.handle(&url).unwrap();

        assert_eq!(cached.inner.call_count(), 2);
    }
}
