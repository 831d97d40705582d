//! Bounded redirect following (§6, §8 scenario table), grounded on hastur's
//! `Engine::load`: follow `Location` through up to 10 redirects (301, 302,
//! 307, 308), never issuing more than 11 `handle` calls for one `load`.

use std::sync::atomic::{AtomicU64, Ordering};

use core_types::RequestId;
use log::debug;
use url::Url;

use crate::error::NetError;
use crate::handler::ProtocolHandler;
use crate::response::Response;

const MAX_HANDLE_CALLS: usize = 11;

/// Handed out per `load()` call so its `handle` hops can be told apart in
/// logs when several loads race each other (§5 "Shared resources").
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(0);

pub fn load(handler: &dyn ProtocolHandler, start: Url) -> Result<(Response, Url), NetError> {
    let request_id: RequestId = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
    let mut url = start;

    for attempt in 0..MAX_HANDLE_CALLS {
        debug!("[{request_id}] fetching {url} (attempt {attempt})");
        let response = handler.handle(&url)?;
        if !response.is_redirect() {
            return Ok((response, url));
        }
        if attempt == MAX_HANDLE_CALLS - 1 {
            return Err(NetError::RedirectLimit);
        }

        let location = response
            .header("location")
            .ok_or_else(|| NetError::InvalidResponse("redirect response missing Location header".to_string()))?;
        url = url
            .join(location)
            .map_err(|_| NetError::InvalidResponse(format!("unparseable redirect Location {location:?}")))?;
    }

    unreachable!("loop always returns before exhausting MAX_HANDLE_CALLS iterations")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProtocolHandler;
    use crate::response::StatusLine;

    fn redirect_to(location: &str) -> Response {
        Response {
            status_line: StatusLine { code: 302, reason: "Found".to_string(), ..Default::default() },
            headers: vec![("Location".to_string(), location.to_string())],
            body: Vec::new(),
        }
    }

    fn ok(body: &str) -> Response {
        Response { status_line: StatusLine::default(), headers: Vec::new(), body: body.as_bytes().to_vec() }
    }

    #[test]
    fn follows_a_single_redirect() {
        let mock = MockProtocolHandler::new();
        mock.set("https://a.example/start", redirect_to("https://a.example/end"));
        mock.set("https://a.example/end", ok("done"));

        let (resp, final_url) = load(&mock, Url::parse("https://a.example/start").unwrap()).unwrap();
        assert_eq!(resp.body, b"done");
        assert_eq!(final_url.as_str(), "https://a.example/end");
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn ten_redirects_then_a_page_succeeds() {
        let mock = MockProtocolHandler::new();
        for i in 0..10 {
            mock.set(&format!("https://a.example/{i}"), redirect_to(&format!("https://a.example/{}", i + 1)));
        }
        mock.set("https://a.example/10", ok("arrived"));

        let (resp, _) = load(&mock, Url::parse("https://a.example/0").unwrap()).unwrap();
        assert_eq!(resp.body, b"arrived");
        assert_eq!(mock.call_count(), 11);
    }

    #[test]
    fn eleven_redirects_exceeds_the_limit() {
        let mock = MockProtocolHandler::new();
        for i in 0..11 {
            mock.set(&format!("https://a.example/{i}"), redirect_to(&format!("https://a.example/{}", i + 1)));
        }
        mock.set("https://a.example/11", ok("never reached"));

        let err = load(&mock, Url::parse("https://a.example/0").unwrap()).unwrap_err();
        assert!(matches!(err, NetError::RedirectLimit));
        assert_eq!(mock.call_count(), 11);
    }

    #[test]
    fn missing_location_header_is_an_invalid_response() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/start",
            Response { status_line: StatusLine { code: 302, ..Default::default() }, headers: Vec::new(), body: Vec::new() },
        );

        let err = load(&mock, Url::parse("https://a.example/start").unwrap()).unwrap_err();
        assert!(matches!(err, NetError::InvalidResponse(_)));
    }
}
