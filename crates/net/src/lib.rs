//! Fetching (§6): a `ProtocolHandler` seam, an HTTP(S) implementation atop
//! `ureq`, pluggable content-decoding, bounded redirect following, and an
//! in-memory response cache. Grounded on hastur's `net/`, `protocol/`, and
//! the fetch half of `engine/engine.cpp`.

mod cache;
mod decompress;
mod error;
mod handler;
mod load;
mod response;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use cache::ResponseCache;
pub use decompress::decompress;
pub use error::NetError;
pub use handler::{HttpProtocolHandler, MultiProtocolHandler, ProtocolHandler};
pub use load::load;
pub use response::{Response, StatusLine};
