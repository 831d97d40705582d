//! Navigation-level error (§7 "Navigation-level": `NavigationError{uri,
//! Error}`), grounded on hastur's `engine::NavigationError{uri, response}`.

use net::NetError;
use url::Url;

#[derive(Debug, thiserror::Error)]
#[error("navigation to {uri} failed: {source}")]
pub struct NavigationError {
    pub uri: Url,
    #[source]
    pub source: NetError,
}
