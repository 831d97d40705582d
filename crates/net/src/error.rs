//! The four error codes the engine surfaces (§6 "Error codes surfaced by the
//! engine"), unified into one `thiserror` enum per §9's "converge on a
//! single discipline" note (the source mixes `tl::expected` and sentinel
//! return values; this re-implementation doesn't).

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// DNS/connect-level failure.
    #[error("unresolved: {0}")]
    Unresolved(String),
    /// No handler registered for the URL scheme.
    #[error("unhandled scheme: {0}")]
    Unhandled(String),
    /// Malformed status line, undecodable body, or a redirect with a
    /// missing/unparseable `Location`.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// More than 10 redirects.
    #[error("redirect limit exceeded")]
    RedirectLimit,
}
