//! Small shared types with no business logic of their own, kept in one place
//! so `net`, `html`, `css`, and `browser` don't each redefine them.

/// What kind of resource a fetch was issued for. Used for logging and for
/// deciding whether a failed sub-resource fetch degrades gracefully.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Html,
    Css,
    Image,
}

/// Monotonic id handed out per navigation; useful for correlating logs when
/// stylesheet fetches race each other.
pub type RequestId = u64;
