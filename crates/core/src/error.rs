use thiserror::Error;

/// Errors surfaced by request validation and the rewrite engines.
///
/// Unrecognizable declaration shapes are never errors; they are simply not
/// dependencies and traversal continues past them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("pattern segments must not be empty")]
    EmptyPattern,

    #[error("replacement group must not be empty")]
    EmptyNewGroup,

    /// A computed replacement span fell outside the node text it belongs to.
    /// This is a file-local defect; no edit from that file is applied.
    #[error("edit span {start}..{end} is outside node text of length {len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("malformed XML: {0}")]
    MalformedXml(String),
}
