//! Parse and render error types.

use crate::node::NodeKind;

/// Error raised while reading gemtext or writing HTML.
///
/// Malformed markup never produces an error; only the underlying
/// source and sink can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading from the input source failed.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based number of the line being read.
        line: usize,
        #[source]
        source: std::io::Error,
    },
    /// Writing a rendered node to the sink failed.
    #[error("failed to write {node:?} node: {source}")]
    Write {
        /// Node being rendered when the sink failed.
        node: NodeKind,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for gemtext operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
