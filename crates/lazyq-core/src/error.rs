use thiserror::Error;

/// Canonical result for every lazyq crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure signals raised at the point of violation.
///
/// Nothing here is transient: lazyq is pure and synchronous, so an operation
/// that fails once fails the same way every time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{op}: collection is empty")]
    EmptyCollection { op: &'static str },

    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{op} is not supported by {adapter} positions")]
    Unsupported {
        op: &'static str,
        adapter: &'static str,
    },

    #[error("{op}: position is outside its sequence")]
    Exhausted { op: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    pub fn unsupported(op: &'static str, adapter: &'static str) -> Self {
        Error::Unsupported { op, adapter }
    }

    pub fn exhausted(op: &'static str) -> Self {
        Error::Exhausted { op }
    }

    pub fn empty(op: &'static str) -> Self {
        Error::EmptyCollection { op }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
