use thiserror::Error;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The enumerator cannot perform the requested operation (e.g. `reset`
    /// on a one-shot source).
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),

    /// The caller broke the pull protocol.
    #[error("enumerator protocol violation: {0}")]
    Protocol(String),

    #[error("sequence contains no elements ({0})")]
    Empty(&'static str),

    #[error("no element matched the predicate ({0})")]
    NoMatch(&'static str),

    #[error("more than one element matched ({0})")]
    AmbiguousMatch(&'static str),

    #[error("index {index} is out of range for a sequence of {len} elements")]
    OutOfRange { index: usize, len: usize },

    /// Failure raised by a user-supplied callback.
    #[error("callback failed: {0}")]
    Callback(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn callback(msg: impl Into<String>) -> Self {
        Error::Callback(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
