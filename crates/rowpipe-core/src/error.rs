use thiserror::Error;

/// Canonical result for rowpipe.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A pull was attempted past the end of a source.
    #[error("source exhausted")]
    Exhausted,

    #[error("attribute '{name}' not found")]
    AttributeMissing { name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // Core does no I/O itself; sources in rowpipe-io map read failures here
    // so they can travel as stream items.
    #[error("I/O error in source: {0}")]
    IoLike(String),
}

impl Error {
    pub fn missing(name: impl Into<String>) -> Self {
        Error::AttributeMissing { name: name.into() }
    }

    /// True for the end-of-source condition, which some stages recover from.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::Exhausted)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
