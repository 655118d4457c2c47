use std::fmt;

/// Result type for matchfeed-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Location selection is incomplete or inconsistent
    InvalidLocation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLocation(msg) => write!(f, "Invalid location: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
