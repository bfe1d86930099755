use crate::walker::Method;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while walking routes and building documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The route walker could not produce the next route
    Walk(String),
    /// A formatting function rejected a route
    Format {
        method: Method,
        path: String,
        message: String,
    },
    InvalidArgument(String),
}

impl Error {
    /// Build a formatting error for the given route
    pub fn format(method: Method, path: &str, message: impl Into<String>) -> Self {
        Error::Format {
            method,
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Walk(msg) => write!(f, "route walk failed: {}", msg),
            Error::Format {
                method,
                path,
                message,
            } => write!(f, "failed to format {} {}: {}", method, path, message),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
