//! Error types for two-party protocol execution

use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running an OT or coin-tossing session
///
/// Every variant is fatal to the session that produced it. A caller that wants
/// to try again must start a new session with fresh randomness.
#[derive(Debug, Error)]
pub enum Error {
    /// A received value failed a membership test or a proof did not verify
    #[error("Cheat attempt detected: {0}")]
    CheatAttempt(String),

    /// Caller supplied inputs that violate a precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A received message did not decode into the expected shape
    #[error("Protocol format error: {0}")]
    ProtocolFormat(String),

    /// Transport failure on send or receive
    #[error("I/O error during {context}: {source}")]
    Io {
        /// Protocol step that was running when the transport failed
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A local message could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build an I/O error tagged with the step that failed
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// Prefix the context of an I/O error with `step`, leaving other variants untouched
    pub fn with_context(self, step: &str) -> Self {
        match self {
            Error::Io { context, source } => Error::Io {
                context: format!("{step} ({context})"),
                source,
            },
            other => other,
        }
    }

    /// Whether the error is evidence of a misbehaving or incompatible peer
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::CheatAttempt(_) | Error::ProtocolFormat(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ProtocolFormat(e.to_string())
    }
}
