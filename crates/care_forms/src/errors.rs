use std::time::Duration;

use thiserror::Error;

/// Misuse of the form API (as opposed to invalid user input, which ends up
/// in the session's field errors).
#[derive(Error, Debug)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("value for field `{field}` has the wrong type: {source}")]
    TypeMismatch {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record does not serialize to an object")]
    NotAnObject,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure reported by a save handler.
///
/// The coordinator never propagates these; it maps them to the session's
/// general error message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Rejected(String),

    #[error("save timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

impl SaveError {
    /// Whether this error should be reported with the connectivity message.
    ///
    /// Handlers that only have an opaque message (e.g. a failed `fetch`) are
    /// classified by looking at the message text.
    pub fn is_network(&self) -> bool {
        match self {
            SaveError::Network(_) => true,
            SaveError::Rejected(msg) | SaveError::Other(msg) => mentions_network(msg),
            SaveError::Timeout(_) => false,
        }
    }

    /// The handler supplied message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SaveError::Network(msg) | SaveError::Rejected(msg) | SaveError::Other(msg) => {
                let msg = msg.trim();
                (!msg.is_empty()).then_some(msg)
            }
            SaveError::Timeout(_) => None,
        }
    }
}

fn mentions_network(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    lower.contains("network") || lower.contains("fetch") || msg.contains("ネットワーク")
}
