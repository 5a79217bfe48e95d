use thiserror::Error;

/// Kinds of page elements an operation can look up by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum ElementKind {
    #[strum(serialize = "form")]
    Form,
    #[strum(serialize = "table")]
    Table,
    #[strum(serialize = "canvas")]
    Canvas,
    #[strum(serialize = "tab")]
    Tab,
}

/// Core error types for invent-ui
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A page element the operation targets does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: ElementKind, id: String },

    /// The server answered with a non-success status
    #[error("HTTP error! status: {status}")]
    Http {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Key-value store operation failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Delivering an exported file failed
    #[error("Export failed: {0}")]
    Export(String),

    /// The user dismissed a dialog without choosing
    #[error("Cancelled")]
    Cancelled,
}

impl Error {
    /// Text suitable for a user-facing notification.
    ///
    /// Server-provided messages win over the generic wording.
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound { kind, .. } => {
                let mut name = kind.to_string();
                if let Some(first) = name.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{name} not found")
            }
            Error::Http {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Http { .. } => "An error occurred".to_string(),
            Error::Transport(_) => "Network error. Please try again.".to_string(),
            Error::Export(reason) => format!("Export failed: {reason}"),
            other => other.to_string(),
        }
    }
}

/// Failures reported by a [`crate::core::storage::KeyValueStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("storage is disabled")]
    Disabled,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failures reported by a [`crate::core::http::Transport`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, Error>;
