//! Error types for the signup board

/// Errors that can occur in the signup board
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Server rejected request with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("{email} is not listed for {activity}")]
    UnknownParticipant { activity: String, email: String },

    #[error("Request already in flight: {0}")]
    Busy(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

impl BoardError {
    /// The server-supplied detail of a rejected request, if any
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            BoardError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for signup board operations
pub type Result<T> = std::result::Result<T, BoardError>;
