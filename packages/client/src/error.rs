use thiserror::Error;

/// Coarse failure class, used by front-ends to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, invalid or expired token. Resolved by a fresh login.
    Authentication,
    /// The backend rejected the request. Shown to the user verbatim.
    Validation,
    /// The request never produced a usable response.
    Transport,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP 401. The re-login callback has already been invoked.
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx response. `message` is the response body, or the
    /// status reason when the body is empty.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx response without the body the operation promises.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unauthorized => ErrorKind::Authentication,
            ClientError::Identity(_) => ErrorKind::Authentication,
            ClientError::Api { .. } => ErrorKind::Validation,
            ClientError::Transport(_)
            | ClientError::Decode(_)
            | ClientError::EmptyResponse(_)
            | ClientError::Io(_) => ErrorKind::Transport,
        }
    }

    /// Returns the HTTP status for backend rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
