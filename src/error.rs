use thiserror::Error;

pub type DashResult<T> = Result<T, DashError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashError {
    #[error("invalid date: `{0}`")]
    InvalidDate(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashError {
    /// Converts the error into the inline message shown next to the action
    /// that triggered it.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Transport(_) => "Unable to reach the server. Please try again.".to_owned(),
            Self::Http { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure is the 401 class that triggers token refresh.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Http { status: 401, .. })
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
