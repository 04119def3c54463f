use std::io;

use reqwest::StatusCode;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The service answered with a structured `{error, error_description}` body.
    #[error("edifice error ({code}): {}", description.as_deref().unwrap_or("no description"))]
    AuthService {
        code: String,
        description: Option<String>,
    },
    /// Non-success status whose body could not be read as a structured error.
    #[error("request failed ({status}): {body}")]
    Transport { status: StatusCode, body: String },
    /// No response was obtained at all.
    #[error("connectivity error: {0}")]
    Connectivity(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Deserialization(#[from] serde_json::Error),
    /// Caller misuse detected before any request was sent.
    #[error("invalid client state: {0}")]
    LocalState(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// Copy of a failure that carried a non-cloneable source.
    #[error("{message}")]
    Replayed { message: String, retryable: bool },
}

impl AppError {
    pub fn is_auth_service(&self) -> bool {
        matches!(self, Self::AuthService { .. })
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connectivity(_) => true,
            Self::Replayed { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// An equivalent error for a second caller. Variants wrapping foreign
    /// errors keep only their message and retryability.
    pub(crate) fn replay(&self) -> AppError {
        match self {
            Self::AuthService { code, description } => Self::AuthService {
                code: code.clone(),
                description: description.clone(),
            },
            Self::Transport { status, body } => Self::Transport {
                status: *status,
                body: body.clone(),
            },
            Self::LocalState(message) => Self::LocalState(message.clone()),
            Self::Config(message) => Self::Config(message.clone()),
            Self::InvalidInput(message) => Self::InvalidInput(message.clone()),
            other => Self::Replayed {
                message: other.to_string(),
                retryable: other.is_retryable(),
            },
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::AuthService { code, .. } => Some(code),
            _ => None,
        }
    }
}
