use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    pub fn content_not_found(content_id: impl std::fmt::Display) -> Self {
        PlaybackError::NotFound(format!("content {content_id} does not exist"))
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
