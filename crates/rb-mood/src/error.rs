use rb_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoodError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("unknown emotion type {0:?}")]
    UnknownEmotion(String),

    #[error("mood configuration error: {0}")]
    Config(String),
}

pub type MoodResult<T> = Result<T, MoodError>;
