use rb_core::CoreError;
use rb_mood::MoodError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Mood(#[from] MoodError),

    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("behavior '{0}' is not runnable")]
    NotRunnable(String),

    #[error("behavior '{name}' failed to start: {reason}")]
    InitFailed { name: String, reason: String },

    #[error("behavior '{name}' refused to resume after {resumes} resumes from cliff or movement")]
    TooManyResumes { name: String, resumes: u32 },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
