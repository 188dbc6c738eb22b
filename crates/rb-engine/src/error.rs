use rb_behavior::BehaviorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("no behaviors registered")]
    NoBehaviors,

    #[error("duplicate behavior name '{0}'")]
    DuplicateBehavior(String),

    #[error("unknown behavior '{0}'")]
    UnknownBehavior(String),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

pub type EngineResult<T> = Result<T, EngineError>;
