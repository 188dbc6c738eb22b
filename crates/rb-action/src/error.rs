use rb_core::ActionTag;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("tag {0} is already in use by a live action")]
    TagInUse(ActionTag),

    #[error("tag {0} is reserved and cannot be assigned")]
    ReservedTag(ActionTag),
}
