//! The message broadcast when an action finishes.

use rb_core::ActionTag;

use crate::{ActionResult, RobotActionType};

/// Action-specific payload filled once when an action completes.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum CompletionInfo {
    #[default]
    None,
    /// Name of the animation that played.
    Animation { name: String },
    /// Objects the action interacted with.
    Objects { ids: Vec<u32> },
    /// Results of a compound action's children, in child order.
    Compound { results: Vec<ActionResult> },
    /// Free-form value for actions outside the built-in set.
    Custom(String),
}

/// "Robot completed action" message.
#[derive(Clone, PartialEq, Debug)]
pub struct ActionCompleted {
    pub tag:         ActionTag,
    pub action_type: RobotActionType,
    pub name:        String,
    pub result:      ActionResult,
    pub info:        CompletionInfo,
}
