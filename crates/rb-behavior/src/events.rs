//! Events routed to behaviors, and the enums they carry.
//!
//! Every [`EngineEvent`] has an [`EventTag`] in one of two namespaces:
//! events that originate from the app/game side and events reported by the
//! robot itself.  Behaviors subscribe by tag.

use std::fmt;

use rb_action::ActionCompleted;
use serde::{Deserialize, Serialize};

// ── Tags ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum GameTag {
    ObjectTapped,
    BehaviorObjectiveAchieved,
    UnlockGranted,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RobotTag {
    ActionCompleted,
    CliffDetected,
    PickedUp,
    ChargerStateChanged,
    FaceObserved,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EventTag {
    Game(GameTag),
    Robot(RobotTag),
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTag::Game(t)  => write!(f, "game:{t:?}"),
            EventTag::Robot(t) => write!(f, "robot:{t:?}"),
        }
    }
}

// ── Payload enums ─────────────────────────────────────────────────────────────

/// Goals a behavior can report as achieved.  Other behaviors may be
/// configured to treat an objective as "I have run" for cooldown purposes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BehaviorObjective {
    PlayedWithCube,
    StackedCubes,
    FoundFaces,
    ReactedToFace,
    PouncedOnFinger,
    Explored,
    Napped,
}

/// Reflex reactions that can pre-empt a behavior.  A reaction may be
/// disabled by several holders at once; it is enabled again only when all
/// of them have re-enabled it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum ReactionTrigger {
    CliffDetected,
    UnexpectedMovement,
    PickedUp,
    PlacedOnCharger,
    ReturnedToTreads,
    DoubleTapDetected,
    FacePositionUpdated,
    ObjectPositionUpdated,
}

impl ReactionTrigger {
    /// Resuming after one of these may loop forever (the robot keeps
    /// driving back to the edge), so such resumes are counted.
    pub fn may_loop_on_resume(self) -> bool {
        matches!(self, ReactionTrigger::CliffDetected | ReactionTrigger::UnexpectedMovement)
    }
}

// ── EngineEvent ───────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug)]
pub enum EngineEvent {
    ObjectTapped { object_id: u32 },
    BehaviorObjectiveAchieved(BehaviorObjective),
    UnlockGranted(String),
    ActionCompleted(ActionCompleted),
    CliffDetected,
    PickedUp,
    ChargerStateChanged { on_charger: bool },
    FaceObserved { face_id: i32 },
}

impl EngineEvent {
    pub fn tag(&self) -> EventTag {
        match self {
            EngineEvent::ObjectTapped { .. } => EventTag::Game(GameTag::ObjectTapped),
            EngineEvent::BehaviorObjectiveAchieved(_) => {
                EventTag::Game(GameTag::BehaviorObjectiveAchieved)
            }
            EngineEvent::UnlockGranted(_) => EventTag::Game(GameTag::UnlockGranted),
            EngineEvent::ActionCompleted(_) => EventTag::Robot(RobotTag::ActionCompleted),
            EngineEvent::CliffDetected => EventTag::Robot(RobotTag::CliffDetected),
            EngineEvent::PickedUp => EventTag::Robot(RobotTag::PickedUp),
            EngineEvent::ChargerStateChanged { .. } => {
                EventTag::Robot(RobotTag::ChargerStateChanged)
            }
            EngineEvent::FaceObserved { .. } => EventTag::Robot(RobotTag::FaceObserved),
        }
    }
}
