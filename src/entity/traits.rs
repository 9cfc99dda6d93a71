//! Capability traits and the small enums they report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical condition of an entity, driven by impacts it receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityState {
    #[default]
    Normal,
    Knockback,
    Tumbling,
}

/// Movement phase of a skeletal entity.
///
/// Stored by its textual value. Names this build does not know (for example
/// a delver's `JUMP`) are kept verbatim in [`LocomotionState::Other`] so they
/// survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocomotionState {
    #[default]
    Idle,
    Run,
    GoUp,
    Fall,
    Land,
    Other(String),
}

impl LocomotionState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "IDLE",
            Self::Run => "RUN",
            Self::GoUp => "GO_UP",
            Self::Fall => "FALL",
            Self::Land => "LAND",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for LocomotionState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IDLE" => Self::Idle,
            "RUN" => Self::Run,
            "GO_UP" => Self::GoUp,
            "FALL" => Self::Fall,
            "LAND" => Self::Land,
            _ => Self::Other(value),
        }
    }
}

impl From<LocomotionState> for String {
    fn from(value: LocomotionState) -> Self {
        match value {
            LocomotionState::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of a runtime entity the recorder and the replay driver touch.
///
/// Getters are used during capture, setters only during state-based replay.
pub trait LiveEntity {
    /// Stable, spawn-derived identifier, unique within an episode.
    fn entity_id(&self) -> &str;

    fn position(&self) -> [f64; 2];

    fn velocity(&self) -> [f64; 2];

    /// Rotation in degrees.
    fn angle(&self) -> f64;

    fn angular_velocity(&self) -> f64;

    fn state(&self) -> EntityState;

    fn set_position(&mut self, position: [f64; 2]);

    fn set_angle(&mut self, angle: f64);

    fn set_state(&mut self, state: EntityState);

    /// `Some` when the entity is animated by a skeleton.
    ///
    /// This is the capability the factory provider dispatches on.
    fn as_skeletal(&self) -> Option<&dyn SkeletalEntity> {
        None
    }

    fn as_skeletal_mut(&mut self) -> Option<&mut dyn SkeletalEntity> {
        None
    }
}

/// An entity driven by a skeleton with named locomotion phases.
pub trait SkeletalEntity: LiveEntity {
    fn locomotion_state(&self) -> LocomotionState;

    /// Name of the animation the skeleton is currently playing, if any.
    fn animation_name(&self) -> Option<&str>;

    fn set_locomotion_state(&mut self, state: LocomotionState);

    /// Start playing `name` on the skeleton. `None` stops the current animation.
    fn run_animation(&mut self, name: Option<&str>);
}
