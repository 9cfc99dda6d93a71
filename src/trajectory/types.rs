//! Episode data recorded by the simulator.
//!
//! An [`EpisodeTrajectory`] carries two parallel replay tracks:
//! - `delver_actions` for action-based replay (re-run the inputs through a
//!   live simulator),
//! - `frame_snapshots` for state-based replay (apply recorded entity state
//!   directly, optionally interpolated).

use serde::{Deserialize, Serialize};

use crate::entity::LiveEntity;
use crate::snapshot::FrameSnapshot;

// ---------------------------------------------------------------------------
// Delver input
// ---------------------------------------------------------------------------

/// Horizontal run input. Encoded as `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum RunDirection {
    Left,
    #[default]
    Still,
    Right,
}

impl TryFrom<i8> for RunDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Left),
            0 => Ok(Self::Still),
            1 => Ok(Self::Right),
            other => Err(format!("run direction must be -1, 0 or 1, got {other}")),
        }
    }
}

impl From<RunDirection> for i8 {
    fn from(value: RunDirection) -> Self {
        match value {
            RunDirection::Left => -1,
            RunDirection::Still => 0,
            RunDirection::Right => 1,
        }
    }
}

/// One input sample fed to the delver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelverAction {
    pub run: RunDirection,
    pub jump: bool,
}

impl DelverAction {
    pub fn new(run: RunDirection, jump: bool) -> Self {
        Self { run, jump }
    }
}

// ---------------------------------------------------------------------------
// Episode
// ---------------------------------------------------------------------------

/// Everything recorded about one episode.
///
/// Built up by the simulator while the episode runs, then handed to the
/// saver once and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeTrajectory {
    /// Sampling rate of both tracks.
    pub actions_per_second: u32,
    /// Whether the delver reached the goal.
    #[serde(default)]
    pub victorious: bool,
    /// Identifies the level configuration the episode was played on.
    #[serde(default)]
    pub level_hash: String,
    #[serde(default)]
    pub delver_actions: Vec<DelverAction>,
    #[serde(default)]
    pub frame_snapshots: Vec<FrameSnapshot>,
}

impl EpisodeTrajectory {
    pub fn new(actions_per_second: u32) -> Self {
        Self {
            actions_per_second,
            victorious: false,
            level_hash: String::new(),
            delver_actions: Vec::new(),
            frame_snapshots: Vec::new(),
        }
    }

    pub fn with_level_hash(mut self, level_hash: impl Into<String>) -> Self {
        self.level_hash = level_hash.into();
        self
    }

    pub fn add_delver_action(&mut self, action: DelverAction) {
        self.delver_actions.push(action);
    }

    pub fn add_frame_snapshot(&mut self, frame: FrameSnapshot) {
        self.frame_snapshots.push(frame);
    }

    /// Capture the given live entities as the next frame.
    pub fn record_frame<'a, I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = &'a dyn LiveEntity>,
    {
        self.add_frame_snapshot(FrameSnapshot::capture(entities));
    }

    pub fn set_victorious(&mut self, victorious: bool) {
        self.victorious = victorious;
    }

    /// Length of the action track in seconds; 0 for a zero rate.
    pub fn duration_secs(&self) -> f64 {
        if self.actions_per_second == 0 {
            return 0.0;
        }
        self.delver_actions.len() as f64 / self.actions_per_second as f64
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
