//! Time-indexed cursors over a recorded episode.
//!
//! Both tracks are sampled at `actions_per_second`, so sample `i` covers the
//! time span `[i / rate, (i + 1) / rate)`.

use crate::snapshot::{interpolate_frame_snapshots, FrameSnapshot, SnapshotError};

use super::types::{DelverAction, EpisodeTrajectory};

/// Serves interpolated frames for state-based replay.
#[derive(Debug, Clone, Copy)]
pub struct StateReplay<'a> {
    trajectory: &'a EpisodeTrajectory,
}

impl<'a> StateReplay<'a> {
    pub fn new(trajectory: &'a EpisodeTrajectory) -> Self {
        Self { trajectory }
    }

    /// World state `elapsed_secs` into the episode.
    ///
    /// Before the first sample this is the first frame, at or past the last
    /// sample it is the last frame; in between the two surrounding frames are
    /// interpolated. `None` when nothing was recorded.
    pub fn frame_at(&self, elapsed_secs: f64) -> Result<Option<FrameSnapshot>, SnapshotError> {
        let frames = &self.trajectory.frame_snapshots;
        let Some(first) = frames.first() else {
            return Ok(None);
        };

        let position = elapsed_secs * self.trajectory.actions_per_second as f64;
        // Also catches NaN.
        if !(position > 0.0) {
            return Ok(Some(first.clone()));
        }

        let index = position.floor() as usize;
        if index >= frames.len() - 1 {
            return Ok(frames.last().cloned());
        }

        let alpha = position - index as f64;
        interpolate_frame_snapshots(&frames[index], &frames[index + 1], alpha).map(Some)
    }
}

/// Serves recorded inputs for action-based replay.
#[derive(Debug, Clone, Copy)]
pub struct ActionReplay<'a> {
    trajectory: &'a EpisodeTrajectory,
}

impl<'a> ActionReplay<'a> {
    pub fn new(trajectory: &'a EpisodeTrajectory) -> Self {
        Self { trajectory }
    }

    /// Input active at `elapsed_secs`; `None` before the start or past the end.
    pub fn action_at(&self, elapsed_secs: f64) -> Option<DelverAction> {
        if elapsed_secs.is_nan() || elapsed_secs < 0.0 {
            return None;
        }
        let index = (elapsed_secs * self.trajectory.actions_per_second as f64).floor() as usize;
        self.trajectory.delver_actions.get(index).copied()
    }

    pub fn duration_secs(&self) -> f64 {
        self.trajectory.duration_secs()
    }
}
