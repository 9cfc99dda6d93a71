use std::path::Path;

use tracing::{debug, warn};

use crate::trajectory::EpisodeTrajectory;

use super::error::{StoreError, StoreResult};
use super::registry::AgentStorage;

/// Read one episode file.
///
/// `Ok(None)` when the file does not exist; [`StoreError::Decode`] when it
/// exists but does not hold a valid episode.
pub(crate) async fn read_trajectory(path: &Path) -> StoreResult<Option<EpisodeTrajectory>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::storage(path)(err)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads saved episodes of one agent by index.
#[derive(Debug, Clone)]
pub struct TrajectoryLoader {
    storage: AgentStorage,
}

impl TrajectoryLoader {
    pub fn new(storage: AgentStorage) -> Self {
        Self { storage }
    }

    pub fn agent_id(&self) -> &str {
        self.storage.agent_id()
    }

    /// Load episode `index`. A missing file is logged and returned as `None`.
    pub async fn load(&self, index: u64) -> StoreResult<Option<EpisodeTrajectory>> {
        let path = self.storage.trajectory_path(index);
        let episode = read_trajectory(&path).await?;

        match &episode {
            Some(e) => debug!(
                agent = %self.storage.agent_id(),
                index,
                actions = e.delver_actions.len(),
                frames = e.frame_snapshots.len(),
                "Loaded trajectory"
            ),
            None => warn!(path = %path.display(), "Trajectory file not found"),
        }

        Ok(episode)
    }
}
