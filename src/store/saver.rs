use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::trajectory::EpisodeTrajectory;

use super::dir::next_trajectory_index;
use super::error::{StoreError, StoreResult};
use super::metadata::{rebuild_metadata, MetadataRead, MetadataSource, TrajectoryMetadataManager};
use super::registry::AgentStorage;

/// Appends episodes under contiguous, increasing indices.
///
/// Saving only bumps `trajectory_count`; folding the new episode into the
/// victory stats is left to the next stats refresh.
#[derive(Debug, Clone)]
pub struct TrajectorySaver {
    storage: AgentStorage,
    metadata: TrajectoryMetadataManager,
}

impl TrajectorySaver {
    pub fn new(storage: AgentStorage) -> Self {
        let metadata = TrajectoryMetadataManager::new(&storage);
        Self { storage, metadata }
    }

    /// Persist `episode` and return the index it was stored under.
    pub async fn save(&self, episode: &EpisodeTrajectory) -> StoreResult<u64> {
        let _writer = self.storage.lock_writer().await;

        let MetadataRead { mut metadata, source } = self.metadata.read().await?;
        if source != MetadataSource::Loaded {
            metadata = rebuild_metadata(&self.storage).await?;
        }

        let json = episode.to_json()?;
        let index = match self.write_episode(metadata.trajectory_count, json.as_bytes()).await {
            Err(StoreError::AlreadyExists { index, .. }) => {
                // A previous save wrote its file but not the metadata.
                warn!(
                    agent = %self.storage.agent_id(),
                    index,
                    "Trajectory file already present, metadata is behind; rescanning"
                );
                let next = next_trajectory_index(self.storage.dir()).await?;
                self.write_episode(next, json.as_bytes()).await?;
                next
            }
            result => {
                result?;
                metadata.trajectory_count
            }
        };

        metadata.trajectory_count = index + 1;
        self.metadata.write(&metadata).await?;

        info!(
            agent = %self.storage.agent_id(),
            index,
            victorious = episode.victorious,
            actions = episode.delver_actions.len(),
            frames = episode.frame_snapshots.len(),
            "Saved trajectory"
        );
        Ok(index)
    }

    /// Write-once creation of episode file `index`.
    async fn write_episode(&self, index: u64, json: &[u8]) -> StoreResult<()> {
        let path = self.storage.trajectory_path(index);

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists { index, path });
            }
            Err(err) => return Err(StoreError::storage(&path)(err)),
        };

        file.write_all(json).await.map_err(StoreError::storage(&path))?;
        file.sync_all().await.map_err(StoreError::storage(&path))?;
        Ok(())
    }
}
