//! The per-agent `metadata.json` document.
//!
//! Metadata is a cache over the episode files, never ground truth: losing
//! it only costs a full stats recompute. Reads therefore recover from a
//! missing or undecodable document by returning the zero value, and report
//! which of those happened through [`MetadataSource`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::dir::next_trajectory_index;
use super::error::{StoreError, StoreResult};
use super::registry::AgentStorage;

/// Aggregate counters folded from the first `amount` episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryStats {
    /// High-water mark: episodes `0..amount` are included in `victories`.
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub victories: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryMetadata {
    /// Number of saved episodes, which is also the next save index.
    #[serde(default)]
    pub trajectory_count: u64,
    #[serde(default)]
    pub stats: TrajectoryStats,
}

impl TrajectoryMetadata {
    /// Whether `stats` already covers every saved episode.
    pub fn stats_current(&self) -> bool {
        self.stats.amount >= self.trajectory_count
    }
}

/// How a metadata read was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// Decoded from `metadata.json`.
    Loaded,
    /// No file yet; zero value returned.
    Missing,
    /// File present but undecodable; zero value returned.
    Recovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataRead {
    pub metadata: TrajectoryMetadata,
    pub source: MetadataSource,
}

/// Metadata to use when `metadata.json` was missing or unreadable: the
/// count is recovered from the files on disk and stats start over.
pub(crate) async fn rebuild_metadata(storage: &AgentStorage) -> StoreResult<TrajectoryMetadata> {
    let trajectory_count = next_trajectory_index(storage.dir()).await?;
    if trajectory_count > 0 {
        warn!(
            agent = %storage.agent_id(),
            trajectory_count,
            "Rebuilt trajectory count from files on disk"
        );
    }
    Ok(TrajectoryMetadata {
        trajectory_count,
        ..TrajectoryMetadata::default()
    })
}

/// Reads and atomically rewrites one agent's metadata document.
#[derive(Debug, Clone)]
pub struct TrajectoryMetadataManager {
    path: PathBuf,
}

impl TrajectoryMetadataManager {
    pub fn new(storage: &AgentStorage) -> Self {
        Self {
            path: storage.metadata_path(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the document. Only genuine I/O failures are errors.
    pub async fn read(&self) -> StoreResult<MetadataRead> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MetadataRead {
                    metadata: TrajectoryMetadata::default(),
                    source: MetadataSource::Missing,
                });
            }
            Err(err) => return Err(StoreError::storage(&self.path)(err)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(metadata) => Ok(MetadataRead {
                metadata,
                source: MetadataSource::Loaded,
            }),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Could not decode metadata, resetting");
                Ok(MetadataRead {
                    metadata: TrajectoryMetadata::default(),
                    source: MetadataSource::Recovered,
                })
            }
        }
    }

    /// Replace the whole document.
    ///
    /// Written to a sibling temp file, synced, then renamed over the old
    /// one, so readers see either the previous or the new document.
    pub async fn write(&self, metadata: &TrajectoryMetadata) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(metadata)?;
        let tmp = self.path.with_extension("json.tmp");

        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(StoreError::storage(&tmp))?;
        file.write_all(&json).await.map_err(StoreError::storage(&tmp))?;
        file.sync_all().await.map_err(StoreError::storage(&tmp))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StoreError::storage(&self.path))?;
        Ok(())
    }
}
