//! Incremental victory statistics over an agent's saved episodes.
//!
//! `metadata.stats.amount` marks how many episodes have already been folded
//! into `metadata.stats.victories`. A refresh only loads the episodes in
//! `[stats.amount, trajectory_count)`, concurrently and in completion order,
//! then moves the mark to `trajectory_count` in a single metadata write.
//!
//! Episode files are never deleted or renumbered once counted; the range
//! scan relies on that.

use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use super::dir::list_trajectory_indices;
use super::error::{StoreError, StoreResult};
use super::loader::read_trajectory;
use super::metadata::{
    rebuild_metadata, MetadataRead, MetadataSource, TrajectoryMetadataManager, TrajectoryStats,
};
use super::registry::AgentStorage;

/// Outcome of one stats refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRefresh {
    pub stats: TrajectoryStats,
    /// Episode files loaded during this refresh.
    pub scanned: u64,
    /// Of those, how many were missing or undecodable and counted as
    /// non-victories.
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Tally {
    scanned: u64,
    skipped: u64,
    victories: u64,
}

/// Computes `{amount, victories}` for one agent.
#[derive(Debug, Clone)]
pub struct TrajectoryStatsCalculator {
    storage: AgentStorage,
    metadata: TrajectoryMetadataManager,
    max_concurrent_loads: usize,
}

impl TrajectoryStatsCalculator {
    pub fn new(storage: AgentStorage, max_concurrent_loads: usize) -> Self {
        let metadata = TrajectoryMetadataManager::new(&storage);
        Self {
            storage,
            metadata,
            max_concurrent_loads: max_concurrent_loads.max(1),
        }
    }

    pub async fn get_stats(&self) -> StoreResult<TrajectoryStats> {
        Ok(self.refresh().await?.stats)
    }

    /// Fold every episode saved since the last refresh into the cached stats
    /// and persist them.
    ///
    /// Unreadable episodes are logged and counted as non-victories. Failing
    /// to persist the new stats is an error. Missing or undecodable metadata
    /// is rebuilt from the files on disk and every episode is recounted.
    pub async fn refresh(&self) -> StoreResult<StatsRefresh> {
        let _writer = self.storage.lock_writer().await;

        let MetadataRead { mut metadata, source } = self.metadata.read().await?;
        let rebuilt = source != MetadataSource::Loaded;
        if rebuilt {
            metadata = rebuild_metadata(&self.storage).await?;
        }
        let total = metadata.trajectory_count;

        if metadata.stats.amount > total {
            warn!(
                agent = %self.storage.agent_id(),
                amount = metadata.stats.amount,
                trajectory_count = total,
                "Cached stats are ahead of the trajectory count, recomputing"
            );
            metadata.stats = TrajectoryStats::default();
        }

        if metadata.stats_current() && !rebuilt {
            debug!(agent = %self.storage.agent_id(), "Trajectory stats up to date");
            return Ok(StatsRefresh {
                stats: metadata.stats,
                scanned: 0,
                skipped: 0,
            });
        }

        let paths = (metadata.stats.amount..total)
            .map(|index| self.storage.trajectory_path(index))
            .collect();
        let tally = self.tally_victories(paths).await;

        metadata.stats = TrajectoryStats {
            amount: total,
            victories: metadata.stats.victories + tally.victories,
        };
        self.metadata.write(&metadata).await?;

        info!(
            agent = %self.storage.agent_id(),
            amount = metadata.stats.amount,
            victories = metadata.stats.victories,
            scanned = tally.scanned,
            skipped = tally.skipped,
            "Refreshed trajectory stats"
        );

        Ok(StatsRefresh {
            stats: metadata.stats,
            scanned: tally.scanned,
            skipped: tally.skipped,
        })
    }

    /// Recount victories over every episode file on disk, ignoring and not
    /// updating the cached stats.
    ///
    /// Kept as a reference to check [`Self::get_stats`] against; it reads the
    /// whole history on every call. `amount` is the stored trajectory count,
    /// or the count implied by the files when metadata is missing or
    /// undecodable.
    pub async fn get_stats_legacy(&self) -> StoreResult<TrajectoryStats> {
        let MetadataRead { metadata, source } = self.metadata.read().await?;

        let indices = list_trajectory_indices(self.storage.dir()).await?;
        let amount = match source {
            MetadataSource::Loaded => metadata.trajectory_count,
            MetadataSource::Missing | MetadataSource::Recovered => {
                indices.last().map_or(0, |last| last + 1)
            }
        };

        let paths = indices
            .into_iter()
            .map(|index| self.storage.trajectory_path(index))
            .collect();
        let tally = self.tally_victories(paths).await;

        Ok(TrajectoryStats {
            amount,
            victories: tally.victories,
        })
    }

    /// Load `paths` concurrently and count victorious episodes as the loads
    /// complete.
    async fn tally_victories(&self, paths: Vec<PathBuf>) -> Tally {
        let mut loads = stream::iter(paths)
            .map(|path| async move {
                let outcome = read_trajectory(&path).await;
                (path, outcome)
            })
            .buffer_unordered(self.max_concurrent_loads);

        let mut tally = Tally::default();
        while let Some((path, outcome)) = loads.next().await {
            tally.scanned += 1;
            match outcome {
                Ok(Some(episode)) => {
                    if episode.victorious {
                        tally.victories += 1;
                    }
                }
                Ok(None) => {
                    tally.skipped += 1;
                    warn!(path = %path.display(), "Trajectory file missing, counted as non-victory");
                }
                Err(err @ StoreError::Storage { .. }) => {
                    tally.skipped += 1;
                    error!(
                        path = %path.display(),
                        error = %err,
                        "Could not read trajectory, counted as non-victory"
                    );
                }
                Err(err) => {
                    tally.skipped += 1;
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "Could not parse trajectory, counted as non-victory"
                    );
                }
            }
        }
        tally
    }
}
