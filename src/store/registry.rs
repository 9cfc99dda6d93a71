//! Per-agent storage handles and the writer lock that serializes them.
//!
//! Saving and stats refreshes both read-modify-write `metadata.json`. Every
//! handle for one agent shares a single async mutex, taken for the whole of
//! each such operation, so two writers for the same agent never interleave.
//! Loads and the legacy scan only read and do not take it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::StoreConfig;

use super::dir::{resolve_trajectory_dir, trajectory_file_name, METADATA_FILE};
use super::error::StoreResult;
use super::loader::TrajectoryLoader;
use super::metadata::TrajectoryMetadataManager;
use super::saver::TrajectorySaver;
use super::stats::TrajectoryStatsCalculator;

/// Resolved location of one agent's trajectories plus its writer lock.
#[derive(Debug, Clone)]
pub struct AgentStorage {
    agent_id: String,
    dir: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl AgentStorage {
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn trajectory_path(&self, index: u64) -> PathBuf {
        self.dir.join(trajectory_file_name(index))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    pub(crate) async fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }
}

/// Hands out [`AgentStorage`] handles that share one writer lock per agent.
///
/// Locks are never evicted: the registry keeps one entry for every agent
/// it has handed out a handle for, for as long as it lives.
#[derive(Debug)]
pub struct StoreRegistry {
    config: StoreConfig,
    writers: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl StoreRegistry {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            writers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Storage handle for `agent_id`; creates its directory on first use.
    pub async fn agent(&self, agent_id: &str) -> StoreResult<AgentStorage> {
        let dir = resolve_trajectory_dir(&self.config, agent_id).await?;
        let writer = self
            .writers
            .lock()
            .await
            .entry(agent_id.to_string())
            .or_default()
            .clone();

        Ok(AgentStorage {
            agent_id: agent_id.to_string(),
            dir,
            writer,
        })
    }

    pub async fn saver(&self, agent_id: &str) -> StoreResult<TrajectorySaver> {
        Ok(TrajectorySaver::new(self.agent(agent_id).await?))
    }

    pub async fn loader(&self, agent_id: &str) -> StoreResult<TrajectoryLoader> {
        Ok(TrajectoryLoader::new(self.agent(agent_id).await?))
    }

    pub async fn stats_calculator(&self, agent_id: &str) -> StoreResult<TrajectoryStatsCalculator> {
        Ok(TrajectoryStatsCalculator::new(
            self.agent(agent_id).await?,
            self.config.max_concurrent_loads,
        ))
    }

    pub async fn metadata_manager(&self, agent_id: &str) -> StoreResult<TrajectoryMetadataManager> {
        Ok(TrajectoryMetadataManager::new(&self.agent(agent_id).await?))
    }
}
