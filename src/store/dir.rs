//! Where an agent's trajectories live on disk.
//!
//! ```text
//! <data_root>/<agent_id>/<trajectories_dir>/
//!     metadata.json
//!     trajectory_0.json
//!     trajectory_1.json
//!     ...
//! ```

use std::path::{Path, PathBuf};

use crate::config::StoreConfig;

use super::error::{StoreError, StoreResult};

pub const METADATA_FILE: &str = "metadata.json";

/// Resolve the trajectory directory of `agent_id`, creating it if needed.
pub async fn resolve_trajectory_dir(config: &StoreConfig, agent_id: &str) -> StoreResult<PathBuf> {
    let dir = config.trajectory_dir(agent_id);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(StoreError::storage(&dir))?;
    Ok(dir)
}

pub fn trajectory_file_name(index: u64) -> String {
    format!("trajectory_{index}.json")
}

/// Inverse of [`trajectory_file_name`]. Only canonical names match, so
/// `trajectory_01.json` is ignored.
pub fn parse_trajectory_index(file_name: &str) -> Option<u64> {
    let index: u64 = file_name
        .strip_prefix("trajectory_")?
        .strip_suffix(".json")?
        .parse()
        .ok()?;
    (trajectory_file_name(index) == file_name).then_some(index)
}

/// Indices of every episode file in `dir`, ascending.
pub async fn list_trajectory_indices(dir: &Path) -> StoreResult<Vec<u64>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(StoreError::storage(dir))?;

    let mut indices = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(StoreError::storage(dir))? {
        if let Some(index) = entry.file_name().to_str().and_then(parse_trajectory_index) {
            indices.push(index);
        }
    }
    indices.sort_unstable();
    Ok(indices)
}

/// One past the highest episode index in `dir`, 0 when it holds none.
pub async fn next_trajectory_index(dir: &Path) -> StoreResult<u64> {
    let indices = list_trajectory_indices(dir).await?;
    Ok(indices.last().map_or(0, |last| last + 1))
}
