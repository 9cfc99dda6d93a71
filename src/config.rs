use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the on-disk trajectory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root under which every agent gets its own directory (default: `data/agents`).
    pub data_root: PathBuf,
    /// Name of the per-agent subdirectory holding episodes and metadata
    /// (default: `trajectories`).
    pub trajectories_dir: String,
    /// Upper bound on episode files loaded at once during a stats refresh
    /// (default: 64).
    pub max_concurrent_loads: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data/agents"),
            trajectories_dir: "trajectories".into(),
            max_concurrent_loads: 64,
        }
    }
}

impl StoreConfig {
    /// Read a configuration from a JSON file. Missing keys fall back to defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Directory holding the trajectories of `agent_id`. Does not touch the disk.
    pub fn trajectory_dir(&self, agent_id: &str) -> PathBuf {
        self.data_root.join(agent_id).join(&self.trajectories_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, r#"{ "max_concurrent_loads": 4 }"#).unwrap();

        let config = StoreConfig::load_from_file(&path).unwrap();
        assert_eq!(config.max_concurrent_loads, 4);
        assert_eq!(config.data_root, PathBuf::from("data/agents"));
        assert_eq!(config.trajectories_dir, "trajectories");
    }

    #[test]
    fn trajectory_dir_layout() {
        let config = StoreConfig {
            data_root: PathBuf::from("/srv/agents"),
            ..StoreConfig::default()
        };
        assert_eq!(
            config.trajectory_dir("runner-7"),
            PathBuf::from("/srv/agents/runner-7/trajectories")
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(StoreConfig::load_from_file(tmp.path().join("nope.json")).is_err());
    }
}
