//! Durable per-agent trajectory storage.
//!
//! This module provides:
//! - [`StoreRegistry`] / [`AgentStorage`] -- directory resolution and the
//!   per-agent writer lock.
//! - [`TrajectorySaver`] -- appends episodes under contiguous indices.
//! - [`TrajectoryLoader`] -- loads an episode by index.
//! - [`TrajectoryMetadataManager`] -- the `metadata.json` counters.
//! - [`TrajectoryStatsCalculator`] -- incremental victory statistics.

pub mod dir;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod registry;
pub mod saver;
pub mod stats;

pub use dir::{resolve_trajectory_dir, trajectory_file_name, METADATA_FILE};
pub use error::{StoreError, StoreResult};
pub use loader::TrajectoryLoader;
pub use metadata::{
    MetadataRead, MetadataSource, TrajectoryMetadata, TrajectoryMetadataManager, TrajectoryStats,
};
pub use registry::{AgentStorage, StoreRegistry};
pub use saver::TrajectorySaver;
pub use stats::{StatsRefresh, TrajectoryStatsCalculator};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::entity::{LiveEntity, LocomotionState, MockEntity, MockSkeletalEntity};
    use crate::trajectory::{DelverAction, EpisodeTrajectory, RunDirection, StateReplay};

    #[tokio::test]
    async fn record_save_load_and_replay() {
        let tmp = tempfile::TempDir::new().unwrap();
        let registry = StoreRegistry::new(StoreConfig {
            data_root: tmp.path().to_path_buf(),
            ..StoreConfig::default()
        });

        let mut delver = MockSkeletalEntity::spawn_delver([0.0, 0.0]);
        let boulder = MockEntity::spawn([50.0, 0.0]);
        let mut episode = EpisodeTrajectory::new(10).with_level_hash("cave-3");
        for _ in 0..3 {
            delver.body.velocity = [10.0, 0.0];
            episode.add_delver_action(DelverAction::new(RunDirection::Right, false));
            episode.record_frame([&delver as &dyn LiveEntity, &boulder as &dyn LiveEntity]);
            delver.step(0.1);
        }
        episode.set_victorious(true);

        let index = registry.saver("runner").await.unwrap().save(&episode).await.unwrap();
        let loaded = registry
            .loader("runner")
            .await
            .unwrap()
            .load(index)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, episode);

        let frame = StateReplay::new(&loaded).frame_at(0.05).unwrap().unwrap();
        let mut replayed = MockSkeletalEntity::spawn_delver([0.0, 0.0]);
        let mut replayed_boulder = MockEntity::spawn([50.0, 0.0]);
        let applied = frame.apply_to([
            &mut replayed as &mut dyn LiveEntity,
            &mut replayed_boulder as &mut dyn LiveEntity,
        ]);

        assert_eq!(applied, 2);
        assert!((replayed.body.position[0] - 0.5).abs() < 1e-9);
        assert_eq!(replayed.locomotion_state, LocomotionState::Run);
        assert_eq!(replayed_boulder.position, [50.0, 0.0]);

        let stats = registry
            .stats_calculator("runner")
            .await
            .unwrap()
            .get_stats()
            .await
            .unwrap();
        assert_eq!(stats, TrajectoryStats { amount: 1, victories: 1 });
    }
}
