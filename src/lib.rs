//! Delver replay: recording, persistence and replay of simulation episodes.
//!
//! An external simulator records one [`trajectory::EpisodeTrajectory`] per
//! episode (discrete inputs plus full-state frame snapshots), the
//! [`store`] persists it per agent and maintains incremental victory
//! statistics, and a replay driver loads episodes back and interpolates
//! between recorded frames.

pub mod config;
pub mod entity;
pub mod snapshot;
pub mod store;
pub mod trajectory;
