//! Recorded episodes and replay cursors.
//!
//! This module provides:
//! - [`types::DelverAction`], [`types::EpisodeTrajectory`] -- the data an
//!   external simulator records for one episode.
//! - [`replay::StateReplay`], [`replay::ActionReplay`] -- time-indexed views
//!   used by a replay/render driver.

pub mod replay;
pub mod types;

pub use replay::{ActionReplay, StateReplay};
pub use types::{DelverAction, EpisodeTrajectory, RunDirection};
