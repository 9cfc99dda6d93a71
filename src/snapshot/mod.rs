//! Entity and frame snapshots for state-based replay.
//!
//! This module provides:
//! - [`EntityStateSnapshot`] -- a closed sum over the per-entity record
//!   shapes, each tagged on disk with its `entity_type`.
//! - [`SnapshotFactoryProvider`] -- picks the factory that captures or
//!   decodes a given entity or record.
//! - [`FrameSnapshot`] -- every tracked entity at one tick.
//! - [`interpolate_frame_snapshots`] -- synthetic frames between two
//!   recorded ones.

pub mod entity_state;
pub mod factory;
pub mod frame;
pub mod interpolate;

pub use entity_state::{BaseEntityStateSnapshot, EntityStateSnapshot, SkeletalEntityStateSnapshot};
pub use factory::{
    BaseSnapshotFactory, EntityStateSnapshotFactory, SkeletalSnapshotFactory, SnapshotError,
    SnapshotFactoryProvider,
};
pub use frame::FrameSnapshot;
pub use interpolate::{interpolate_frame_snapshots, lerp, lerp_vec};
