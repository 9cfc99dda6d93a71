//! Live-entity capability surface consumed by the snapshot factories.
//!
//! The physics runtime owns the real entities; this crate only needs to read
//! their kinematic state while recording and push it back while replaying.
//! Everything it needs is expressed by the [`LiveEntity`] trait, with
//! animated entities additionally exposing [`SkeletalEntity`].
//!
//! [`mock`] provides in-memory entities so recording and replay can be
//! exercised without a physics runtime.

pub mod kind;
pub mod mock;
pub mod traits;

pub use kind::EntityKind;
pub use mock::{MockEntity, MockSkeletalEntity};
pub use traits::{EntityState, LiveEntity, LocomotionState, SkeletalEntity};

/// Build the id an entity receives from its spawn point, e.g.
/// `Delver:48.0_112.0`. Stable across runs of the same level.
pub fn spawn_based_id(type_name: &str, position: [f64; 2]) -> String {
    format!("{type_name}:{:?}_{:?}", position[0], position[1])
}
