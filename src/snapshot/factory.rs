//! Snapshot factories and the provider that picks one.
//!
//! A factory knows how to capture one snapshot variant from a live entity and
//! how to decode that variant from a tagged record. The provider chooses the
//! factory by capability:
//!
//! - live entities: does the entity expose a skeleton ([`LiveEntity::as_skeletal`])?
//! - decoded records: does the [`EntityKind`] named by `entity_type` declare one?
//!
//! so a record tagged `Delver` decodes through the skeletal factory even
//! though no snapshot variant carries that name.

use serde_json::Value;
use thiserror::Error;

use crate::entity::{EntityKind, LiveEntity};

use super::entity_state::{
    BaseEntityStateSnapshot, EntityStateSnapshot, SkeletalEntityStateSnapshot,
};

/// Errors raised while decoding entity records.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unknown entity variant `{0}`")]
    UnknownEntityVariant(String),

    #[error("entity record has no string `entity_type` tag")]
    MissingEntityType,

    #[error("malformed entity record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Converts between live entities, snapshots and tagged records for one
/// snapshot variant.
pub trait EntityStateSnapshotFactory: Send + Sync {
    /// Capture the entity's current state.
    fn capture(&self, entity: &dyn LiveEntity) -> EntityStateSnapshot;

    /// Build this factory's variant from a record. The `entity_type` tag has
    /// already been resolved by the caller and is ignored here.
    fn decode(&self, record: Value) -> Result<EntityStateSnapshot, SnapshotError>;
}

fn capture_base(entity: &dyn LiveEntity) -> BaseEntityStateSnapshot {
    BaseEntityStateSnapshot {
        entity_id: entity.entity_id().to_string(),
        state: entity.state(),
        position: entity.position(),
        angle: entity.angle(),
        velocity: entity.velocity(),
        angular_velocity: entity.angular_velocity(),
    }
}

/// Factory for plain entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseSnapshotFactory;

impl EntityStateSnapshotFactory for BaseSnapshotFactory {
    fn capture(&self, entity: &dyn LiveEntity) -> EntityStateSnapshot {
        EntityStateSnapshot::Entity(capture_base(entity))
    }

    fn decode(&self, record: Value) -> Result<EntityStateSnapshot, SnapshotError> {
        Ok(EntityStateSnapshot::Entity(serde_json::from_value(record)?))
    }
}

/// Factory for skeleton-driven entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkeletalSnapshotFactory;

impl EntityStateSnapshotFactory for SkeletalSnapshotFactory {
    fn capture(&self, entity: &dyn LiveEntity) -> EntityStateSnapshot {
        let base = capture_base(entity);
        match entity.as_skeletal() {
            Some(skeletal) => EntityStateSnapshot::Skeletal(SkeletalEntityStateSnapshot {
                base,
                locomotion_state: skeletal.locomotion_state(),
                animation_name: skeletal.animation_name().map(str::to_string),
            }),
            // Only reachable when called directly on a plain entity.
            None => EntityStateSnapshot::Entity(base),
        }
    }

    fn decode(&self, record: Value) -> Result<EntityStateSnapshot, SnapshotError> {
        Ok(EntityStateSnapshot::Skeletal(serde_json::from_value(record)?))
    }
}

static BASE_FACTORY: BaseSnapshotFactory = BaseSnapshotFactory;
static SKELETAL_FACTORY: SkeletalSnapshotFactory = SkeletalSnapshotFactory;

/// Resolves which factory handles a given entity or record.
pub struct SnapshotFactoryProvider;

impl SnapshotFactoryProvider {
    /// Factory for a live entity, chosen by its skeletal capability.
    pub fn for_entity(entity: &dyn LiveEntity) -> &'static dyn EntityStateSnapshotFactory {
        if entity.as_skeletal().is_some() {
            &SKELETAL_FACTORY
        } else {
            &BASE_FACTORY
        }
    }

    /// Factory for a registered entity kind.
    pub fn for_kind(kind: &EntityKind) -> &'static dyn EntityStateSnapshotFactory {
        if kind.skeletal {
            &SKELETAL_FACTORY
        } else {
            &BASE_FACTORY
        }
    }

    /// Factory for a stored `entity_type` tag.
    pub fn for_tag(tag: &str) -> Result<&'static dyn EntityStateSnapshotFactory, SnapshotError> {
        EntityKind::from_tag(tag)
            .map(Self::for_kind)
            .ok_or_else(|| SnapshotError::UnknownEntityVariant(tag.to_string()))
    }

    pub fn capture(entity: &dyn LiveEntity) -> EntityStateSnapshot {
        Self::for_entity(entity).capture(entity)
    }

    /// Decode a tagged record into its concrete variant.
    pub fn decode(record: Value) -> Result<EntityStateSnapshot, SnapshotError> {
        let factory = match record.get("entity_type") {
            Some(Value::String(tag)) => Self::for_tag(tag)?,
            _ => return Err(SnapshotError::MissingEntityType),
        };
        factory.decode(record)
    }
}
