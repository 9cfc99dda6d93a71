//! Per-entity state snapshots.
//!
//! [`EntityStateSnapshot`] is a closed sum over the two record shapes the
//! store knows. On disk every record is a flat JSON object carrying its own
//! `entity_type` tag:
//!
//! ```text
//! { "entity_type": "SkeletalEntity", "entity_id": "Delver:48.0_112.0",
//!   "state": "NORMAL", "position": [48.0, 112.0], "angle": 0.0,
//!   "velocity": [0.0, 0.0], "angular_velocity": 0.0,
//!   "locomotion_state": "IDLE", "animation_name": "idle" }
//! ```
//!
//! Decoding goes through [`SnapshotFactoryProvider`] so that the tag is
//! resolved against the entity kind registry before any field is read.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entity::{EntityKind, EntityState, LiveEntity, LocomotionState};

use super::factory::{SnapshotError, SnapshotFactoryProvider};

/// Kinematic state shared by every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEntityStateSnapshot {
    pub entity_id: String,
    pub state: EntityState,
    pub position: [f64; 2],
    /// Degrees.
    pub angle: f64,
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub angular_velocity: f64,
}

impl BaseEntityStateSnapshot {
    /// Push position, angle and condition back onto a live entity.
    pub fn apply_to_entity(&self, entity: &mut dyn LiveEntity) {
        entity.set_position(self.position);
        entity.set_angle(self.angle);
        entity.set_state(self.state);
    }
}

/// State of a skeleton-driven entity: the base fields plus its locomotion
/// phase and the animation its skeleton was playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletalEntityStateSnapshot {
    #[serde(flatten)]
    pub base: BaseEntityStateSnapshot,
    pub locomotion_state: LocomotionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_name: Option<String>,
}

impl SkeletalEntityStateSnapshot {
    /// Apply the base fields, then the locomotion state and animation when
    /// the target actually has a skeleton.
    pub fn apply_to_entity(&self, entity: &mut dyn LiveEntity) {
        self.base.apply_to_entity(entity);

        match entity.as_skeletal_mut() {
            Some(skeletal) => {
                skeletal.set_locomotion_state(self.locomotion_state.clone());
                skeletal.run_animation(self.animation_name.as_deref());
            }
            None => tracing::debug!(
                entity = %self.base.entity_id,
                "skeletal snapshot applied to an entity without a skeleton"
            ),
        }
    }
}

/// One entity's state at one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity_type")]
pub enum EntityStateSnapshot {
    #[serde(rename = "Entity")]
    Entity(BaseEntityStateSnapshot),
    #[serde(rename = "SkeletalEntity")]
    Skeletal(SkeletalEntityStateSnapshot),
}

impl EntityStateSnapshot {
    /// The tag written to the `entity_type` field for this variant.
    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Entity(_) => EntityKind::ENTITY.name,
            Self::Skeletal(_) => EntityKind::SKELETAL_ENTITY.name,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.base().entity_id
    }

    pub fn base(&self) -> &BaseEntityStateSnapshot {
        match self {
            Self::Entity(base) => base,
            Self::Skeletal(skeletal) => &skeletal.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseEntityStateSnapshot {
        match self {
            Self::Entity(base) => base,
            Self::Skeletal(skeletal) => &mut skeletal.base,
        }
    }

    /// Encode to the flat tagged record stored on disk.
    pub fn to_record(&self) -> Result<Value, SnapshotError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode a flat tagged record, dispatching on its `entity_type`.
    pub fn from_record(record: Value) -> Result<Self, SnapshotError> {
        SnapshotFactoryProvider::decode(record)
    }

    /// Push this snapshot onto a live entity. Used by state-based replay only.
    pub fn apply_to_entity(&self, entity: &mut dyn LiveEntity) {
        match self {
            Self::Entity(base) => base.apply_to_entity(entity),
            Self::Skeletal(skeletal) => skeletal.apply_to_entity(entity),
        }
    }
}

impl<'de> Deserialize<'de> for EntityStateSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = Value::deserialize(deserializer)?;
        Self::from_record(record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{MockEntity, MockSkeletalEntity};
    use serde_json::json;

    fn base(id: &str) -> BaseEntityStateSnapshot {
        BaseEntityStateSnapshot {
            entity_id: id.into(),
            state: EntityState::Knockback,
            position: [3.5, -2.0],
            angle: 45.0,
            velocity: [1.0, 0.25],
            angular_velocity: -3.0,
        }
    }

    fn skeletal(id: &str, locomotion: LocomotionState, anim: Option<&str>) -> EntityStateSnapshot {
        EntityStateSnapshot::Skeletal(SkeletalEntityStateSnapshot {
            base: base(id),
            locomotion_state: locomotion,
            animation_name: anim.map(str::to_string),
        })
    }

    #[test]
    fn record_is_flat_and_tagged() {
        let record = skeletal("d", LocomotionState::GoUp, Some("go_up"))
            .to_record()
            .unwrap();
        assert_eq!(record["entity_type"], "SkeletalEntity");
        assert_eq!(record["entity_id"], "d");
        assert_eq!(record["state"], "KNOCKBACK");
        assert_eq!(record["position"], json!([3.5, -2.0]));
        assert_eq!(record["locomotion_state"], "GO_UP");
        assert_eq!(record["animation_name"], "go_up");
    }

    #[test]
    fn every_variant_round_trips() {
        let cases = vec![
            EntityStateSnapshot::Entity(base("rock")),
            skeletal("a", LocomotionState::Land, Some("land")),
            skeletal("b", LocomotionState::Idle, None),
            skeletal("c", LocomotionState::Other("JUMP".into()), Some("jump")),
        ];
        for snapshot in cases {
            let text = serde_json::to_string(&snapshot).unwrap();
            let back: EntityStateSnapshot = serde_json::from_str(&text).unwrap();
            assert_eq!(back, snapshot);
            assert_eq!(back.entity_type(), snapshot.entity_type());
        }
    }

    #[test]
    fn serde_tags_match_entity_kinds() {
        let plain = EntityStateSnapshot::Entity(base("x")).to_record().unwrap();
        assert_eq!(plain["entity_type"], EntityKind::ENTITY.name);
        let sk = skeletal("x", LocomotionState::Run, None).to_record().unwrap();
        assert_eq!(sk["entity_type"], EntityKind::SKELETAL_ENTITY.name);
    }

    #[test]
    fn optional_fields_default_on_decode() {
        let record = json!({
            "entity_type": "SkeletalEntity",
            "entity_id": "d",
            "state": "NORMAL",
            "position": [1, 2],
            "angle": 0,
            "locomotion_state": "FALL",
            "scale": [1, 1]
        });
        let snapshot = EntityStateSnapshot::from_record(record).unwrap();
        let EntityStateSnapshot::Skeletal(s) = snapshot else {
            panic!("expected skeletal variant");
        };
        assert_eq!(s.base.velocity, [0.0, 0.0]);
        assert_eq!(s.base.angular_velocity, 0.0);
        assert_eq!(s.base.position, [1.0, 2.0]);
        assert_eq!(s.animation_name, None);
        assert_eq!(s.locomotion_state, LocomotionState::Fall);
    }

    #[test]
    fn unknown_tag_fails_deserialization() {
        let text = r#"{"entity_type":"Goal","entity_id":"g","state":"NORMAL","position":[0,0],"angle":0}"#;
        let err = serde_json::from_str::<EntityStateSnapshot>(text).unwrap_err();
        assert!(err.to_string().contains("Goal"));
    }

    #[test]
    fn apply_pushes_fields_onto_skeletal_entity() {
        let mut delver = MockSkeletalEntity::spawn_delver([0.0, 0.0]);
        skeletal("d", LocomotionState::Fall, Some("fall")).apply_to_entity(&mut delver);

        assert_eq!(delver.body.position, [3.5, -2.0]);
        assert_eq!(delver.body.angle, 45.0);
        assert_eq!(delver.body.state, EntityState::Knockback);
        assert_eq!(delver.locomotion_state, LocomotionState::Fall);
        assert_eq!(delver.animations_run, vec![Some("fall".to_string())]);
    }

    #[test]
    fn skeletal_snapshot_on_plain_entity_applies_base_only() {
        let mut rock = MockEntity::spawn([9.0, 9.0]);
        skeletal("d", LocomotionState::Run, Some("run")).apply_to_entity(&mut rock);
        assert_eq!(rock.position, [3.5, -2.0]);
        assert_eq!(rock.state, EntityState::Knockback);
    }
}
