use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::LiveEntity;

use super::entity_state::EntityStateSnapshot;
use super::factory::{SnapshotError, SnapshotFactoryProvider};

/// The state of every tracked entity at one simulation tick.
///
/// Entities keep insertion order so that encoding is deterministic; the
/// order carries no other meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    #[serde(default)]
    pub entities: Vec<EntityStateSnapshot>,
}

impl FrameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a whole frame from live entities.
    pub fn capture<'a, I>(entities: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn LiveEntity>,
    {
        let mut frame = Self::new();
        for entity in entities {
            frame.add_entity(entity);
        }
        frame
    }

    /// Capture one live entity through the factory provider.
    pub fn add_entity(&mut self, entity: &dyn LiveEntity) {
        self.add_entity_snapshot(SnapshotFactoryProvider::capture(entity));
    }

    /// Decode a tagged record and append it.
    pub fn add_entity_from_record(&mut self, record: Value) -> Result<(), SnapshotError> {
        let snapshot = SnapshotFactoryProvider::decode(record)?;
        self.add_entity_snapshot(snapshot);
        Ok(())
    }

    pub fn add_entity_snapshot(&mut self, snapshot: EntityStateSnapshot) {
        self.entities.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First snapshot recorded for `entity_id`.
    pub fn get(&self, entity_id: &str) -> Option<&EntityStateSnapshot> {
        self.entities.iter().find(|s| s.entity_id() == entity_id)
    }

    /// Push each snapshot onto the live entity with the same id.
    ///
    /// Returns how many entities were updated. Entities without a snapshot in
    /// this frame are left untouched.
    pub fn apply_to<'a, I>(&self, entities: I) -> usize
    where
        I: IntoIterator<Item = &'a mut dyn LiveEntity>,
    {
        let mut applied = 0;
        for entity in entities {
            if let Some(snapshot) = self.get(entity.entity_id()) {
                snapshot.apply_to_entity(entity);
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{LocomotionState, MockEntity, MockSkeletalEntity};
    use serde_json::json;

    #[test]
    fn capture_keeps_order_and_mixes_variants() {
        let delver = MockSkeletalEntity::spawn_delver([0.0, 0.0]);
        let rock = MockEntity::spawn([5.0, 0.0]);

        let frame = FrameSnapshot::capture([&delver as &dyn LiveEntity, &rock as &dyn LiveEntity]);

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.entities[0].entity_type(), "SkeletalEntity");
        assert_eq!(frame.entities[1].entity_type(), "Entity");
        assert_eq!(frame.get("Entity:5.0_0.0").unwrap().base().position, [5.0, 0.0]);
    }

    #[test]
    fn add_entity_from_record_rejects_unknown_variant() {
        let mut frame = FrameSnapshot::new();
        let err = frame
            .add_entity_from_record(json!({ "entity_type": "Spike", "entity_id": "s" }))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownEntityVariant(_)));
        assert!(frame.is_empty());
    }

    #[test]
    fn frame_json_round_trip() {
        let mut delver = MockSkeletalEntity::spawn_delver([1.0, 2.0]);
        delver.locomotion_state = LocomotionState::Other("JUMP".into());
        let rock = MockEntity::spawn([3.0, 4.0]);
        let frame = FrameSnapshot::capture([&delver as &dyn LiveEntity, &rock as &dyn LiveEntity]);

        let text = serde_json::to_string(&frame).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn apply_matches_entities_by_id() {
        let source = MockEntity::spawn([0.0, 0.0]);
        let mut frame = FrameSnapshot::capture([&source as &dyn LiveEntity]);
        frame.entities[0].base_mut().position = [7.0, 8.0];

        let mut same = MockEntity::spawn([0.0, 0.0]);
        let mut other = MockEntity::spawn([1.0, 1.0]);
        let applied = frame.apply_to([&mut same as &mut dyn LiveEntity, &mut other as &mut dyn LiveEntity]);

        assert_eq!(applied, 1);
        assert_eq!(same.position, [7.0, 8.0]);
        assert_eq!(other.position, [1.0, 1.0]);
    }
}
