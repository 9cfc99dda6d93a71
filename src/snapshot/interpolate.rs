//! Synthetic frames between two recorded ones, for smooth state-based replay.
//!
//! Interpolation works on the encoded records rather than on the typed
//! variants, so new per-entity fields are picked up without touching this
//! module:
//!
//! - numbers in both records are lerped,
//! - two-component numeric arrays in both records are lerped per axis,
//! - anything else (strings, enums, booleans, fields missing from the
//!   previous record) snaps to the next record's value.
//!
//! Entities present in `next` but not in `prev` are dropped; entities that
//! disappeared in `next` are not carried over.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use super::entity_state::EntityStateSnapshot;
use super::factory::SnapshotError;
use super::frame::FrameSnapshot;

/// Linear interpolation. `alpha` is not clamped, so values outside `[0, 1]`
/// extrapolate.
pub fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a + alpha * (b - a)
}

/// Component-wise [`lerp`] of two 2D vectors.
pub fn lerp_vec(a: [f64; 2], b: [f64; 2], alpha: f64) -> [f64; 2] {
    [lerp(a[0], b[0], alpha), lerp(a[1], b[1], alpha)]
}

/// Build the frame `alpha` of the way from `prev` to `next`.
///
/// Iterates in `next`'s entity order. Fails only if an interpolated record
/// cannot be decoded back into a snapshot variant.
pub fn interpolate_frame_snapshots(
    prev: &FrameSnapshot,
    next: &FrameSnapshot,
    alpha: f64,
) -> Result<FrameSnapshot, SnapshotError> {
    let prev_states: HashMap<&str, &EntityStateSnapshot> = prev
        .entities
        .iter()
        .map(|s| (s.entity_id(), s))
        .collect();

    let mut interpolated = FrameSnapshot::new();

    for next_state in &next.entities {
        let Some(prev_state) = prev_states.get(next_state.entity_id()) else {
            continue;
        };

        let record = interpolate_records(
            &prev_state.to_record()?,
            next_state.to_record()?,
            alpha,
        );
        interpolated.add_entity_from_record(record)?;
    }

    Ok(interpolated)
}

/// Interpolate two encoded entity records field by field.
fn interpolate_records(prev: &Value, next: Value, alpha: f64) -> Value {
    match (prev, next) {
        (Value::Object(prev_fields), Value::Object(next_fields)) => {
            let mut fields = Map::with_capacity(next_fields.len());
            for (key, next_value) in next_fields {
                let value = match prev_fields.get(&key) {
                    Some(prev_value) => interpolate_value(prev_value, &next_value, alpha),
                    None => next_value,
                };
                fields.insert(key, value);
            }
            Value::Object(fields)
        }
        (_, next) => next,
    }
}

fn interpolate_value(prev: &Value, next: &Value, alpha: f64) -> Value {
    if let (Some(a), Some(b)) = (as_scalar(prev), as_scalar(next)) {
        return number_or(lerp(a, b, alpha), next);
    }

    if let (Some(a), Some(b)) = (as_vec2(prev), as_vec2(next)) {
        let [x, y] = lerp_vec(a, b, alpha);
        return match (Number::from_f64(x), Number::from_f64(y)) {
            (Some(x), Some(y)) => Value::Array(vec![Value::Number(x), Value::Number(y)]),
            _ => next.clone(),
        };
    }

    next.clone()
}

fn as_scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn as_vec2(value: &Value) -> Option<[f64; 2]> {
    match value.as_array()?.as_slice() {
        [x, y] => Some([as_scalar(x)?, as_scalar(y)?]),
        _ => None,
    }
}

// Non-finite results cannot be encoded as JSON numbers; keep the target value.
fn number_or(value: f64, fallback: &Value) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| fallback.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityState, LocomotionState};
    use crate::snapshot::{BaseEntityStateSnapshot, SkeletalEntityStateSnapshot};

    fn plain(id: &str, position: [f64; 2]) -> EntityStateSnapshot {
        EntityStateSnapshot::Entity(BaseEntityStateSnapshot {
            entity_id: id.into(),
            state: EntityState::Normal,
            position,
            angle: 0.0,
            velocity: [0.0, 0.0],
            angular_velocity: 0.0,
        })
    }

    fn delver(position: [f64; 2], angle: f64, locomotion: LocomotionState) -> EntityStateSnapshot {
        EntityStateSnapshot::Skeletal(SkeletalEntityStateSnapshot {
            base: BaseEntityStateSnapshot {
                entity_id: "delver".into(),
                state: EntityState::Normal,
                position,
                angle,
                velocity: [10.0, 0.0],
                angular_velocity: 0.0,
            },
            locomotion_state: locomotion,
            animation_name: None,
        })
    }

    fn frame(entities: Vec<EntityStateSnapshot>) -> FrameSnapshot {
        FrameSnapshot { entities }
    }

    #[test]
    fn midpoint_position() {
        let prev = frame(vec![plain("a", [0.0, 0.0])]);
        let next = frame(vec![plain("a", [10.0, 0.0])]);

        let mid = interpolate_frame_snapshots(&prev, &next, 0.5).unwrap();
        assert_eq!(mid.entities[0].base().position, [5.0, 0.0]);
    }

    #[test]
    fn entity_new_in_next_is_dropped() {
        let prev = frame(vec![plain("a", [0.0, 0.0])]);
        let next = frame(vec![plain("b", [1.0, 1.0]), plain("a", [2.0, 2.0])]);

        let out = interpolate_frame_snapshots(&prev, &next, 0.25).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.entities[0].entity_id(), "a");
        assert!(out.get("b").is_none());
    }

    #[test]
    fn entity_gone_from_next_is_not_carried() {
        let prev = frame(vec![plain("a", [0.0, 0.0]), plain("gone", [0.0, 0.0])]);
        let next = frame(vec![plain("a", [4.0, 4.0])]);

        let out = interpolate_frame_snapshots(&prev, &next, 0.5).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn discrete_fields_snap_to_next() {
        let prev = frame(vec![delver([0.0, 0.0], 0.0, LocomotionState::Run)]);
        let next = frame(vec![delver([4.0, 8.0], -20.0, LocomotionState::GoUp)]);

        let out = interpolate_frame_snapshots(&prev, &next, 0.25).unwrap();
        let EntityStateSnapshot::Skeletal(s) = &out.entities[0] else {
            panic!("variant changed during interpolation");
        };
        assert_eq!(s.base.position, [1.0, 2.0]);
        assert_eq!(s.base.angle, -5.0);
        assert_eq!(s.locomotion_state, LocomotionState::GoUp);
    }

    #[test]
    fn alpha_is_not_clamped() {
        let prev = frame(vec![plain("a", [0.0, 0.0])]);
        let next = frame(vec![plain("a", [10.0, -10.0])]);

        let ahead = interpolate_frame_snapshots(&prev, &next, 1.5).unwrap();
        assert_eq!(ahead.entities[0].base().position, [15.0, -15.0]);
        let behind = interpolate_frame_snapshots(&prev, &next, -0.5).unwrap();
        assert_eq!(behind.entities[0].base().position, [-5.0, 5.0]);
    }

    #[test]
    fn endpoints_reproduce_inputs() {
        let prev = frame(vec![delver([0.0, 0.0], 0.0, LocomotionState::Idle)]);
        let next = frame(vec![delver([3.0, 1.0], 20.0, LocomotionState::Fall)]);

        let at_end = interpolate_frame_snapshots(&prev, &next, 1.0).unwrap();
        assert_eq!(at_end, next);
    }

    #[test]
    fn empty_frames_give_empty_result() {
        let full = frame(vec![plain("a", [0.0, 0.0])]);
        let empty = FrameSnapshot::new();
        assert!(interpolate_frame_snapshots(&empty, &full, 0.5).unwrap().is_empty());
        assert!(interpolate_frame_snapshots(&full, &empty, 0.5).unwrap().is_empty());
    }

    #[test]
    fn record_level_rules() {
        let prev = serde_json::json!({ "n": 1, "v": [0, 0], "s": "x", "long": [0, 0, 0] });
        let next = serde_json::json!({ "n": 3, "v": [2, 4], "s": "y", "long": [3, 3, 3], "new": 7 });

        let out = interpolate_records(&prev, next, 0.5);
        assert_eq!(out["n"], 2.0);
        assert_eq!(out["v"], serde_json::json!([1.0, 2.0]));
        assert_eq!(out["s"], "y");
        assert_eq!(out["long"], serde_json::json!([3, 3, 3]));
        assert_eq!(out["new"], 7);
    }
}
