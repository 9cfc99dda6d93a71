//! In-memory entities standing in for the physics runtime.
//!
//! - [`MockEntity`] is a plain rigid body: it integrates its velocity on
//!   [`MockEntity::step`] and otherwise just stores what it is given.
//! - [`MockSkeletalEntity`] wraps a body and adds a locomotion state plus a
//!   log of the animations it was asked to run, so replay tests can check
//!   what was pushed onto it.

use super::kind::EntityKind;
use super::spawn_based_id;
use super::traits::{EntityState, LiveEntity, LocomotionState, SkeletalEntity};

// ---------------------------------------------------------------------------
// Plain body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MockEntity {
    id: String,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub angle: f64,
    pub angular_velocity: f64,
    pub state: EntityState,
}

impl MockEntity {
    /// Spawn a plain entity at `position`; its id derives from the spawn point.
    pub fn spawn(position: [f64; 2]) -> Self {
        Self::spawn_as(&EntityKind::ENTITY, position)
    }

    pub fn spawn_as(kind: &EntityKind, position: [f64; 2]) -> Self {
        Self {
            id: spawn_based_id(kind.name, position),
            position,
            velocity: [0.0, 0.0],
            angle: 0.0,
            angular_velocity: 0.0,
            state: EntityState::Normal,
        }
    }

    pub fn with_velocity(mut self, velocity: [f64; 2]) -> Self {
        self.velocity = velocity;
        self
    }

    /// Advance position and angle by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        self.position[0] += self.velocity[0] * dt;
        self.position[1] += self.velocity[1] * dt;
        self.angle += self.angular_velocity * dt;
    }
}

impl LiveEntity for MockEntity {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> [f64; 2] {
        self.position
    }

    fn velocity(&self) -> [f64; 2] {
        self.velocity
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    fn state(&self) -> EntityState {
        self.state
    }

    fn set_position(&mut self, position: [f64; 2]) {
        self.position = position;
    }

    fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }
}

// ---------------------------------------------------------------------------
// Skeletal entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MockSkeletalEntity {
    pub body: MockEntity,
    pub locomotion_state: LocomotionState,
    pub animation_name: Option<String>,
    /// Every `run_animation` call, oldest first.
    pub animations_run: Vec<Option<String>>,
}

impl MockSkeletalEntity {
    /// Spawn a delver at `position`, idle.
    pub fn spawn_delver(position: [f64; 2]) -> Self {
        Self::spawn_as(&EntityKind::DELVER, position)
    }

    pub fn spawn_as(kind: &EntityKind, position: [f64; 2]) -> Self {
        Self {
            body: MockEntity::spawn_as(kind, position),
            locomotion_state: LocomotionState::Idle,
            animation_name: Some("idle".into()),
            animations_run: Vec::new(),
        }
    }

    /// Advance the body and derive the locomotion phase from its velocity.
    pub fn step(&mut self, dt: f64) {
        self.body.step(dt);
        let [vx, vy] = self.body.velocity;
        let next = if vy > 0.0 {
            LocomotionState::GoUp
        } else if vy < 0.0 {
            LocomotionState::Fall
        } else if vx != 0.0 {
            LocomotionState::Run
        } else {
            LocomotionState::Idle
        };
        if next != self.locomotion_state {
            self.animation_name = Some(next.as_str().to_ascii_lowercase());
            self.locomotion_state = next;
        }
    }
}

impl LiveEntity for MockSkeletalEntity {
    fn entity_id(&self) -> &str {
        self.body.entity_id()
    }

    fn position(&self) -> [f64; 2] {
        self.body.position
    }

    fn velocity(&self) -> [f64; 2] {
        self.body.velocity
    }

    fn angle(&self) -> f64 {
        self.body.angle
    }

    fn angular_velocity(&self) -> f64 {
        self.body.angular_velocity
    }

    fn state(&self) -> EntityState {
        self.body.state
    }

    fn set_position(&mut self, position: [f64; 2]) {
        self.body.position = position;
    }

    fn set_angle(&mut self, angle: f64) {
        self.body.angle = angle;
    }

    fn set_state(&mut self, state: EntityState) {
        self.body.state = state;
    }

    fn as_skeletal(&self) -> Option<&dyn SkeletalEntity> {
        Some(self)
    }

    fn as_skeletal_mut(&mut self) -> Option<&mut dyn SkeletalEntity> {
        Some(self)
    }
}

impl SkeletalEntity for MockSkeletalEntity {
    fn locomotion_state(&self) -> LocomotionState {
        self.locomotion_state.clone()
    }

    fn animation_name(&self) -> Option<&str> {
        self.animation_name.as_deref()
    }

    fn set_locomotion_state(&mut self, state: LocomotionState) {
        self.locomotion_state = state;
    }

    fn run_animation(&mut self, name: Option<&str>) {
        self.animation_name = name.map(str::to_string);
        self.animations_run.push(self.animation_name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_integrates_velocity() {
        let mut e = MockEntity::spawn([0.0, 0.0]).with_velocity([2.0, -1.0]);
        e.step(0.5);
        assert_eq!(e.position, [1.0, -0.5]);
        assert_eq!(e.entity_id(), "Entity:0.0_0.0");
    }

    #[test]
    fn skeletal_step_tracks_locomotion() {
        let mut d = MockSkeletalEntity::spawn_delver([0.0, 0.0]);
        d.body.velocity = [3.0, 0.0];
        d.step(0.1);
        assert_eq!(d.locomotion_state, LocomotionState::Run);
        assert_eq!(d.animation_name.as_deref(), Some("run"));

        d.body.velocity = [3.0, -2.0];
        d.step(0.1);
        assert_eq!(d.locomotion_state, LocomotionState::Fall);
    }

    #[test]
    fn only_skeletal_mock_exposes_capability() {
        let plain = MockEntity::spawn([1.0, 1.0]);
        let delver = MockSkeletalEntity::spawn_delver([1.0, 1.0]);
        assert!(plain.as_skeletal().is_none());
        assert!(delver.as_skeletal().is_some());
        assert_ne!(plain.entity_id(), delver.entity_id());
    }
}
