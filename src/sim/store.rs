//! Position store: entity handles mapped to transforms
//!
//! Balls never own their position. They hold an [`Entity`] handle into a
//! [`PositionStore`], the same boundary a scene graph would expose. The
//! default store sits on a generational slot map, so a destroyed handle can
//! never read or write a slot that has since been reused.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Opaque generational handle into a position store
    pub struct Entity;
}

/// Authoritative spatial state for entities
pub trait PositionStore {
    /// Create a new entity at `pos`
    fn create_entity(&mut self, pos: Vec3) -> Entity;
    /// Destroy an entity; returns false if the handle was already stale
    fn destroy_entity(&mut self, entity: Entity) -> bool;
    /// Position of a live entity
    fn position(&self, entity: Entity) -> Option<Vec3>;
    /// Move a live entity (stale handles are ignored)
    fn set_position(&mut self, entity: Entity, pos: Vec3);
    /// Number of live entities
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Slot-map backed positions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transforms {
    positions: SlotMap<Entity, Vec3>,
}

impl Transforms {
    pub fn new() -> Self {
        Self {
            positions: SlotMap::with_key(),
        }
    }
}

impl PositionStore for Transforms {
    fn create_entity(&mut self, pos: Vec3) -> Entity {
        self.positions.insert(pos)
    }

    fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.positions.remove(entity).is_some()
    }

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.positions.get(entity).copied()
    }

    fn set_position(&mut self, entity: Entity, pos: Vec3) {
        if let Some(slot) = self.positions.get_mut(entity) {
            *slot = pos;
        }
    }

    fn len(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_move() {
        let mut store = Transforms::new();
        let e = store.create_entity(Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(store.len(), 1);
        store.set_position(e, Vec3::new(0.1, 0.2, 0.0));
        assert_eq!(store.position(e), Some(Vec3::new(0.1, 0.2, 0.0)));
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut store = Transforms::new();
        let old = store.create_entity(Vec3::ZERO);
        assert!(store.destroy_entity(old));
        assert!(!store.destroy_entity(old));

        let new = store.create_entity(Vec3::ONE);
        assert_ne!(new, old);

        // Old handle must not see or clobber the reused slot
        assert_eq!(store.position(old), None);
        store.set_position(old, Vec3::NEG_ONE);
        assert_eq!(store.position(new), Some(Vec3::ONE));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_destroy_leaves_others_alone() {
        let mut store = Transforms::new();
        let a = store.create_entity(Vec3::X);
        let b = store.create_entity(Vec3::Y);
        store.destroy_entity(a);
        assert_eq!(store.position(b), Some(Vec3::Y));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
