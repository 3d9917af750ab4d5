//! Registry of collectable items still in the level

use hecs::Entity;
use rustc_hash::FxHashSet;

/// Result of collecting a registered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collected {
    /// Items still in the level
    pub remaining: usize,
}

impl Collected {
    /// Whether this was the last item.
    #[must_use]
    pub fn all_collected(&self) -> bool {
        self.remaining == 0
    }
}

/// Tracks which items can still be picked up.
#[derive(Debug, Default)]
pub struct PickableRegistry {
    remaining: FxHashSet<Entity>,
    total: usize,
}

impl PickableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: Entity) {
        if self.remaining.insert(entity) {
            self.total += 1;
        }
    }

    /// Items registered since the level started.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.remaining.contains(&entity)
    }

    /// Remove a picked item. `None` when it was unknown or already taken.
    pub fn collect(&mut self, entity: Entity) -> Option<Collected> {
        self.remaining.remove(&entity).then(|| Collected {
            remaining: self.remaining.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_each_item_once() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let mut registry = PickableRegistry::new();
        registry.register(a);
        registry.register(b);
        registry.register(b);
        assert_eq!(registry.total(), 2);

        assert_eq!(registry.collect(a), Some(Collected { remaining: 1 }));
        assert_eq!(registry.collect(a), None);

        let last = registry.collect(b).unwrap();
        assert!(last.all_collected());
        assert_eq!(registry.total(), 2);
    }
}
