//! Event Queue System for Decoupled Communication
//!
//! The session pushes a `GameEvent` whenever something observable happens
//! (state switches, damage, pickups, scene requests). Hosts read them after
//! the tick to drive UI, audio or scene loading.
//!
//! The queue is double-buffered: events pushed during tick N become readable
//! after `swap()` at the tick boundary.
//!
//! # Example
//!
//! ```ignore
//! session.tick(dt);
//! session.events_mut().swap();
//! for event in session.events_mut().drain() {
//!     if let GameEvent::SceneRequested { name } = event {
//!         host.load_scene(name);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;
use hecs::Entity;

use crate::ecs::PickableKind;

// ============================================================================
// Event Types
// ============================================================================

/// Game events for inter-system communication.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    // -------------------------------------------------------------------------
    // Enemy Events
    // -------------------------------------------------------------------------
    /// An enemy joined the world.
    EnemySpawned {
        entity: Entity,
    },

    /// An enemy's state machine switched state.
    EnemyStateChanged {
        entity: Entity,
        from: &'static str,
        to: &'static str,
    },

    /// An enemy was killed by the powered-up player.
    EnemyKilled {
        entity: Entity,
    },

    // -------------------------------------------------------------------------
    // Player Events
    // -------------------------------------------------------------------------
    /// The player lost a life.
    PlayerDamaged {
        /// Health left after the hit
        health: u32,
    },

    /// The player was moved to a respawn point.
    PlayerRespawned {
        position: Vec3,
        /// False when every point was within the hazard radius
        safe: bool,
    },

    /// A power-up countdown began.
    PowerUpStarted {
        duration: f32,
    },

    /// The power-up countdown ran out.
    PowerUpStopped,

    // -------------------------------------------------------------------------
    // Pickup / Score Events
    // -------------------------------------------------------------------------
    /// An item was collected.
    ItemPicked {
        entity: Entity,
        kind: PickableKind,
    },

    /// Score changed.
    ScoreChanged {
        score: u32,
        max_score: u32,
    },

    // -------------------------------------------------------------------------
    // Game State Events
    // -------------------------------------------------------------------------
    /// The host should load a different scene.
    SceneRequested {
        name: &'static str,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for tick-consistent event processing.
///
/// Events pushed during tick N are available for reading after the next
/// `swap()`.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this tick
    pending: VecDeque<GameEvent>,
    /// Events from the previous tick, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
            processing: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }

    /// Push an event to be processed after the next swap.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Events not drained since the previous swap are discarded.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous tick.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous tick.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for the next swap.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entity() -> Entity {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    #[test]
    fn test_event_queue_push_and_swap() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::PowerUpStopped);
        assert!(queue.is_empty(), "Events should not be visible before swap");
        assert_eq!(queue.pending_count(), 1);

        queue.swap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next(), Some(&GameEvent::PowerUpStopped));
    }

    #[test]
    fn test_event_queue_double_buffer_isolation() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::PlayerDamaged { health: 2 });
        queue.swap();
        queue.push(GameEvent::PlayerDamaged { health: 1 });

        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events, [&GameEvent::PlayerDamaged { health: 2 }]);

        queue.swap();
        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events, [&GameEvent::PlayerDamaged { health: 1 }]);
    }

    #[test]
    fn test_event_queue_drain() {
        let mut queue = EventQueue::new();
        let entity = test_entity();

        queue.push(GameEvent::EnemySpawned { entity });
        queue.push(GameEvent::EnemyStateChanged {
            entity,
            from: "Patrol",
            to: "Chase",
        });
        queue.swap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());
    }
}
