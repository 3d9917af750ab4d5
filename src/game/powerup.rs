//! Power-up countdown with an explicit subscriber registry
//!
//! The countdown is a single pending deferred stop, advanced by tick time.
//! Starting a new countdown replaces the old one, and a replaced countdown
//! never reports a stop.

use hecs::Entity;

/// Edge notification delivered to every subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpSignal {
    Started,
    Stopped,
}

/// Receives power-up edges for each subscribed entity.
pub trait PowerUpObserver {
    fn notify(&mut self, subscriber: Entity, signal: PowerUpSignal);
}

impl<F> PowerUpObserver for F
where
    F: FnMut(Entity, PowerUpSignal),
{
    fn notify(&mut self, subscriber: Entity, signal: PowerUpSignal) {
        self(subscriber, signal);
    }
}

/// Identifies one started countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Countdown {
    handle: CountdownHandle,
    remaining: f32,
}

/// Cancellable, restartable power-up countdown.
#[derive(Debug, Default)]
pub struct PowerUpTimer {
    active: Option<Countdown>,
    next_handle: u64,
    subscribers: Vec<Entity>,
}

impl PowerUpTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity for start/stop notifications. Idempotent.
    pub fn subscribe(&mut self, entity: Entity) {
        if !self.subscribers.contains(&entity) {
            self.subscribers.push(entity);
        }
    }

    /// Remove an entity from the registry. Returns whether it was present.
    pub fn unsubscribe(&mut self, entity: Entity) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|&e| e != entity);
        self.subscribers.len() != before
    }

    /// Registered subscribers, in registration order.
    #[must_use]
    pub fn subscribers(&self) -> &[Entity] {
        &self.subscribers
    }

    /// True iff a countdown is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Handle of the running countdown.
    #[must_use]
    pub fn handle(&self) -> Option<CountdownHandle> {
        self.active.map(|c| c.handle)
    }

    /// Seconds left on the running countdown.
    #[must_use]
    pub fn remaining(&self) -> Option<f32> {
        self.active.map(|c| c.remaining)
    }

    /// Replace any running countdown with a new one and notify `Started`.
    pub fn start(&mut self, duration: f32, observer: &mut impl PowerUpObserver) -> CountdownHandle {
        if self.cancel() {
            log::debug!("power-up restarted before expiry");
        }

        let handle = CountdownHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(Countdown {
            handle,
            remaining: duration.max(0.0),
        });

        self.broadcast(PowerUpSignal::Started, observer);
        handle
    }

    /// Abort the running countdown without notifying. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Advance the countdown; notifies `Stopped` when it runs out.
    pub fn advance(&mut self, dt: f32, observer: &mut impl PowerUpObserver) -> Option<PowerUpSignal> {
        let countdown = self.active.as_mut()?;
        countdown.remaining -= dt;
        if countdown.remaining > 0.0 {
            return None;
        }

        self.active = None;
        self.broadcast(PowerUpSignal::Stopped, observer);
        Some(PowerUpSignal::Stopped)
    }

    fn broadcast(&self, signal: PowerUpSignal, observer: &mut impl PowerUpObserver) {
        for &subscriber in &self.subscribers {
            observer.notify(subscriber, signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = hecs::World::new();
        (0..n).map(|_| world.spawn(())).collect()
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(Entity, PowerUpSignal)>,
    }

    impl PowerUpObserver for Recorder {
        fn notify(&mut self, subscriber: Entity, signal: PowerUpSignal) {
            self.seen.push((subscriber, signal));
        }
    }

    #[test]
    fn test_start_notifies_immediately() {
        let e = entities(2);
        let mut timer = PowerUpTimer::new();
        timer.subscribe(e[0]);
        timer.subscribe(e[1]);
        let mut recorder = Recorder::default();

        timer.start(3.0, &mut recorder);

        assert!(timer.is_active());
        assert_eq!(
            recorder.seen,
            [(e[0], PowerUpSignal::Started), (e[1], PowerUpSignal::Started)]
        );
    }

    #[test]
    fn test_stop_after_duration() {
        let e = entities(1);
        let mut timer = PowerUpTimer::new();
        timer.subscribe(e[0]);
        let mut recorder = Recorder::default();

        timer.start(1.0, &mut recorder);
        assert_eq!(timer.advance(0.5, &mut recorder), None);
        assert_eq!(timer.advance(0.5, &mut recorder), Some(PowerUpSignal::Stopped));

        assert!(!timer.is_active());
        assert_eq!(recorder.seen.last(), Some(&(e[0], PowerUpSignal::Stopped)));
        assert_eq!(timer.advance(1.0, &mut recorder), None);
    }

    #[test]
    fn test_restart_fires_exactly_one_stop_from_second_start() {
        let e = entities(1);
        let mut timer = PowerUpTimer::new();
        timer.subscribe(e[0]);
        let mut recorder = Recorder::default();

        let first = timer.start(5.0, &mut recorder);
        let second = timer.start(5.0, &mut recorder);
        assert_ne!(first, second);
        assert_eq!(timer.handle(), Some(second));

        assert_eq!(timer.advance(4.5, &mut recorder), None);
        assert_eq!(timer.advance(0.5, &mut recorder), Some(PowerUpSignal::Stopped));
        assert_eq!(timer.advance(10.0, &mut recorder), None);

        let stops = recorder
            .seen
            .iter()
            .filter(|(_, s)| *s == PowerUpSignal::Stopped)
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_restart_late_extends_countdown() {
        let mut timer = PowerUpTimer::new();
        let mut ignore = |_: Entity, _: PowerUpSignal| {};

        timer.start(2.0, &mut ignore);
        timer.advance(1.5, &mut ignore);
        timer.start(2.0, &mut ignore);

        // The first countdown would have ended here.
        assert_eq!(timer.advance(1.0, &mut ignore), None);
        assert_eq!(timer.remaining(), Some(1.0));
    }

    #[test]
    fn test_cancel_is_silent() {
        let e = entities(1);
        let mut timer = PowerUpTimer::new();
        timer.subscribe(e[0]);
        let mut recorder = Recorder::default();

        timer.start(1.0, &mut recorder);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.advance(2.0, &mut recorder), None);
        assert_eq!(recorder.seen, [(e[0], PowerUpSignal::Started)]);
    }

    #[test]
    fn test_unsubscribed_entities_are_not_notified() {
        let e = entities(2);
        let mut timer = PowerUpTimer::new();
        timer.subscribe(e[0]);
        timer.subscribe(e[0]);
        timer.subscribe(e[1]);
        assert!(timer.unsubscribe(e[0]));
        assert!(!timer.unsubscribe(e[0]));

        let mut recorder = Recorder::default();
        timer.start(1.0, &mut recorder);

        assert_eq!(timer.subscribers(), [e[1]]);
        assert_eq!(recorder.seen, [(e[1], PowerUpSignal::Started)]);
    }
}
