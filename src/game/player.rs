//! Player status: lives and the power-up countdown

use super::powerup::{CountdownHandle, PowerUpObserver, PowerUpTimer};

/// What losing a life led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    /// Lives remain; the player comes back at a respawn point
    Respawn,
    /// Health reached zero; the game is lost
    Lost,
}

/// Per-player mutable record.
#[derive(Debug)]
pub struct PlayerStatus {
    health: u32,
    power_up: PowerUpTimer,
}

impl PlayerStatus {
    #[must_use]
    pub fn new(health: u32) -> Self {
        Self {
            health,
            power_up: PowerUpTimer::new(),
        }
    }

    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Derived from the countdown, so it is true iff one is running.
    #[must_use]
    pub fn power_up_active(&self) -> bool {
        self.power_up.is_active()
    }

    #[must_use]
    pub fn power_up(&self) -> &PowerUpTimer {
        &self.power_up
    }

    pub fn power_up_mut(&mut self) -> &mut PowerUpTimer {
        &mut self.power_up
    }

    /// Take one lethal hit. Health never drops below zero.
    pub fn lose_life(&mut self) -> LifeOutcome {
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            // No stop edge after a loss: nobody is left to retreat from.
            self.power_up.cancel();
            LifeOutcome::Lost
        } else {
            LifeOutcome::Respawn
        }
    }

    /// Start (or restart) the power-up countdown.
    pub fn pick_power_up(
        &mut self,
        duration: f32,
        observer: &mut impl PowerUpObserver,
    ) -> CountdownHandle {
        self.power_up.start(duration, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::powerup::PowerUpSignal;
    use hecs::Entity;

    #[test]
    fn test_last_life_is_a_loss_not_a_respawn() {
        let mut status = PlayerStatus::new(1);

        assert_eq!(status.lose_life(), LifeOutcome::Lost);
        assert_eq!(status.health(), 0);
        assert!(!status.is_alive());
    }

    #[test]
    fn test_health_is_clamped_at_zero() {
        let mut status = PlayerStatus::new(1);
        status.lose_life();

        assert_eq!(status.lose_life(), LifeOutcome::Lost);
        assert_eq!(status.health(), 0);
    }

    #[test]
    fn test_lives_remaining_respawn() {
        let mut status = PlayerStatus::new(3);

        assert_eq!(status.lose_life(), LifeOutcome::Respawn);
        assert_eq!(status.health(), 2);
    }

    #[test]
    fn test_power_up_flag_follows_countdown() {
        let mut status = PlayerStatus::new(3);
        let mut ignore = |_: Entity, _: PowerUpSignal| {};
        assert!(!status.power_up_active());

        status.pick_power_up(1.0, &mut ignore);
        assert!(status.power_up_active());

        status.power_up_mut().advance(1.0, &mut ignore);
        assert!(!status.power_up_active());
    }

    #[test]
    fn test_loss_cancels_power_up() {
        let mut status = PlayerStatus::new(1);
        let mut ignore = |_: Entity, _: PowerUpSignal| {};
        status.pick_power_up(5.0, &mut ignore);

        status.lose_life();

        assert!(!status.power_up_active());
    }
}
