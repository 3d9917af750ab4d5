//! Enemy agent: Patrol / Chase / Retreat
//!
//! Patrol wanders between free waypoints and switches to Chase when the
//! tracked player comes within the chase distance. Chase follows the player
//! until a power-up interrupt. Retreat is entered and left only through
//! power-up interrupts.

use glam::Vec3;
use hecs::Entity;
use rand::RngCore;

use super::powerup::PowerUpSignal;
use crate::ai::{
    ActorSnapshot, Flee, Navigator, State, StateChange, StateMachine, StateName, Transition,
    Waypoint, select_waypoint,
};
use crate::core::AiTuning;

/// Everything an enemy may read or drive during one update.
pub struct EnemyContext<'a> {
    /// The enemy being updated
    pub entity: Entity,
    /// Its position at snapshot time
    pub position: Vec3,
    /// Tracked player position, if there is a tracked player
    pub target: Option<Vec3>,
    pub chase_distance: f32,
    pub actors: &'a ActorSnapshot,
    pub waypoints: &'a [Waypoint],
    pub nav: &'a mut dyn Navigator,
    pub rng: &'a mut dyn RngCore,
    pub tuning: &'a AiTuning,
    pub delta_time: f32,
}

// ============================================================================
// States
// ============================================================================

/// Patrol sub-phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolPhase {
    /// Not moving and not waiting: pick a waypoint this tick
    Selecting,
    /// Walking to a waypoint
    Moving { destination: Vec3 },
    /// Idling; `elapsed` starts at zero every time waiting begins
    Waiting { elapsed: f32 },
}

/// Patrol-local data.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolState {
    phase: PatrolPhase,
}

impl PatrolState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: PatrolPhase::Selecting,
        }
    }

    #[must_use]
    pub fn phase(&self) -> PatrolPhase {
        self.phase
    }

    fn start_waiting(&mut self, ctx: &mut EnemyContext<'_>) {
        ctx.nav.reset_path();
        self.phase = PatrolPhase::Waiting { elapsed: 0.0 };
    }

    fn update(&mut self, ctx: &mut EnemyContext<'_>) -> Transition<EnemyState> {
        if let Some(target) = ctx.target {
            if ctx.position.distance(target) < ctx.chase_distance {
                return Transition::To(EnemyState::Chase);
            }
        }

        match self.phase {
            PatrolPhase::Waiting { elapsed } => {
                let elapsed = elapsed + ctx.delta_time;
                self.phase = if elapsed >= ctx.tuning.wait_duration {
                    PatrolPhase::Selecting
                } else {
                    PatrolPhase::Waiting { elapsed }
                };
            }
            PatrolPhase::Selecting => {
                let (entity, actors) = (ctx.entity, ctx.actors);
                let radius = ctx.tuning.occupancy_radius;
                let picked = select_waypoint(
                    ctx.waypoints,
                    |w| actors.is_occupied(w.position, radius, Some(entity)),
                    &mut *ctx.rng,
                );

                match picked {
                    Some(waypoint) => {
                        log::debug!("{entity:?} patrols to waypoint {}", waypoint.id);
                        ctx.nav.set_destination(waypoint.position);
                        self.phase = PatrolPhase::Moving {
                            destination: waypoint.position,
                        };
                    }
                    None => {
                        log::debug!("{entity:?} found no free waypoint, idling");
                        self.start_waiting(ctx);
                    }
                }
            }
            PatrolPhase::Moving { .. } => {
                let nav = &*ctx.nav;
                if !nav.path_pending() && nav.remaining_distance() <= nav.stopping_distance() {
                    self.start_waiting(ctx);
                }
            }
        }

        Transition::None
    }
}

impl Default for PatrolState {
    fn default() -> Self {
        Self::new()
    }
}

/// Enemy behavior state. Exactly one variant is current at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyState {
    Patrol(PatrolState),
    Chase,
    Retreat,
}

impl EnemyState {
    pub const PATROL: &'static str = "Patrol";
    pub const CHASE: &'static str = "Chase";
    pub const RETREAT: &'static str = "Retreat";

    /// A fresh patrol state.
    #[must_use]
    pub fn patrol() -> Self {
        Self::Patrol(PatrolState::new())
    }

    /// Patrol phase, when patrolling.
    #[must_use]
    pub fn patrol_phase(&self) -> Option<PatrolPhase> {
        match self {
            Self::Patrol(patrol) => Some(patrol.phase()),
            _ => None,
        }
    }
}

impl StateName for EnemyState {
    fn name(&self) -> &'static str {
        match self {
            Self::Patrol(_) => Self::PATROL,
            Self::Chase => Self::CHASE,
            Self::Retreat => Self::RETREAT,
        }
    }
}

impl<'a> State<EnemyContext<'a>> for EnemyState {
    fn enter(&mut self, ctx: &mut EnemyContext<'a>) {
        match self {
            Self::Patrol(patrol) => patrol.phase = PatrolPhase::Selecting,
            Self::Chase => {}
            Self::Retreat => ctx.nav.reset_path(),
        }
    }

    fn update(&mut self, ctx: &mut EnemyContext<'a>) -> Transition<Self> {
        match self {
            Self::Patrol(patrol) => patrol.update(ctx),
            Self::Chase => {
                if let Some(target) = ctx.target {
                    ctx.nav.set_destination(target);
                }
                Transition::None
            }
            Self::Retreat => {
                let escape = ctx.target.and_then(|threat| {
                    Flee::new(threat, ctx.tuning.speed)
                        .escape_point(ctx.position, ctx.tuning.flee_distance)
                });
                if let Some(escape) = escape {
                    ctx.nav.set_destination(escape);
                }
                Transition::None
            }
        }
    }

    fn exit(&mut self, ctx: &mut EnemyContext<'a>) {
        match self {
            Self::Patrol(_) => log::debug!("{:?} stops patrolling", ctx.entity),
            Self::Chase => {}
            Self::Retreat => ctx.nav.reset_path(),
        }
    }
}

// ============================================================================
// Agent
// ============================================================================

/// Per-enemy record stored as an ECS component.
#[derive(Debug)]
pub struct EnemyAgent {
    brain: StateMachine<EnemyState>,
    chase_distance: f32,
    player: Option<Entity>,
}

impl EnemyAgent {
    /// New agent starting in Patrol. `player` may be absent, in which case the
    /// agent patrols forever.
    #[must_use]
    pub fn new(chase_distance: f32, player: Option<Entity>) -> Self {
        Self {
            brain: StateMachine::new(EnemyState::patrol()),
            chase_distance,
            player,
        }
    }

    #[must_use]
    pub fn chase_distance(&self) -> f32 {
        self.chase_distance
    }

    /// Tracked player entity.
    #[must_use]
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    #[must_use]
    pub fn state(&self) -> &EnemyState {
        self.brain.current()
    }

    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.brain.current_state_name()
    }

    #[must_use]
    pub fn is_retreating(&self) -> bool {
        matches!(self.state(), EnemyState::Retreat)
    }

    /// Enter the initial Patrol state. Called once the agent is spawned.
    pub fn start(&mut self, ctx: &mut EnemyContext<'_>) {
        self.brain.start(ctx);
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.brain.is_started()
    }

    /// Run one tick of the current state.
    pub fn update(&mut self, ctx: &mut EnemyContext<'_>) -> Option<StateChange> {
        self.brain.update(ctx)
    }

    /// Exit the current state and enter `state` right away.
    pub fn switch_state(&mut self, ctx: &mut EnemyContext<'_>, state: EnemyState) -> StateChange {
        self.brain.transition(ctx, state)
    }

    /// Power-up interrupt: start forces Retreat, stop forces Patrol, from any state.
    pub fn on_power_up(&mut self, signal: PowerUpSignal, ctx: &mut EnemyContext<'_>) -> StateChange {
        let next = match signal {
            PowerUpSignal::Started => EnemyState::Retreat,
            PowerUpSignal::Stopped => EnemyState::patrol(),
        };
        self.switch_state(ctx, next)
    }
}

// ============================================================================
// Contact
// ============================================================================

/// Result of an enemy touching the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The powered-up player destroys the enemy
    EnemyKilled,
    /// The enemy costs the player a life
    PlayerHit,
    /// A retreating enemy is harmless
    Harmless,
}

/// Contact rule. The power-up check runs first, so a powered-up player always
/// wins the contact even against an enemy that has not switched to Retreat.
#[must_use]
pub fn resolve_contact(power_up_active: bool, enemy_retreating: bool) -> ContactOutcome {
    if power_up_active {
        ContactOutcome::EnemyKilled
    } else if enemy_retreating {
        ContactOutcome::Harmless
    } else {
        ContactOutcome::PlayerHit
    }
}
