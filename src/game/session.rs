//! Game session: the per-tick entry point the host drives
//!
//! The session owns the ECS world, the player record, level data and the
//! random source. Each tick runs, in order:
//!
//! 1. the player's power-up countdown (stop edges interrupt enemies),
//! 2. every enemy's state machine against a snapshot taken at tick start,
//! 3. navigation movement,
//! 4. pickup and contact detection.
//!
//! Nothing in a tick returns an error; problems are logged and the affected
//! actor is skipped.

use glam::Vec3;
use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::enemy::{ContactOutcome, EnemyAgent, EnemyContext, resolve_contact};
use super::pickable::{Collected, PickableRegistry};
use super::player::{LifeOutcome, PlayerStatus};
use super::powerup::{PowerUpObserver, PowerUpSignal};
use super::score::ScoreBoard;
use crate::ai::{
    ActorSnapshot, NavAgent, Navigator, RespawnPoints, StateChange, Waypoint, select_respawn,
};
use crate::core::{AiTuning, EnemySpawn, EventQueue, GameConfig, GameError, GameEvent};
use crate::ecs::{ActorKind, Name, Pickable, PickableKind, Transform, World};

/// Scene requested when every item has been collected.
pub const WIN_SCENE: &str = "Win";
/// Scene requested when the player runs out of health.
pub const LOSE_SCENE: &str = "LoseScreen";

/// Player arrival tolerance for host-driven movement.
const PLAYER_STOPPING_DISTANCE: f32 = 0.05;

/// Whether the level is still being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug)]
struct PlayerSlot {
    entity: Entity,
    status: PlayerStatus,
}

/// Routes power-up edges to the subscribed enemies' state machines.
struct EnemyDispatch<'s> {
    world: &'s mut World,
    actors: &'s ActorSnapshot,
    waypoints: &'s [Waypoint],
    rng: &'s mut ChaCha8Rng,
    tuning: &'s AiTuning,
    events: &'s mut EventQueue,
}

impl PowerUpObserver for EnemyDispatch<'_> {
    fn notify(&mut self, subscriber: Entity, signal: PowerUpSignal) {
        let Ok((transform, agent, nav)) = self
            .world
            .query_one_mut::<(&Transform, &mut EnemyAgent, &mut NavAgent)>(subscriber)
        else {
            log::warn!("power-up subscriber {subscriber:?} is not an enemy, skipping");
            return;
        };

        let target = agent.player().and_then(|p| self.actors.position(p));
        let mut ctx = EnemyContext {
            entity: subscriber,
            position: transform.position,
            target,
            chase_distance: agent.chase_distance(),
            actors: self.actors,
            waypoints: self.waypoints,
            nav,
            rng: &mut *self.rng,
            tuning: self.tuning,
            delta_time: 0.0,
        };
        let change = agent.on_power_up(signal, &mut ctx);
        push_state_change(self.events, subscriber, change);
    }
}

fn push_state_change(events: &mut EventQueue, entity: Entity, change: StateChange) {
    events.push(GameEvent::EnemyStateChanged {
        entity,
        from: change.from,
        to: change.to,
    });
}

/// One running level.
pub struct GameSession {
    config: GameConfig,
    world: World,
    player: Option<PlayerSlot>,
    waypoints: Vec<Waypoint>,
    respawns: RespawnPoints,
    pickables: PickableRegistry,
    score: ScoreBoard,
    events: EventQueue,
    rng: ChaCha8Rng,
    outcome: GameOutcome,
    /// Enemies touching the player at the end of the last tick
    touching: FxHashSet<Entity>,
    ticks: u64,
}

impl GameSession {
    /// Build a session from configuration, spawning the player, enemies and
    /// items of the level.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid, including an empty
    /// respawn point list.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let respawns = RespawnPoints::from_positions(&config.level.respawn_points)?;

        let mut session = Self {
            waypoints: Waypoint::from_positions(&config.level.waypoints),
            respawns,
            world: World::new(),
            player: None,
            pickables: PickableRegistry::new(),
            score: ScoreBoard::new(),
            events: EventQueue::new(),
            rng: ChaCha8Rng::seed_from_u64(config.session.seed),
            outcome: GameOutcome::InProgress,
            touching: FxHashSet::default(),
            ticks: 0,
            config,
        };

        let player = session.world.spawn((
            Transform::from_position(session.config.level.player_start),
            ActorKind::Player,
            Name::new("Player"),
            NavAgent::new(session.config.player.speed, PLAYER_STOPPING_DISTANCE),
        ));
        session.player = Some(PlayerSlot {
            entity: player,
            status: PlayerStatus::new(session.config.player.health),
        });

        for spawn in session.config.level.enemies.clone() {
            session.spawn_enemy(&spawn);
        }
        for item in session.config.level.pickables.clone() {
            session.spawn_pickable(item.kind, item.position);
        }
        log::info!(
            "level '{}' ready: {} enemies, {} items, {} waypoints",
            session.config.level.name,
            session.config.level.enemies.len(),
            session.pickables.total(),
            session.waypoints.len(),
        );
        Ok(session)
    }

    // ------------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------------

    /// Add an enemy. Enemies that track the player subscribe to its power-up.
    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> Entity {
        let tracked = if spawn.tracks_player {
            self.player.as_ref().map(|slot| slot.entity)
        } else {
            None
        };
        if tracked.is_none() {
            log::warn!(
                "enemy at {} has no tracked player; it will only patrol",
                spawn.position
            );
        }

        let entity = self.world.spawn((
            Transform::from_position(spawn.position),
            ActorKind::Enemy,
            Name::new("Enemy"),
            EnemyAgent::new(spawn.chase_distance, tracked),
            NavAgent::new(self.config.ai.speed, self.config.ai.stopping_distance),
        ));

        self.start_enemy(entity);

        if let (Some(slot), Some(_)) = (self.player.as_mut(), tracked) {
            slot.status.power_up_mut().subscribe(entity);
        }
        self.events.push(GameEvent::EnemySpawned { entity });
        entity
    }

    /// Enter the new enemy's initial state so a power-up arriving before its
    /// first tick still exits Patrol.
    fn start_enemy(&mut self, entity: Entity) {
        let actors = self.world.snapshot();
        let Ok((transform, agent, nav)) = self
            .world
            .query_one_mut::<(&Transform, &mut EnemyAgent, &mut NavAgent)>(entity)
        else {
            return;
        };

        let target = agent.player().and_then(|p| actors.position(p));
        let mut ctx = EnemyContext {
            entity,
            position: transform.position,
            target,
            chase_distance: agent.chase_distance(),
            actors: &actors,
            waypoints: &self.waypoints,
            nav,
            rng: &mut self.rng,
            tuning: &self.config.ai,
            delta_time: 0.0,
        };
        agent.start(&mut ctx);
    }

    /// Add a collectable item.
    pub fn spawn_pickable(&mut self, kind: PickableKind, position: Vec3) -> Entity {
        let entity = self.world.spawn((
            Transform::from_position(position),
            Pickable { kind },
            Name::new(format!("{kind:?}")),
        ));
        self.pickables.register(entity);

        let total = u32::try_from(self.pickables.total()).unwrap_or(u32::MAX);
        self.score.set_max_score(total);
        self.events.push(GameEvent::ScoreChanged {
            score: self.score.score(),
            max_score: total,
        });
        entity
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds. Inert once the game is over.
    pub fn tick(&mut self, dt: f32) {
        if self.outcome != GameOutcome::InProgress {
            return;
        }
        self.ticks += 1;

        let actors = self.world.snapshot();
        self.advance_power_up(dt, &actors);
        self.update_enemies(dt, &actors);
        self.move_actors(dt);
        self.detect_pickups();
        self.detect_contacts();
    }

    fn advance_power_up(&mut self, dt: f32, actors: &ActorSnapshot) {
        let Self {
            world,
            player,
            waypoints,
            rng,
            config,
            events,
            ..
        } = self;
        let Some(slot) = player.as_mut() else {
            return;
        };

        let mut dispatch = EnemyDispatch {
            world,
            actors,
            waypoints,
            rng,
            tuning: &config.ai,
            events: &mut *events,
        };
        if slot.status.power_up_mut().advance(dt, &mut dispatch).is_some() {
            log::info!("power-up expired");
            events.push(GameEvent::PowerUpStopped);
        }
    }

    fn update_enemies(&mut self, dt: f32, actors: &ActorSnapshot) {
        let Self {
            world,
            waypoints,
            rng,
            config,
            events,
            ..
        } = self;

        for (entity, (transform, agent, nav)) in
            world.query_mut::<(&Transform, &mut EnemyAgent, &mut NavAgent)>()
        {
            let target = agent.player().and_then(|p| actors.position(p));
            let mut ctx = EnemyContext {
                entity,
                position: transform.position,
                target,
                chase_distance: agent.chase_distance(),
                actors,
                waypoints,
                nav,
                rng: &mut *rng,
                tuning: &config.ai,
                delta_time: dt,
            };
            if let Some(change) = agent.update(&mut ctx) {
                push_state_change(events, entity, change);
            }
        }
    }

    fn move_actors(&mut self, dt: f32) {
        for (_, (transform, nav)) in self.world.query_mut::<(&mut Transform, &mut NavAgent)>() {
            nav.step(&mut transform.position, dt);
        }
    }

    fn detect_pickups(&mut self) {
        let Some(position) = self.player_position() else {
            return;
        };
        let radius = self.config.session.pickup_radius;

        let picked: SmallVec<[Entity; 4]> = {
            let mut query = self.world.query::<(&Transform, &Pickable)>();
            query
                .iter()
                .filter(|(_, (transform, _))| transform.position.distance(position) <= radius)
                .map(|(entity, _)| entity)
                .collect()
        };

        for item in picked {
            self.on_picked(item);
        }
    }

    fn detect_contacts(&mut self) {
        let (Some(player), Some(position)) = (self.player_entity(), self.player_position()) else {
            return;
        };
        let radius = self.config.session.contact_radius;

        let touching: SmallVec<[Entity; 4]> = self
            .world
            .snapshot()
            .enemies()
            .filter(|enemy| enemy.position.distance(position) <= radius)
            .map(|enemy| enemy.entity)
            .collect();
        let fresh: SmallVec<[Entity; 4]> = touching
            .iter()
            .copied()
            .filter(|enemy| !self.touching.contains(enemy))
            .collect();
        self.touching = touching.into_iter().collect();

        for enemy in fresh {
            if self.outcome != GameOutcome::InProgress {
                break;
            }
            self.on_contact(enemy, player);
        }
    }

    // ------------------------------------------------------------------------
    // Host callbacks
    // ------------------------------------------------------------------------

    /// Resolve contact between two actors. Returns `None` unless one is an
    /// enemy and the other the player.
    pub fn on_contact(&mut self, a: Entity, b: Entity) -> Option<ContactOutcome> {
        if self.outcome != GameOutcome::InProgress {
            return None;
        }

        let (enemy, player) = match (self.world.actor_kind(a), self.world.actor_kind(b)) {
            (Some(ActorKind::Enemy), Some(ActorKind::Player)) => (a, b),
            (Some(ActorKind::Player), Some(ActorKind::Enemy)) => (b, a),
            _ => return None,
        };
        let slot = self.player.as_ref().filter(|slot| slot.entity == player)?;

        let retreating = self
            .world
            .get::<EnemyAgent>(enemy)
            .map(|agent| agent.is_retreating())
            .unwrap_or(false);
        let outcome = resolve_contact(slot.status.power_up_active(), retreating);

        match outcome {
            ContactOutcome::EnemyKilled => {
                if let Err(err) = self.kill_enemy(enemy) {
                    log::warn!("contact kill failed: {err}");
                }
            }
            ContactOutcome::PlayerHit => self.damage_player(),
            ContactOutcome::Harmless => log::debug!("{enemy:?} is retreating, contact ignored"),
        }
        Some(outcome)
    }

    /// Collect an item. Returns `None` for unknown or already collected items.
    pub fn on_picked(&mut self, item: Entity) -> Option<Collected> {
        if self.outcome != GameOutcome::InProgress {
            return None;
        }

        let kind = self.world.get::<Pickable>(item).ok().map(|p| p.kind)?;
        let collected = self.pickables.collect(item)?;
        if self.world.despawn(item).is_err() {
            log::warn!("picked item {item:?} was already despawned");
        }

        self.score.add(1);
        self.events.push(GameEvent::ItemPicked { entity: item, kind });
        self.events.push(GameEvent::ScoreChanged {
            score: self.score.score(),
            max_score: self.score.max_score(),
        });

        if kind == PickableKind::PowerUp {
            self.start_power_up();
        }

        if collected.all_collected() {
            log::info!("all items collected, level won");
            self.outcome = GameOutcome::Won;
            self.events.push(GameEvent::SceneRequested { name: WIN_SCENE });
        }
        Some(collected)
    }

    /// Remove an enemy that died. Also used when the powered-up player kills one.
    ///
    /// # Errors
    ///
    /// Returns an error if `enemy` is not a live enemy.
    pub fn kill_enemy(&mut self, enemy: Entity) -> Result<(), GameError> {
        if self.world.actor_kind(enemy) != Some(ActorKind::Enemy) {
            return Err(GameError::NoSuchEntity(enemy));
        }

        if let Some(slot) = self.player.as_mut() {
            slot.status.power_up_mut().unsubscribe(enemy);
        }
        self.world
            .despawn(enemy)
            .map_err(|_| GameError::NoSuchEntity(enemy))?;
        self.touching.remove(&enemy);

        log::info!("enemy {enemy:?} killed");
        self.events.push(GameEvent::EnemyKilled { entity: enemy });
        Ok(())
    }

    /// Send the player towards `destination` (host input stand-in).
    ///
    /// # Errors
    ///
    /// Returns an error if there is no player.
    pub fn set_player_destination(&mut self, destination: Vec3) -> Result<(), GameError> {
        let player = self.player_entity().ok_or(GameError::NoPlayer)?;
        let mut nav = self
            .world
            .get_mut::<NavAgent>(player)
            .map_err(|_| GameError::NoSuchEntity(player))?;
        nav.set_destination(destination);
        Ok(())
    }

    fn start_power_up(&mut self) {
        let actors = self.world.snapshot();
        let duration = self.config.player.power_up_duration;
        let Self {
            world,
            player,
            waypoints,
            rng,
            config,
            events,
            ..
        } = self;
        let Some(slot) = player.as_mut() else {
            return;
        };

        log::info!("power-up started for {duration}s");
        events.push(GameEvent::PowerUpStarted { duration });
        let mut dispatch = EnemyDispatch {
            world,
            actors: &actors,
            waypoints,
            rng,
            tuning: &config.ai,
            events,
        };
        slot.status.pick_power_up(duration, &mut dispatch);
    }

    fn damage_player(&mut self) {
        let Some(slot) = self.player.as_mut() else {
            return;
        };
        let outcome = slot.status.lose_life();
        let health = slot.status.health();
        let entity = slot.entity;
        self.events.push(GameEvent::PlayerDamaged { health });

        match outcome {
            LifeOutcome::Respawn => self.respawn_player(entity),
            LifeOutcome::Lost => {
                log::info!("player out of health, level lost");
                self.outcome = GameOutcome::Lost;
                self.events.push(GameEvent::SceneRequested { name: LOSE_SCENE });
            }
        }
    }

    fn respawn_player(&mut self, player: Entity) {
        let enemies = self.world.snapshot().enemy_positions();
        let choice = select_respawn(
            &self.respawns,
            &enemies,
            self.config.player.hazard_radius,
            &mut self.rng,
        );
        if !choice.safe {
            log::warn!(
                "no safe respawn point; using point {} with clearance {:.2}",
                choice.point.id,
                choice.clearance
            );
        }
        let (position, safe) = (choice.point.position, choice.safe);

        match self
            .world
            .query_one_mut::<(&mut Transform, &mut NavAgent)>(player)
        {
            Ok((transform, nav)) => {
                transform.position = position;
                nav.reset_path();
            }
            Err(_) => log::warn!("player {player:?} has no transform to respawn"),
        }
        self.events.push(GameEvent::PlayerRespawned { position, safe });
    }

    // ------------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn player_entity(&self) -> Option<Entity> {
        self.player.as_ref().map(|slot| slot.entity)
    }

    #[must_use]
    pub fn player_position(&self) -> Option<Vec3> {
        self.player_entity()
            .and_then(|player| self.world.position(player))
    }

    #[must_use]
    pub fn player_status(&self) -> Option<&PlayerStatus> {
        self.player.as_ref().map(|slot| &slot.status)
    }

    /// Player health, 0 when there is no player.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.player_status().map_or(0, PlayerStatus::health)
    }

    #[must_use]
    pub fn power_up_active(&self) -> bool {
        self.player_status()
            .is_some_and(PlayerStatus::power_up_active)
    }

    #[must_use]
    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    #[must_use]
    pub fn remaining_pickables(&self) -> usize {
        self.pickables.remaining()
    }

    /// Live enemies.
    #[must_use]
    pub fn enemies(&self) -> Vec<Entity> {
        let mut query = self.world.query::<&EnemyAgent>();
        query.iter().map(|(entity, _)| entity).collect()
    }

    /// Current state name of an enemy.
    #[must_use]
    pub fn enemy_state(&self, enemy: Entity) -> Option<&'static str> {
        self.world
            .get::<EnemyAgent>(enemy)
            .ok()
            .map(|agent| agent.state_name())
    }

    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }
}
