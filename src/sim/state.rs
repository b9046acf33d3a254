//! Session state and the scoring/progress state machine
//!
//! A `GameState` is one session: `Init -> Running -> {Won | Lost}`. Only a
//! running session accepts input, spawns entities, or changes score, health
//! and progress. The terminal transition fires at most once; after it the
//! world freezes and a single hand-off is emitted once the end delay elapses.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Contact, classify_contact};
use super::catalog::CollectibleDef;
use super::entity::{Collectible, Hazard, Player, Projectile};
use super::level::{GROUND_Y, Level, SIDE_START_X};
use super::spawn::SpawnCadence;
use super::timer::Timer;
use crate::consts::*;
use crate::ms_to_ticks;
use crate::tuning::{InvincibleContact, Tuning, Variant};

/// Catcher player rests this far above the bottom edge
const CATCHER_PLAYER_OFFSET: f32 = 80.0;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, not started
    Init,
    /// Active gameplay
    Running,
    /// Goal reached
    Won,
    /// Out of health or out of bounds
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Health,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillSource {
    Stomp,
    Projectile,
}

/// Payload handed to the win / game-over scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndSummary {
    pub score: u32,
    pub items_collected: u32,
    pub progress_percent: u32,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged {
        score: u32,
        health: u8,
        max_health: u8,
        items_collected: u32,
    },
    ProgressChanged {
        progress: f32,
        max_distance: f32,
    },
    Collected {
        id: u32,
        key: &'static str,
        score: u32,
    },
    PlayerHit {
        hazard_id: u32,
        health: u8,
    },
    HazardKilled {
        id: u32,
        bonus: u32,
        source: KillSource,
    },
    Ended {
        outcome: Outcome,
        cause: Option<LossCause>,
    },
    Handoff {
        outcome: Outcome,
        summary: EndSummary,
    },
}

/// Result of a player/hazard contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Nothing happened (ended session, dead hazard, or pass-through)
    Ignored,
    /// Hazard removed by an invincible player, no effect
    Absorbed,
    /// Hazard killed from above
    Stomped,
    /// Player lost health
    Damaged,
}

/// Complete session state (deterministic for a seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub variant: Variant,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    /// Distance travelled or accumulated percentage, in `[0, target_progress]`
    pub progress: f32,
    pub items_collected: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub collectibles: Vec<Collectible>,
    pub hazards: Vec<Hazard>,
    pub projectiles: Vec<Projectile>,
    pub level: Level,
    pub(crate) rng: Pcg32,
    pub(crate) item_spawner: SpawnCadence,
    pub(crate) hazard_spawner: Option<SpawnCadence>,
    /// Cyclic type indices for the side variants
    pub(crate) item_index: usize,
    pub(crate) hazard_index: usize,
    handoff: Timer,
    halted: bool,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session in `Init` with the given seed
    pub fn new(variant: Variant, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let (player, level) = if variant.is_side_scroller() {
            let level = Level::generate(&mut rng, tuning.target_progress);
            let mut player = Player::new(Vec2::ZERO, tuning.max_health);
            player.body.pos = Vec2::new(SIDE_START_X, GROUND_Y - player.body.half.y);
            player.on_ground = true;
            (player, level)
        } else {
            let pos = Vec2::new(VIEW_WIDTH / 2.0, VIEW_HEIGHT - CATCHER_PLAYER_OFFSET);
            (Player::new(pos, tuning.max_health), Level::empty())
        };

        Self {
            seed,
            variant,
            phase: GamePhase::Init,
            score: 0,
            progress: 0.0,
            items_collected: 0,
            time_ticks: 0,
            player,
            collectibles: Vec::new(),
            hazards: Vec::new(),
            projectiles: Vec::new(),
            level,
            rng,
            item_spawner: SpawnCadence::stopped(),
            hazard_spawner: None,
            item_index: 0,
            hazard_index: 0,
            handoff: Timer::idle(),
            halted: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// `Init -> Running`: arm spawners and publish the initial HUD state
    pub fn start(&mut self) {
        if self.phase != GamePhase::Init {
            log::debug!("start() ignored in phase {:?}", self.phase);
            return;
        }
        self.phase = GamePhase::Running;
        self.item_spawner = SpawnCadence::new(self.tuning.item_spawn);
        self.hazard_spawner = self.tuning.hazard_spawn.map(SpawnCadence::new);
        log::info!(
            "Session started: variant={}, seed={}, target={}",
            self.variant.as_str(),
            self.seed,
            self.tuning.target_progress
        );
        self.emit_state();
        self.emit_progress();
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running && !self.halted
    }

    pub fn is_ended(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn progress_percent(&self) -> u32 {
        let pct = self.progress / self.tuning.max_distance * 100.0;
        pct.round().clamp(0.0, 100.0) as u32
    }

    pub fn summary(&self) -> EndSummary {
        EndSummary {
            score: self.score,
            items_collected: self.items_collected,
            progress_percent: self.progress_percent(),
        }
    }

    /// Set progress, clamped to `[0, target_progress]`. Returns true if it changed.
    pub fn set_progress(&mut self, value: f32) -> bool {
        let clamped = value.clamp(0.0, self.tuning.target_progress);
        if clamped == self.progress {
            return false;
        }
        self.progress = clamped;
        true
    }

    /// Pick up a collectible. Returns the score gained, or `None` if the
    /// session isn't running or the item is gone / already collected.
    pub fn collect(&mut self, id: u32) -> Option<u32> {
        if !self.is_running() {
            return None;
        }
        let index = self.collectibles.iter().position(|c| c.id == id)?;
        let def = self.collectibles[index].collect()?;
        self.collectibles.remove(index);

        self.score += def.score;
        self.items_collected += 1;
        self.set_progress(self.progress + def.progress);
        log::debug!("Collected {} (+{}), score={}", def.key, def.score, self.score);

        self.events.push(GameEvent::Collected {
            id,
            key: def.key,
            score: def.score,
        });
        self.emit_state();
        self.emit_progress();
        Some(def.score)
    }

    /// Resolve the player touching a hazard
    pub fn hazard_contact(&mut self, id: u32) -> ContactOutcome {
        if !self.is_running() {
            return ContactOutcome::Ignored;
        }
        let Some(index) = self
            .hazards
            .iter()
            .position(|h| h.id == id && h.is_alive())
        else {
            return ContactOutcome::Ignored;
        };

        if self.tuning.stomp
            && classify_contact(
                &self.player.body,
                &self.hazards[index].body,
                self.tuning.stomp_tolerance,
            ) == Contact::Stomp
        {
            if self.hazards[index].kill() {
                let hazard = self.hazards.remove(index);
                self.player.body.vel.y = -self.tuning.stomp_bounce;
                self.award_kill(hazard.id, hazard.def.bonus, KillSource::Stomp);
            }
            return ContactOutcome::Stomped;
        }

        if self.player.is_invincible() {
            return match self.tuning.invincible_contact {
                InvincibleContact::Absorb => {
                    self.hazards[index].kill();
                    self.hazards.remove(index);
                    ContactOutcome::Absorbed
                }
                InvincibleContact::PassThrough => ContactOutcome::Ignored,
            };
        }

        let penalty = self.hazards[index].def.progress;
        if !self.damage_player(id, penalty) {
            return ContactOutcome::Ignored;
        }
        if self.tuning.consume_hazard_on_hit {
            self.hazards[index].kill();
            self.hazards.remove(index);
        }
        ContactOutcome::Damaged
    }

    /// Resolve a projectile reaching a hazard. Returns true if the hazard died.
    pub fn projectile_hit(&mut self, projectile_id: u32, hazard_id: u32) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(projectile) = self
            .projectiles
            .iter_mut()
            .find(|p| p.id == projectile_id && p.active)
        else {
            return false;
        };
        let Some(index) = self
            .hazards
            .iter()
            .position(|h| h.id == hazard_id && h.is_alive())
        else {
            return false;
        };
        projectile.active = false;

        if self.player.is_invincible() && !self.tuning.projectile_kills_while_invincible {
            return false;
        }
        if !self.hazards[index].take_damage() {
            return false;
        }
        let hazard = self.hazards.remove(index);
        self.award_kill(hazard.id, hazard.def.bonus, KillSource::Projectile);
        true
    }

    /// One point of damage plus a progress penalty (<= 0)
    fn damage_player(&mut self, hazard_id: u32, penalty: f32) -> bool {
        let window = ms_to_ticks(self.tuning.invincibility_ms);
        if !self.player.take_damage(window) {
            return false;
        }
        self.set_progress(self.progress + penalty);
        log::debug!(
            "Player hit by hazard {}: health={}, progress={}",
            hazard_id,
            self.player.health,
            self.progress
        );
        self.events.push(GameEvent::PlayerHit {
            hazard_id,
            health: self.player.health,
        });
        self.emit_state();
        self.emit_progress();
        true
    }

    fn award_kill(&mut self, id: u32, bonus: u32, source: KillSource) {
        self.score += bonus;
        self.events.push(GameEvent::HazardKilled { id, bonus, source });
        self.emit_state();
    }

    /// Player has left the playable area (fell off the world)
    pub fn player_out_of_bounds(&self) -> bool {
        self.player.body.top() > VIEW_HEIGHT + OFFSCREEN_MARGIN
    }

    /// Poll the win/lose conditions. Win takes precedence within a tick.
    pub fn check_outcome(&mut self) -> Option<Outcome> {
        if !self.is_running() {
            return None;
        }
        if self.progress >= self.tuning.target_progress {
            self.finish(Outcome::Won, None);
            Some(Outcome::Won)
        } else if self.player.health == 0 {
            self.finish(Outcome::Lost, Some(LossCause::Health));
            Some(Outcome::Lost)
        } else if self.player_out_of_bounds() {
            self.finish(Outcome::Lost, Some(LossCause::OutOfBounds));
            Some(Outcome::Lost)
        } else {
            None
        }
    }

    /// The single terminal transition. Returns false if already ended.
    pub fn finish(&mut self, outcome: Outcome, cause: Option<LossCause>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = match outcome {
            Outcome::Won => GamePhase::Won,
            Outcome::Lost => GamePhase::Lost,
        };
        self.freeze();
        self.handoff = Timer::once(ms_to_ticks(self.tuning.end_delay_ms));
        log::info!(
            "Session ended: {:?} ({:?}) score={} items={} progress={}%",
            outcome,
            cause,
            self.score,
            self.items_collected,
            self.progress_percent()
        );
        self.events.push(GameEvent::Ended { outcome, cause });
        true
    }

    /// Stop spawners, cancel player timers and zero every velocity
    fn freeze(&mut self) {
        self.item_spawner.stop();
        if let Some(spawner) = self.hazard_spawner.as_mut() {
            spawner.stop();
        }
        self.player.cancel_timers();
        self.player.body.vel = Vec2::ZERO;
        let bodies = self
            .collectibles
            .iter_mut()
            .map(|c| &mut c.body)
            .chain(self.hazards.iter_mut().map(|h| &mut h.body))
            .chain(self.projectiles.iter_mut().map(|p| &mut p.body));
        for body in bodies {
            body.vel = Vec2::ZERO;
        }
    }

    /// Count down the end delay. Emits the hand-off exactly once.
    pub fn advance_handoff(&mut self) -> Option<EndSummary> {
        if self.halted || !self.handoff.advance() {
            return None;
        }
        let outcome = match self.phase {
            GamePhase::Won => Outcome::Won,
            GamePhase::Lost => Outcome::Lost,
            _ => return None,
        };
        let summary = self.summary();
        self.events.push(GameEvent::Handoff { outcome, summary });
        Some(summary)
    }

    /// Tear down: cancel every pending timer so nothing fires afterwards
    pub fn shutdown(&mut self) {
        if self.halted {
            return;
        }
        self.halted = true;
        self.item_spawner.stop();
        if let Some(spawner) = self.hazard_spawner.as_mut() {
            spawner.stop();
        }
        self.handoff.cancel();
        self.player.cancel_timers();
        log::info!("Session shut down in phase {:?}", self.phase);
    }

    pub(crate) fn spawn_collectible(&mut self, def: &'static CollectibleDef, body: Body) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(Collectible::new(id, def, body));
        id
    }

    pub(crate) fn spawn_hazard(&mut self, hazard: impl FnOnce(u32) -> Hazard) -> u32 {
        let id = self.next_entity_id();
        self.hazards.push(hazard(id));
        id
    }

    pub(crate) fn spawn_projectile(&mut self, body: Body) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            body,
            active: true,
        });
        id
    }

    pub(crate) fn emit_state(&mut self) {
        self.events.push(GameEvent::StateChanged {
            score: self.score,
            health: self.player.health,
            max_health: self.player.max_health,
            items_collected: self.items_collected,
        });
    }

    pub(crate) fn emit_progress(&mut self) {
        self.events.push(GameEvent::ProgressChanged {
            progress: self.progress,
            max_distance: self.tuning.max_distance,
        });
    }
}
