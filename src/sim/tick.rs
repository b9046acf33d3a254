//! Fixed timestep simulation tick
//!
//! One call advances the session by one frame, always in the same order:
//! timers, movement, spawns, contact resolution, culling, win/lose check.

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use super::catalog::cyclic;
use super::entity::{Float, HAZARD_SIZE, Hazard, ITEM_SIZE, PROJECTILE_SIZE};
use super::level::{GROUND_Y, SIDE_START_X};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::hud::TouchControls;
use crate::ms_to_ticks;
use crate::tuning::Variant;

/// Catcher: items enter just above the top edge
const ITEM_SPAWN_Y: f32 = -30.0;
const ITEM_SPAWN_X_MIN: f32 = 50.0;
const ITEM_SPAWN_X_MAX: f32 = 490.0;
/// Side variants: player's horizontal offset from the camera's left edge
const CAMERA_LEAD: f32 = VIEW_WIDTH * 0.3;
/// Side variants: new entities appear this far past the right edge
const SPAWN_AHEAD: f32 = 40.0;
/// Side variants: entities this far behind the camera are removed
const CULL_BEHIND: f32 = 80.0;
/// Contaminants float around this height
const HAZARD_BASE_Y: f32 = GROUND_Y - 70.0;
/// Bullet muzzle offset from the player centre
const MUZZLE_OFFSET: f32 = 20.0;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Horizontal intent: -1, 0 or 1. Left wins when both are held.
    pub fn direction(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }

    /// Merge touch controls. A missing touch HUD reads as nothing pressed.
    pub fn with_touch(mut self, touch: Option<&TouchControls>) -> Self {
        if let Some(touch) = touch {
            self.left |= touch.left;
            self.right |= touch.right;
            self.jump |= touch.jump;
            self.shoot |= touch.shoot;
        }
        self
    }
}

/// Left edge of the viewport in world space
pub fn camera_x(state: &GameState) -> f32 {
    if state.variant.is_side_scroller() {
        state.player.body.pos.x - CAMERA_LEAD
    } else {
        0.0
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_halted() {
        return;
    }
    match state.phase {
        GamePhase::Init => return,
        GamePhase::Won | GamePhase::Lost => {
            // Frozen: only the hand-off countdown runs
            state.advance_handoff();
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    state.player.advance_timers();

    match state.variant {
        Variant::Catcher => move_catcher(state, &input, dt),
        Variant::Platformer | Variant::Runner => move_side(state, &input, dt),
    }

    spawn_due(state);
    resolve_contacts(state);
    cull(state);
    state.check_outcome();
}

fn move_catcher(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    player.steer(input.direction(), state.tuning.player_speed);
    player.body.integrate(0.0, dt);
    let half = player.body.half.x;
    player.body.pos.x = player.body.pos.x.clamp(half, VIEW_WIDTH - half);

    let gravity = state.tuning.item_gravity;
    for item in &mut state.collectibles {
        item.body.integrate(gravity, dt);
    }
    for hazard in &mut state.hazards {
        hazard.body.integrate(gravity, dt);
    }
}

fn move_side(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    if state.variant == Variant::Runner {
        player.steer(1.0, tuning.scroll_speed);
    } else {
        player.steer(input.direction(), tuning.player_speed);
    }
    if input.jump {
        player.try_jump(tuning.jump_velocity);
    }

    let prev_bottom = player.body.bottom();
    player.body.integrate(tuning.gravity, dt);
    player.body.vel.y = player.body.vel.y.min(tuning.max_fall_speed);
    player.body.pos.x = player.body.pos.x.max(player.body.half.x);
    player.on_ground = state.level.land(&mut player.body, prev_bottom);

    if tuning.shooting && input.shoot && player.try_shoot(ms_to_ticks(tuning.shoot_cooldown_ms)) {
        let dir = player.facing.sign();
        let pos = player.body.pos + Vec2::new(dir * MUZZLE_OFFSET, 0.0);
        let vel = Vec2::new(dir * tuning.bullet_speed, 0.0);
        state.spawn_projectile(Body::new(pos, PROJECTILE_SIZE).with_vel(vel));
    }

    let time_secs = state.time_ticks as f32 * SIM_DT;
    for hazard in &mut state.hazards {
        hazard.body.pos.x += hazard.body.vel.x * dt;
        hazard.apply_float(time_secs);
    }
    for projectile in &mut state.projectiles {
        projectile.body.pos += projectile.body.vel * dt;
    }

    // Progress is the farthest distance reached
    let travelled = state.player.body.pos.x - SIDE_START_X;
    if travelled > state.progress && state.set_progress(travelled) {
        state.emit_progress();
    }
}

fn spawn_due(state: &mut GameState) {
    let progress = state.progress;
    let item_due = state.item_spawner.poll(progress, &mut state.rng);
    let hazard_due = match state.hazard_spawner.as_mut() {
        Some(spawner) => spawner.poll(progress, &mut state.rng),
        None => false,
    };

    match state.variant {
        Variant::Catcher => {
            if item_due {
                spawn_falling(state);
            }
        }
        Variant::Platformer | Variant::Runner => {
            if item_due {
                spawn_level_item(state);
            }
            if hazard_due {
                spawn_contaminant(state);
            }
        }
    }
}

/// Catcher: one falling item, good or bad by weighted coin
fn spawn_falling(state: &mut GameState) {
    let x = state.rng.random_range(ITEM_SPAWN_X_MIN..=ITEM_SPAWN_X_MAX);
    let fall = state
        .rng
        .random_range(state.tuning.fall_speed_min..=state.tuning.fall_speed_max);
    let pos = Vec2::new(x, ITEM_SPAWN_Y);
    let vel = Vec2::new(0.0, fall);

    let good = state.rng.random_bool(state.tuning.good_chance as f64);
    if good {
        let table = state.variant.collectibles();
        let def = &table[state.rng.random_range(0..table.len())];
        let id = state.spawn_collectible(def, Body::new(pos, ITEM_SIZE).with_vel(vel));
        log::debug!("Spawned item {} ({}) at x={:.0}", id, def.key, x);
    } else {
        let table = state.variant.hazards();
        let def = &table[state.rng.random_range(0..table.len())];
        let body = Body::new(pos, HAZARD_SIZE).with_vel(vel);
        let id = state.spawn_hazard(|id| Hazard::new(id, def, body));
        log::debug!("Spawned hazard {} ({}) at x={:.0}", id, def.key, x);
    }
}

/// Side variants: next collectible in cyclic order, just off the right edge
fn spawn_level_item(state: &mut GameState) {
    let x = camera_x(state) + VIEW_WIDTH + SPAWN_AHEAD;
    let lift = state.rng.random_range(60.0..=180.0);
    let def = cyclic(state.variant.collectibles(), state.item_index);
    state.item_index += 1;
    let id = state.spawn_collectible(def, Body::new(Vec2::new(x, GROUND_Y - lift), ITEM_SIZE));
    log::debug!("Spawned item {} ({}) at x={:.0}", id, def.key, x);
}

/// Side variants: next contaminant in cyclic order, drifting toward the player
fn spawn_contaminant(state: &mut GameState) {
    let x = camera_x(state) + VIEW_WIDTH + SPAWN_AHEAD;
    let def = cyclic(state.variant.hazards(), state.hazard_index);
    state.hazard_index += 1;
    let float = Float {
        base_y: HAZARD_BASE_Y,
        amplitude: state.rng.random_range(20.0..=50.0),
        period: state.rng.random_range(1.5..=3.0),
    };
    let body = Body::new(Vec2::new(x, HAZARD_BASE_Y), HAZARD_SIZE)
        .with_vel(Vec2::new(-def.speed, 0.0));
    let id = state.spawn_hazard(|id| Hazard::new(id, def, body).with_float(float));
    log::debug!("Spawned hazard {} ({}) at x={:.0}", id, def.key, x);
}

/// Overlap tests in stable (spawn) order, then one-shot resolution per pair
fn resolve_contacts(state: &mut GameState) {
    let player = state.player.body;

    let touched: Vec<u32> = state
        .collectibles
        .iter()
        .filter(|c| !c.is_collected() && c.body.overlaps(&player))
        .map(|c| c.id)
        .collect();
    for id in touched {
        state.collect(id);
    }

    let touching: Vec<u32> = state
        .hazards
        .iter()
        .filter(|h| h.is_alive() && h.body.overlaps(&player))
        .map(|h| h.id)
        .collect();
    for id in touching {
        state.hazard_contact(id);
    }

    let hits: Vec<(u32, u32)> = state
        .projectiles
        .iter()
        .filter(|p| p.active)
        .filter_map(|p| {
            state
                .hazards
                .iter()
                .find(|h| h.is_alive() && h.body.overlaps(&p.body))
                .map(|h| (p.id, h.id))
        })
        .collect();
    for (projectile, hazard) in hits {
        state.projectile_hit(projectile, hazard);
    }
}

/// Drop spent projectiles and anything that left the screen
fn cull(state: &mut GameState) {
    state.projectiles.retain(|p| p.active);

    if state.variant.is_side_scroller() {
        let left = camera_x(state) - CULL_BEHIND;
        let right = camera_x(state) + VIEW_WIDTH + CULL_BEHIND;
        state.collectibles.retain(|c| c.body.right() > left);
        state.hazards.retain(|h| h.is_alive() && h.body.right() > left);
        state
            .projectiles
            .retain(|p| p.body.right() > left && p.body.left() < right);
    } else {
        let floor = VIEW_HEIGHT + OFFSCREEN_MARGIN;
        state.collectibles.retain(|c| c.body.pos.y <= floor);
        state.hazards.retain(|h| h.is_alive() && h.body.pos.y <= floor);
    }
}

/// Demo player used in idle mode and by the headless binary.
///
/// Catcher: dodge the nearest hazard falling overhead, otherwise chase the
/// lowest good item. Side variants: run right, hop gaps and contaminants,
/// and shoot anything level with the player.
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player.body;

    match state.variant {
        Variant::Catcher => {
            let threat = state
                .hazards
                .iter()
                .filter(|h| {
                    let above = player.pos.y - h.body.pos.y;
                    above > 0.0 && above < 260.0 && (h.body.pos.x - player.pos.x).abs() < 60.0
                })
                .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y));

            let target_x = if let Some(hazard) = threat {
                let away = if hazard.body.pos.x > player.pos.x { -1.0 } else { 1.0 };
                let target = player.pos.x + away * 100.0;
                if (30.0..=VIEW_WIDTH - 30.0).contains(&target) {
                    target
                } else {
                    player.pos.x - away * 100.0
                }
            } else {
                state
                    .collectibles
                    .iter()
                    .filter(|c| c.body.pos.y < player.pos.y)
                    .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
                    .map(|c| c.body.pos.x)
                    .unwrap_or(VIEW_WIDTH / 2.0)
            };

            let dx = target_x - player.pos.x;
            if dx < -8.0 {
                input.left = true;
            } else if dx > 8.0 {
                input.right = true;
            }
        }
        Variant::Platformer | Variant::Runner => {
            input.right = true;

            let gap_ahead = state
                .level
                .ground_under(player.right() + 20.0, player.right() + 40.0)
                .is_none();
            let hazard_close = state.hazards.iter().any(|h| {
                let dx = h.body.pos.x - player.pos.x;
                h.is_alive() && dx > 0.0 && dx < 110.0
            });
            input.jump = gap_ahead || hazard_close;

            input.shoot = state.hazards.iter().any(|h| {
                let dx = h.body.pos.x - player.pos.x;
                h.is_alive() && dx > 0.0 && dx < 350.0 && (h.body.pos.y - player.pos.y).abs() < 40.0
            });
        }
    }

    input
}
