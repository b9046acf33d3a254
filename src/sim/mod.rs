//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod catalog;
pub mod entity;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use body::{Body, Contact, classify_contact};
pub use entity::{Collectible, Facing, Hazard, Player, Projectile};
pub use level::{Level, MAX_LENGTH, Platform, SIDE_START_X};
pub use spawn::{SpawnCadence, SpawnPolicy};
pub use state::{
    ContactOutcome, EndSummary, GameEvent, GamePhase, GameState, KillSource, LossCause, Outcome,
};
pub use tick::{TickInput, autopilot, camera_x, tick};
pub use timer::Timer;
