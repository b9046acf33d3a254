//! Agua 2030 - clean water and sanitation arcade game (SDG 6)
//!
//! Core modules:
//! - `sim`: Deterministic session simulation (entities, spawns, scoring, win/lose)
//! - `tuning`: Data-driven game balance per variant
//! - `hud`: HUD mirror of session state plus touch controls
//! - `flow`: Scene flow (menu, gameplay, win, game over)
//! - `settings`: Player preferences

pub mod flow;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use flow::{App, Scene, SceneTrigger, WinPage};
pub use hud::{Hud, TouchControls};
pub use settings::Settings;
pub use tuning::{Tuning, Variant};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one logical frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second at the fixed timestep
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions (portrait, px)
    pub const VIEW_WIDTH: f32 = 540.0;
    pub const VIEW_HEIGHT: f32 = 960.0;

    /// Anything this far below the viewport has left the playable area
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded up, min 1)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as u64 * consts::TICKS_PER_SECOND as u64).div_ceil(1000);
    ticks.max(1) as u32
}
