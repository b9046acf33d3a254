//! HUD mirror
//!
//! A passive copy of what the player sees: rebuilt from session events only,
//! never read from the session directly. The HUD also owns the on-screen
//! touch buttons, which the shell polls when building each tick's input.

use crate::sim::GameEvent;

/// Progress bar width (px)
pub const PROGRESS_BAR_WIDTH: f32 = 196.0;
/// Year shown at 0% progress
pub const START_YEAR: u32 = 2026;
/// Year shown at 100% progress
pub const END_YEAR: u32 = 2030;

const PIP_FULL: char = '♥';
const PIP_EMPTY: char = '♡';

/// Held state of the on-screen buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchControls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
}

impl TouchControls {
    /// Lift every finger (tab hidden, scene change)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn any_pressed(&self) -> bool {
        self.left || self.right || self.jump || self.shoot
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub health: u8,
    pub max_health: u8,
    pub items_collected: u32,
    pub progress: f32,
    pub max_distance: f32,
    pub touch: TouchControls,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror one session notification. Returns true if anything displayed changed.
    pub fn apply(&mut self, event: &GameEvent) -> bool {
        match *event {
            GameEvent::StateChanged {
                score,
                health,
                max_health,
                items_collected,
            } => {
                let changed = (self.score, self.health, self.max_health, self.items_collected)
                    != (score, health, max_health, items_collected);
                self.score = score;
                self.health = health;
                self.max_health = max_health;
                self.items_collected = items_collected;
                changed
            }
            GameEvent::ProgressChanged {
                progress,
                max_distance,
            } => {
                let changed = self.progress != progress || self.max_distance != max_distance;
                self.progress = progress;
                self.max_distance = max_distance;
                changed
            }
            _ => false,
        }
    }

    /// Progress as a fraction of the bar, in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        if self.max_distance <= 0.0 {
            return 0.0;
        }
        (self.progress / self.max_distance).clamp(0.0, 1.0)
    }

    pub fn bar_fill_width(&self) -> f32 {
        PROGRESS_BAR_WIDTH * self.fraction()
    }

    /// Linear from `START_YEAR` to `END_YEAR`, floored
    pub fn year(&self) -> u32 {
        let span = (END_YEAR - START_YEAR) as f32;
        (START_YEAR as f32 + self.fraction() * span).floor() as u32
    }

    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).floor() as u32
    }

    /// e.g. `"50% → 2028"`
    pub fn progress_label(&self) -> String {
        format!("{}% → {}", self.percent(), self.year())
    }

    /// One entry per point of max health, filled for what's left
    pub fn health_pips(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.max_health).map(|i| i < self.health)
    }

    pub fn health_text(&self) -> String {
        self.health_pips()
            .map(|full| if full { PIP_FULL } else { PIP_EMPTY })
            .collect()
    }
}
