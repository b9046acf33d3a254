//! Ground layout for the side-scrolling variants
//!
//! A level is a row of solid ground segments separated by gaps. Falling
//! through a gap takes the player out of the playable area.

use rand::Rng;
use rand_pcg::Pcg32;

use super::body::Body;
use crate::consts::VIEW_WIDTH;

/// Top of the ground (px, screen space)
pub const GROUND_Y: f32 = 800.0;
/// Player start position along the level
pub const SIDE_START_X: f32 = 120.0;
/// Longest level that can be generated (px from the start)
pub const MAX_LENGTH: f32 = 100_000.0;
/// Flat run at the start of every level
pub const SAFE_START: f32 = 700.0;
/// Gap width range (px). Both variants clear the widest gap with a full jump.
pub const GAP_MIN: f32 = 60.0;
pub const GAP_MAX: f32 = 140.0;
/// Ground segment width range (px)
pub const SEGMENT_MIN: f32 = 300.0;
pub const SEGMENT_MAX: f32 = 800.0;

/// A solid ground segment spanning `[left, right]` with its surface at `top`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub left: f32,
    pub right: f32,
    pub top: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Level {
    pub platforms: Vec<Platform>,
    /// Distance from the player's start (`SIDE_START_X`) to the finish line
    pub length: f32,
}

impl Level {
    /// No ground at all (catcher)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Generate ground up to the finish line plus one screen of run-out.
    ///
    /// `length` is clamped to `[0, MAX_LENGTH]`.
    pub fn generate(rng: &mut Pcg32, length: f32) -> Self {
        let length = if length.is_finite() {
            length.clamp(0.0, MAX_LENGTH)
        } else {
            0.0
        };
        let finish = SIDE_START_X + length;
        let end = finish + VIEW_WIDTH;
        let mut platforms = vec![Platform {
            left: -VIEW_WIDTH,
            right: SAFE_START,
            top: GROUND_Y,
        }];

        let mut x = SAFE_START;
        while x < end {
            let gap = rng.random_range(GAP_MIN..=GAP_MAX);
            let width = rng.random_range(SEGMENT_MIN..=SEGMENT_MAX);
            let left = x + gap;
            // The finish line always sits on solid ground
            let right = if left + width >= finish - SEGMENT_MIN {
                end.max(left + width)
            } else {
                left + width
            };
            if right <= x {
                log::warn!("Level generation stalled at x={}, stopping", x);
                break;
            }
            platforms.push(Platform {
                left,
                right,
                top: GROUND_Y,
            });
            x = right;
        }

        log::debug!("Generated level: length={}, segments={}", length, platforms.len());
        Self { platforms, length }
    }

    /// World x of the finish line
    pub fn finish_x(&self) -> f32 {
        SIDE_START_X + self.length
    }

    /// Surface height under the horizontal span `[left, right]`, if any
    pub fn ground_under(&self, left: f32, right: f32) -> Option<f32> {
        self.platforms
            .iter()
            .filter(|p| right > p.left && left < p.right)
            .map(|p| p.top)
            .reduce(f32::min)
    }

    /// Resolve landing after an integration step.
    ///
    /// `prev_bottom` is the body's bottom edge before the step. Returns true if
    /// the body is standing on ground after resolution.
    pub fn land(&self, body: &mut Body, prev_bottom: f32) -> bool {
        if body.vel.y < 0.0 {
            return false;
        }
        let Some(top) = self.ground_under(body.left(), body.right()) else {
            return false;
        };
        if prev_bottom <= top + 0.5 && body.bottom() >= top {
            body.pos.y = top - body.half.y;
            body.vel.y = 0.0;
            return true;
        }
        false
    }
}
