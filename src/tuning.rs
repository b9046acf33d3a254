//! Data-driven game balance
//!
//! Every variant starts from built-in defaults; a JSON object can override any
//! subset of fields. Out-of-range values are clamped silently (with a warning
//! in the log) rather than rejected.

use serde::{Deserialize, Serialize};

use crate::consts::VIEW_WIDTH;
use crate::sim::MAX_LENGTH;
use crate::sim::catalog::{
    CATCHER_BAD, CATCHER_GOOD, CONTAMINANTS, CollectibleDef, HazardDef, LEVEL_COLLECTIBLES,
};
use crate::sim::spawn::SpawnPolicy;

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Top-down: catch falling clean-water items, dodge contaminants
    #[default]
    Catcher,
    /// Side-scrolling platformer with jumping, stomping and shooting
    Platformer,
    /// Auto-scrolling runner
    Runner,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Catcher, Variant::Platformer, Variant::Runner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Catcher => "Catcher",
            Variant::Platformer => "Platformer",
            Variant::Runner => "Runner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "catcher" | "catch" => Some(Variant::Catcher),
            "platformer" | "platform" => Some(Variant::Platformer),
            "runner" | "run" => Some(Variant::Runner),
            _ => None,
        }
    }

    /// Horizontal world with ground, gravity and a camera following the player
    pub fn is_side_scroller(&self) -> bool {
        !matches!(self, Variant::Catcher)
    }

    pub fn collectibles(&self) -> &'static [CollectibleDef] {
        match self {
            Variant::Catcher => &CATCHER_GOOD,
            Variant::Platformer | Variant::Runner => &LEVEL_COLLECTIBLES,
        }
    }

    pub fn hazards(&self) -> &'static [HazardDef] {
        match self {
            Variant::Catcher => &CATCHER_BAD,
            Variant::Platformer | Variant::Runner => &CONTAMINANTS,
        }
    }
}

/// What a hazard does when it touches an invincible player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvincibleContact {
    /// The hazard is removed without effect
    Absorb,
    /// The hazard passes through untouched
    PassThrough,
}

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Player ===
    pub max_health: u8,
    /// Horizontal speed (px/s)
    pub player_speed: f32,
    /// Player gravity in side-scrolling variants (px/s²)
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Jump impulse (negative = up)
    pub jump_velocity: f32,
    pub invincibility_ms: u32,
    pub shooting: bool,
    pub shoot_cooldown_ms: u32,
    pub bullet_speed: f32,

    // === Goal ===
    /// Progress scale for the HUD bar and end-of-run percentage
    pub max_distance: f32,
    /// Win threshold; progress is clamped to `[0, target_progress]`
    pub target_progress: f32,
    /// Delay between the win/lose transition and the hand-off (ms)
    pub end_delay_ms: u32,

    // === World ===
    /// Auto-scroll speed (runner only, px/s)
    pub scroll_speed: f32,
    /// Gravity applied to falling items (catcher, px/s²)
    pub item_gravity: f32,
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,

    // === Spawning ===
    pub item_spawn: SpawnPolicy,
    /// Separate hazard cadence; `None` means hazards share `item_spawn`
    /// and are picked with probability `1 - good_chance`
    pub hazard_spawn: Option<SpawnPolicy>,
    pub good_chance: f32,

    // === Contact rules ===
    pub stomp: bool,
    /// Max vertical overlap (px) still counted as landing on top
    pub stomp_tolerance: f32,
    pub stomp_bounce: f32,
    /// Hazards that hurt the player are removed
    pub consume_hazard_on_hit: bool,
    pub invincible_contact: InvincibleContact,
    /// Projectile kills still count while the player is invincible
    pub projectile_kills_while_invincible: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_variant(Variant::Catcher)
    }
}

impl Tuning {
    /// Built-in balance for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Catcher => Self {
                max_health: 3,
                player_speed: 300.0,
                gravity: 0.0,
                max_fall_speed: 600.0,
                jump_velocity: 0.0,
                // 10 flashes of 150 ms each way
                invincibility_ms: 3000,
                shooting: false,
                shoot_cooldown_ms: 300,
                bullet_speed: 400.0,
                max_distance: 100.0,
                target_progress: 80.0,
                end_delay_ms: 600,
                scroll_speed: 0.0,
                item_gravity: 300.0,
                fall_speed_min: 220.0,
                fall_speed_max: 320.0,
                item_spawn: SpawnPolicy::Timer { interval_ms: 700 },
                hazard_spawn: None,
                good_chance: 0.7,
                stomp: false,
                stomp_tolerance: 0.0,
                stomp_bounce: 0.0,
                consume_hazard_on_hit: true,
                invincible_contact: InvincibleContact::Absorb,
                projectile_kills_while_invincible: true,
            },
            Variant::Platformer => Self {
                max_health: 3,
                player_speed: 220.0,
                gravity: 800.0,
                max_fall_speed: 600.0,
                jump_velocity: -420.0,
                // 6 flashes of 100 ms each way
                invincibility_ms: 1200,
                shooting: true,
                shoot_cooldown_ms: 300,
                bullet_speed: 400.0,
                max_distance: 6000.0,
                target_progress: 6000.0,
                end_delay_ms: 600,
                scroll_speed: 0.0,
                item_gravity: 0.0,
                fall_speed_min: 0.0,
                fall_speed_max: 0.0,
                item_spawn: SpawnPolicy::Timer { interval_ms: 1800 },
                hazard_spawn: Some(SpawnPolicy::Timer { interval_ms: 2500 }),
                good_chance: 1.0,
                stomp: true,
                stomp_tolerance: 12.0,
                stomp_bounce: 300.0,
                consume_hazard_on_hit: false,
                invincible_contact: InvincibleContact::PassThrough,
                projectile_kills_while_invincible: true,
            },
            Variant::Runner => Self {
                scroll_speed: 240.0,
                max_distance: 12000.0,
                target_progress: 12000.0,
                item_spawn: SpawnPolicy::Distance {
                    first: 400.0,
                    min_step: 250.0,
                    max_step: 450.0,
                },
                hazard_spawn: Some(SpawnPolicy::Distance {
                    first: 700.0,
                    min_step: 350.0,
                    max_step: 700.0,
                }),
                ..Self::for_variant(Variant::Platformer)
            },
        }
    }

    /// Parse a full tuning object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Apply a partial JSON object on top of these values.
    ///
    /// Only top-level keys present in `overrides` replace existing values.
    pub fn with_overrides(self, overrides: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(&self)?;
        if let (Some(base), Some(patch)) = (base.as_object_mut(), overrides.as_object()) {
            for (key, value) in patch {
                if base.contains_key(key) {
                    base.insert(key.clone(), value.clone());
                } else {
                    log::warn!("Ignoring unknown tuning key '{}'", key);
                }
            }
        }
        serde_json::from_value::<Tuning>(base).map(Tuning::validated)
    }

    /// Clamp out-of-range values into a playable configuration
    pub fn validated(mut self) -> Self {
        fn clamp_warn(name: &str, value: &mut f32, lo: f32, hi: f32) {
            let clamped = if value.is_finite() { value.clamp(lo, hi) } else { lo };
            if clamped != *value {
                log::warn!("Tuning {} = {} out of range, using {}", name, value, clamped);
                *value = clamped;
            }
        }

        if self.max_health == 0 {
            log::warn!("Tuning max_health = 0 out of range, using 1");
            self.max_health = 1;
        }
        clamp_warn("player_speed", &mut self.player_speed, 0.0, 2000.0);
        clamp_warn("gravity", &mut self.gravity, 0.0, 5000.0);
        clamp_warn("max_fall_speed", &mut self.max_fall_speed, 1.0, 5000.0);
        clamp_warn("jump_velocity", &mut self.jump_velocity, -2000.0, 0.0);
        clamp_warn("bullet_speed", &mut self.bullet_speed, 0.0, 5000.0);
        clamp_warn("max_distance", &mut self.max_distance, 1.0, MAX_LENGTH);
        clamp_warn("target_progress", &mut self.target_progress, 1.0, self.max_distance);
        clamp_warn("scroll_speed", &mut self.scroll_speed, 0.0, 2000.0);
        clamp_warn("item_gravity", &mut self.item_gravity, 0.0, 5000.0);
        clamp_warn("fall_speed_min", &mut self.fall_speed_min, 0.0, 5000.0);
        clamp_warn("fall_speed_max", &mut self.fall_speed_max, self.fall_speed_min, 5000.0);
        clamp_warn("good_chance", &mut self.good_chance, 0.0, 1.0);
        clamp_warn("stomp_tolerance", &mut self.stomp_tolerance, 0.0, VIEW_WIDTH);
        clamp_warn("stomp_bounce", &mut self.stomp_bounce, 0.0, 2000.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn test_variant_names_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_str(variant.as_str()), Some(variant));
        }
        assert_eq!(Variant::from_str("RUN"), Some(Variant::Runner));
        assert_eq!(Variant::from_str("golf"), None);
    }

    #[test]
    fn test_runner_inherits_platformer_rules() {
        let runner = Tuning::for_variant(Variant::Runner);
        let platformer = Tuning::for_variant(Variant::Platformer);
        assert_eq!(runner.jump_velocity, platformer.jump_velocity);
        assert!(runner.stomp);
        assert!(matches!(runner.item_spawn, SpawnPolicy::Distance { .. }));
        assert_eq!(runner.target_progress, 12000.0);
    }

    #[test]
    fn test_partial_overrides() {
        let overrides = serde_json::json!({
            "target_progress": 50.0,
            "invincible_contact": "PassThrough",
            "not_a_field": 1
        });
        let tuning = Tuning::for_variant(Variant::Catcher)
            .with_overrides(&overrides)
            .unwrap();
        assert_eq!(tuning.target_progress, 50.0);
        assert_eq!(tuning.invincible_contact, InvincibleContact::PassThrough);
        // Untouched fields keep variant defaults
        assert_eq!(tuning.max_health, 3);
    }

    #[test]
    fn test_bad_override_type_is_an_error() {
        let overrides = serde_json::json!({ "max_health": "lots" });
        assert!(Tuning::default().with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut tuning = Tuning::default();
        tuning.max_health = 0;
        tuning.good_chance = 1.7;
        tuning.target_progress = 500.0;
        tuning.fall_speed_max = 10.0;
        let tuning = tuning.validated();
        assert_eq!(tuning.max_health, 1);
        assert_eq!(tuning.good_chance, 1.0);
        // Target can't exceed the progress scale
        assert_eq!(tuning.target_progress, tuning.max_distance);
        assert_eq!(tuning.fall_speed_max, tuning.fall_speed_min);
    }

    #[test]
    fn test_huge_distances_are_bounded() {
        let overrides = serde_json::json!({ "max_distance": 1e12, "target_progress": 1e12 });
        let tuning = Tuning::for_variant(Variant::Platformer)
            .with_overrides(&overrides)
            .unwrap();
        assert_eq!(tuning.max_distance, MAX_LENGTH);
        assert_eq!(tuning.target_progress, MAX_LENGTH);

        // Session creation generates the level and must come back
        let state = GameState::new(Variant::Platformer, tuning, 3);
        assert_eq!(state.level.length, MAX_LENGTH);
    }

    #[test]
    fn test_full_json_round_trip() {
        let json = serde_json::to_string(&Tuning::for_variant(Variant::Runner)).unwrap();
        let parsed = Tuning::from_json(&json).unwrap();
        assert_eq!(parsed, Tuning::for_variant(Variant::Runner));
    }
}
