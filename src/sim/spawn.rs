//! Spawn cadence
//!
//! Two policies decide when something new enters the world:
//! - `Timer`: a repeating wall-clock interval (catcher and platformer)
//! - `Distance`: absolute progress thresholds, so density follows traversal
//!   distance rather than frame rate (runner)

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timer::Timer;
use crate::ms_to_ticks;

/// Configured spawn policy (data-driven, see `Tuning`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// One spawn every `interval_ms`
    Timer { interval_ms: u32 },
    /// First spawn at `first`, then every `min_step..=max_step` of progress
    Distance { first: f32, min_step: f32, max_step: f32 },
}

/// Runtime spawn scheduler built from a `SpawnPolicy`
#[derive(Debug, Clone)]
pub enum SpawnCadence {
    Timer(Timer),
    Distance {
        next_threshold: f32,
        min_step: f32,
        max_step: f32,
        stopped: bool,
    },
}

impl SpawnCadence {
    pub fn new(policy: SpawnPolicy) -> Self {
        match policy {
            SpawnPolicy::Timer { interval_ms } => {
                SpawnCadence::Timer(Timer::repeating(ms_to_ticks(interval_ms)))
            }
            SpawnPolicy::Distance {
                first,
                min_step,
                max_step,
            } => SpawnCadence::Distance {
                next_threshold: first,
                min_step: min_step.max(f32::EPSILON),
                max_step: max_step.max(min_step).max(f32::EPSILON),
                stopped: false,
            },
        }
    }

    /// A cadence that never spawns
    pub fn stopped() -> Self {
        SpawnCadence::Timer(Timer::idle())
    }

    /// Advance one tick and report whether a spawn is due.
    ///
    /// `progress` is the cumulative world progress after this tick's movement.
    /// A distance threshold crossed in a single tick yields exactly one spawn,
    /// and the next threshold is placed strictly beyond `progress`.
    pub fn poll(&mut self, progress: f32, rng: &mut Pcg32) -> bool {
        match self {
            SpawnCadence::Timer(timer) => timer.advance(),
            SpawnCadence::Distance {
                next_threshold,
                min_step,
                max_step,
                stopped,
            } => {
                if *stopped || progress < *next_threshold {
                    return false;
                }
                let step = if *max_step > *min_step {
                    rng.random_range(*min_step..=*max_step)
                } else {
                    *min_step
                };
                *next_threshold = progress + step;
                true
            }
        }
    }

    /// Cancel all future spawns
    pub fn stop(&mut self) {
        match self {
            SpawnCadence::Timer(timer) => timer.cancel(),
            SpawnCadence::Distance { stopped, .. } => *stopped = true,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        match self {
            SpawnCadence::Timer(timer) => timer.is_active(),
            SpawnCadence::Distance { stopped, .. } => !stopped,
        }
    }

    /// Next distance threshold (distance policy only)
    pub fn next_threshold(&self) -> Option<f32> {
        match self {
            SpawnCadence::Distance { next_threshold, .. } => Some(*next_threshold),
            SpawnCadence::Timer(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_distance_crossing_spawns_once() {
        let mut rng = rng();
        let mut cadence = SpawnCadence::new(SpawnPolicy::Distance {
            first: 300.0,
            min_step: 200.0,
            max_step: 400.0,
        });

        assert!(!cadence.poll(295.0, &mut rng));
        // 295 -> 304 crosses the threshold in one tick
        assert!(cadence.poll(304.0, &mut rng));
        let next = cadence.next_threshold().unwrap();
        assert!(next > 304.0);
        assert!((504.0..=704.0).contains(&next));
        // Same tick position again: nothing more due
        assert!(!cadence.poll(304.0, &mut rng));
    }

    #[test]
    fn test_distance_large_jump_spawns_once() {
        let mut rng = rng();
        let mut cadence = SpawnCadence::new(SpawnPolicy::Distance {
            first: 100.0,
            min_step: 50.0,
            max_step: 50.0,
        });
        // Skipping past several would-be thresholds still yields one spawn
        assert!(cadence.poll(1000.0, &mut rng));
        assert_eq!(cadence.next_threshold(), Some(1050.0));
        assert!(!cadence.poll(1049.0, &mut rng));
    }

    #[test]
    fn test_timer_cadence_interval() {
        let mut rng = rng();
        // 700 ms at 60 Hz = 42 ticks
        let mut cadence = SpawnCadence::new(SpawnPolicy::Timer { interval_ms: 700 });
        let spawns = (0..42 * 3).filter(|_| cadence.poll(0.0, &mut rng)).count();
        assert_eq!(spawns, 3);
    }

    #[test]
    fn test_stop_halts_both_policies() {
        let mut rng = rng();
        let mut timer = SpawnCadence::new(SpawnPolicy::Timer { interval_ms: 100 });
        let mut distance = SpawnCadence::new(SpawnPolicy::Distance {
            first: 0.0,
            min_step: 10.0,
            max_step: 20.0,
        });
        timer.stop();
        distance.stop();
        assert!(!timer.is_running());
        assert!(!distance.is_running());
        for i in 0..100 {
            assert!(!timer.poll(i as f32 * 100.0, &mut rng));
            assert!(!distance.poll(i as f32 * 100.0, &mut rng));
        }
    }
}
