//! Tick-based scheduling
//!
//! Delayed and repeating callbacks are modelled as timers owned by the
//! session and advanced once per tick. Cancelling a timer guarantees it never
//! fires again, so a torn-down session can't be mutated by a stale schedule.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TimerMode {
    Once,
    Repeat,
}

/// A cancellable one-shot or repeating countdown measured in ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    period: u32,
    remaining: u32,
    mode: TimerMode,
    active: bool,
}

impl Timer {
    /// Fires once, `ticks` advances from now
    pub fn once(ticks: u32) -> Self {
        Self {
            period: ticks.max(1),
            remaining: ticks.max(1),
            mode: TimerMode::Once,
            active: true,
        }
    }

    /// Fires every `ticks` advances until cancelled
    pub fn repeating(ticks: u32) -> Self {
        Self {
            mode: TimerMode::Repeat,
            ..Self::once(ticks)
        }
    }

    /// A timer that never fires
    pub fn idle() -> Self {
        Self {
            period: 1,
            remaining: 0,
            mode: TimerMode::Once,
            active: false,
        }
    }

    /// Advance by one tick. Returns true if the timer fired on this tick.
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return false;
        }
        match self.mode {
            TimerMode::Once => self.active = false,
            TimerMode::Repeat => self.remaining = self.period,
        }
        true
    }

    /// Re-arm a one-shot timer for `ticks` from now
    pub fn restart(&mut self, ticks: u32) {
        self.period = ticks.max(1);
        self.remaining = self.period;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.remaining = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ticks left before the next fire (0 when inactive)
    pub fn remaining(&self) -> u32 {
        if self.active { self.remaining } else { 0 }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_fires_exactly_once() {
        let mut timer = Timer::once(3);
        assert!(!timer.advance());
        assert!(!timer.advance());
        assert!(timer.advance());
        assert!(!timer.is_active());
        for _ in 0..10 {
            assert!(!timer.advance());
        }
    }

    #[test]
    fn test_repeating_fires_every_period() {
        let mut timer = Timer::repeating(4);
        let fires: Vec<u32> = (1..=12).filter(|_| timer.advance()).collect();
        assert_eq!(fires.len(), 3);
        assert!(timer.is_active());
    }

    #[test]
    fn test_cancel_stops_pending_fire() {
        let mut timer = Timer::repeating(2);
        assert!(!timer.advance());
        timer.cancel();
        for _ in 0..5 {
            assert!(!timer.advance());
        }
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_restart_rearms() {
        let mut timer = Timer::once(1);
        assert!(timer.advance());
        timer.restart(2);
        assert!(timer.is_active());
        assert!(!timer.advance());
        assert!(timer.advance());
    }

    #[test]
    fn test_idle_never_fires() {
        let mut timer = Timer::default();
        assert!(!timer.is_active());
        assert!(!timer.advance());
    }
}
