//! Virtual time for the discrete-event engine
//!
//! Time is measured in minutes since the start of a run. The clock only moves forward
//! and stops at the run horizon.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// A point in virtual time, in minutes since the start of the run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime(f64);

impl SimTime {
    /// Start of every run
    pub const ZERO: SimTime = SimTime(0.0);

    /// Create a time point from minutes
    pub fn from_minutes(minutes: f64) -> Self {
        debug_assert!(minutes.is_finite(), "virtual time must be finite, got {}", minutes);
        SimTime(minutes)
    }

    /// Raw minutes since the start of the run
    pub fn as_minutes(self) -> f64 {
        self.0
    }

    /// Time point `delay_min` minutes later
    pub fn after(self, delay_min: f64) -> Self {
        SimTime::from_minutes(self.0 + delay_min)
    }

    /// Minutes elapsed since `earlier` (0 if `earlier` is in the future)
    pub fn minutes_since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.2}min", self.0)
    }
}

/// Monotonic virtual clock bounded by the run horizon
#[derive(Debug, Clone)]
pub struct SimulationClock {
    now: SimTime,
    horizon: SimTime,
}

impl SimulationClock {
    /// Create a clock at t=0 that stops at `horizon_min`
    pub fn new(horizon_min: f64) -> Self {
        Self { now: SimTime::ZERO, horizon: SimTime::from_minutes(horizon_min) }
    }

    /// Current virtual time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Time at which the run is cut off
    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Whether `time` falls at or beyond the cutoff
    pub fn is_beyond_horizon(&self, time: SimTime) -> bool {
        time >= self.horizon
    }

    /// Move the clock to `time`; earlier times are ignored
    pub fn advance_to(&mut self, time: SimTime) {
        if time < self.now {
            debug!("Ignoring backwards clock move from {} to {}", self.now, time);
            return;
        }
        self.now = time.min(self.horizon);
    }

    /// Jump to the horizon once no more events can fire
    pub fn finish(&mut self) {
        self.now = self.horizon;
    }

    /// Fraction of the horizon already simulated (0.0-1.0)
    pub fn progress(&self) -> f64 {
        if self.horizon.as_minutes() <= 0.0 {
            1.0
        } else {
            self.now.as_minutes() / self.horizon.as_minutes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_ordering_and_arithmetic() {
        let a = SimTime::from_minutes(1.5);
        let b = a.after(2.0);

        assert!(a < b);
        assert_eq!(b.as_minutes(), 3.5);
        assert_eq!(b.minutes_since(a), 2.0);
        assert_eq!(a.minutes_since(b), 0.0);
        assert_eq!(SimTime::ZERO.max(a), a);
    }

    #[test]
    fn test_clock_moves_forward_only() {
        let mut clock = SimulationClock::new(100.0);
        clock.advance_to(SimTime::from_minutes(40.0));
        assert_eq!(clock.now().as_minutes(), 40.0);

        clock.advance_to(SimTime::from_minutes(10.0));
        assert_eq!(clock.now().as_minutes(), 40.0);
        assert!((clock.progress() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_clock_is_bounded_by_horizon() {
        let mut clock = SimulationClock::new(100.0);
        assert!(!clock.is_beyond_horizon(SimTime::from_minutes(99.99)));
        assert!(clock.is_beyond_horizon(SimTime::from_minutes(100.0)));

        clock.advance_to(SimTime::from_minutes(250.0));
        assert_eq!(clock.now(), clock.horizon());

        let mut other = SimulationClock::new(10.0);
        other.finish();
        assert_eq!(other.progress(), 1.0);
    }
}
