//! Charging freshness tracking
//!
//! The dongle only reports charging state on plug/unplug transitions, so
//! the absence of a report says nothing about the current state. The last
//! observed event is kept with its arrival time and is shown only while it
//! is younger than a staleness threshold.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::protocol::ChargingEvent;

/// Default staleness threshold for charging events
pub const DEFAULT_STALE_THRESHOLD: Duration = Duration::from_millis(2500);

/// Last observed charging event
///
/// Value and timestamp are stored together, so either both are known or
/// neither is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChargingState {
    last: Option<(bool, Instant)>,
}

impl ChargingState {
    /// No event observed yet
    pub fn new() -> Self {
        Self::default()
    }

    /// State as if `is_charging` had been observed at `at`
    pub fn observed(is_charging: bool, at: Instant) -> Self {
        Self {
            last: Some((is_charging, at)),
        }
    }

    /// Record an event, replacing whatever was seen before
    pub fn update(&mut self, event: ChargingEvent, now: Instant) {
        self.last = Some((event.is_charging, now));
    }

    pub fn last_value(&self) -> Option<bool> {
        self.last.map(|(value, _)| value)
    }

    pub fn last_seen(&self) -> Option<Instant> {
        self.last.map(|(_, seen)| seen)
    }

    /// Display status at `now`
    ///
    /// An event exactly `stale_threshold` old is still fresh.
    pub fn display(&self, now: Instant, stale_threshold: Duration) -> ChargingStatus {
        match self.last {
            None => ChargingStatus::Unknown,
            Some((value, seen)) => {
                if now.saturating_duration_since(seen) > stale_threshold {
                    ChargingStatus::Unknown
                } else if value {
                    ChargingStatus::Yes
                } else {
                    ChargingStatus::No
                }
            }
        }
    }
}

/// Display-facing charging status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargingStatus {
    Yes,
    No,
    Unknown,
}

impl fmt::Display for ChargingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChargingStatus::Yes => "yes",
            ChargingStatus::No => "no",
            ChargingStatus::Unknown => "unknown",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHARGING: ChargingEvent = ChargingEvent { is_charging: true };
    const NOT_CHARGING: ChargingEvent = ChargingEvent { is_charging: false };

    #[test]
    fn test_new_state_is_unknown() {
        let state = ChargingState::new();
        assert_eq!(state.last_value(), None);
        assert_eq!(state.last_seen(), None);
        assert_eq!(
            state.display(Instant::now(), DEFAULT_STALE_THRESHOLD),
            ChargingStatus::Unknown
        );
    }

    #[test]
    fn test_update_sets_value_and_time_together() {
        let t0 = Instant::now();
        let mut state = ChargingState::new();
        state.update(CHARGING, t0);
        assert_eq!(state.last_value(), Some(true));
        assert_eq!(state.last_seen(), Some(t0));
    }

    #[test]
    fn test_last_event_wins() {
        let t0 = Instant::now();
        let mut state = ChargingState::new();
        for i in 0..5 {
            state.update(CHARGING, t0 + Duration::from_millis(i));
        }
        let t1 = t0 + Duration::from_millis(100);
        let t2 = t0 + Duration::from_millis(200);
        state.update(CHARGING, t1);
        state.update(NOT_CHARGING, t2);
        assert_eq!(state, ChargingState::observed(false, t2));
    }

    #[test]
    fn test_stale_after_threshold() {
        // 3000ms old event vs 2500ms / 3500ms thresholds
        let t0 = Instant::now();
        let now = t0 + Duration::from_millis(3000);
        let state = ChargingState::observed(true, t0);
        assert_eq!(
            state.display(now, Duration::from_millis(2500)),
            ChargingStatus::Unknown
        );
        assert_eq!(
            state.display(now, Duration::from_millis(3500)),
            ChargingStatus::Yes
        );

        let state = ChargingState::observed(false, t0);
        assert_eq!(
            state.display(now, Duration::from_millis(3500)),
            ChargingStatus::No
        );
    }

    #[test]
    fn test_threshold_boundary_is_fresh() {
        let t0 = Instant::now();
        let threshold = Duration::from_millis(2500);
        let state = ChargingState::observed(true, t0);
        assert_eq!(state.display(t0 + threshold, threshold), ChargingStatus::Yes);
        assert_eq!(
            state.display(t0 + threshold + Duration::from_millis(1), threshold),
            ChargingStatus::Unknown
        );
    }

    #[test]
    fn test_freshness_decays_monotonically() {
        let t0 = Instant::now();
        let threshold = Duration::from_millis(500);
        let state = ChargingState::observed(false, t0);
        for ms in (0..=1000).step_by(25) {
            let status = state.display(t0 + Duration::from_millis(ms), threshold);
            if ms <= 500 {
                assert_eq!(status, ChargingStatus::No, "at {ms}ms");
            } else {
                assert_eq!(status, ChargingStatus::Unknown, "at {ms}ms");
            }
        }
    }

    #[test]
    fn test_clock_before_last_seen_counts_as_fresh() {
        let t0 = Instant::now();
        let state = ChargingState::observed(true, t0 + Duration::from_secs(1));
        assert_eq!(state.display(t0, Duration::ZERO), ChargingStatus::Yes);
    }

    #[test]
    fn test_status_display_and_json() {
        assert_eq!(ChargingStatus::Yes.to_string(), "yes");
        assert_eq!(ChargingStatus::No.to_string(), "no");
        assert_eq!(ChargingStatus::Unknown.to_string(), "unknown");
        assert_eq!(
            serde_json::to_string(&ChargingStatus::Unknown).unwrap(),
            "\"unknown\""
        );
    }
}
