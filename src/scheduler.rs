//! Poll timers for the tick loop.
//!
//! The tick loop runs at a fixed cadence; these timers decide which of
//! the two remote polls are due on a given tick.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        One tick                              │
//! │                                                              │
//! │  1. ConnectivityManager.check()  ── down ──▶ skip 2 and 3    │
//! │                │ up                                          │
//! │                ▼                                             │
//! │  2. proximity timer due?  ──▶ fetch + process events         │
//! │                │                                             │
//! │                ▼                                             │
//! │  3. sensor timer due (or resync due)?  ──▶ refresh table     │
//! │                │                                             │
//! │                ▼                                             │
//! │  4. BlinkScheduler.advance()  ──▶ IndicatorPort              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A timer that is overdue fires once and restarts from the moment it was
//! serviced; missed intervals are not caught up.

// ═══════════════════════════════════════════════════════════════
//  Interval timer
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    interval_ms: u32,
    last_ms: u64,
}

impl IntervalTimer {
    /// A timer counting from boot (t = 0).
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: 0,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_ms) >= u64::from(self.interval_ms)
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }

    /// Takes effect on the next [`is_due`](Self::is_due).
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }
}

// ═══════════════════════════════════════════════════════════════
//  Poll schedule
// ═══════════════════════════════════════════════════════════════

/// Proximity and sensor poll timers plus the one-shot sensor resync
/// requested after bulk activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    proximity: IntervalTimer,
    sensors: IntervalTimer,
    resync_at_ms: Option<u64>,
}

impl PollSchedule {
    pub fn new(proximity_interval_ms: u32, sensor_interval_ms: u32) -> Self {
        Self {
            proximity: IntervalTimer::new(proximity_interval_ms),
            sensors: IntervalTimer::new(sensor_interval_ms),
            resync_at_ms: None,
        }
    }

    pub fn proximity_due(&self, now_ms: u64) -> bool {
        self.proximity.is_due(now_ms)
    }

    /// Regular interval elapsed, or a requested resync has come due.
    pub fn sensors_due(&self, now_ms: u64) -> bool {
        self.sensors.is_due(now_ms) || self.resync_at_ms.is_some_and(|at| now_ms >= at)
    }

    pub fn mark_proximity_polled(&mut self, now_ms: u64) {
        self.proximity.reset(now_ms);
    }

    /// A poll consumes the resync only once it has come due; an earlier
    /// regular poll still sees the pre-settle backend.
    pub fn mark_sensors_polled(&mut self, now_ms: u64) {
        self.sensors.reset(now_ms);
        if self.resync_at_ms.is_some_and(|at| now_ms >= at) {
            self.resync_at_ms = None;
        }
    }

    /// Ask for one extra sensor poll no earlier than `at_ms`.
    pub fn request_resync(&mut self, at_ms: u64) {
        self.resync_at_ms = Some(at_ms);
    }

    pub fn resync_pending(&self) -> bool {
        self.resync_at_ms.is_some()
    }

    pub fn apply_config(&mut self, proximity_interval_ms: u32, sensor_interval_ms: u32) {
        self.proximity.set_interval(proximity_interval_ms);
        self.sensors.set_interval(sensor_interval_ms);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
