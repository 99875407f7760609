//! Non-blocking LED timing.
//!
//! Everything here is advanced once per tick with the current monotonic
//! time and returns logical on/off levels; nothing sleeps.  The
//! [`BlinkScheduler`] drives the two pattern LEDs, the [`FlashSequence`]
//! overlays short feedback flashes on the proximity LED.
//!
//! ## Pattern timing
//!
//! | Pattern   | Output                                  | Period  |
//! |-----------|-----------------------------------------|---------|
//! | Off       | low                                     | none    |
//! | Solid     | high                                    | none    |
//! | SlowBlink | toggles once elapsed >= period          | 1000 ms |
//! | FastBlink | toggles once elapsed >= period          | 300 ms  |
//!
//! Toggles only happen on tick boundaries, so the real blink period is
//! the nominal one plus up to one tick of jitter.
//!
//! ## Flashes
//!
//! | Flash   | Count | Phase  |
//! |---------|-------|--------|
//! | Success | 1     | 100 ms |
//! | Error   | 3     | 200 ms |

use crate::pattern::{LedPatternKind, LedPatterns};

// ── Blink timer ───────────────────────────────────────────────

/// Toggle state for one pattern LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlinkTimer {
    last_toggle_ms: u64,
    output: bool,
}

impl BlinkTimer {
    pub fn output(&self) -> bool {
        self.output
    }

    pub fn last_toggle_ms(&self) -> u64 {
        self.last_toggle_ms
    }

    /// Apply one tick of `kind` at `now_ms` and return the new output.
    /// `Off` and `Solid` set the level without touching the timestamp.
    pub fn advance(&mut self, kind: LedPatternKind, now_ms: u64) -> bool {
        match kind {
            LedPatternKind::Off => self.output = false,
            LedPatternKind::Solid => self.output = true,
            LedPatternKind::SlowBlink | LedPatternKind::FastBlink => {
                let period = kind.blink_period_ms().unwrap_or(u64::MAX);
                if now_ms.saturating_sub(self.last_toggle_ms) >= period {
                    self.output = !self.output;
                    self.last_toggle_ms = now_ms;
                }
            }
        }
        self.output
    }
}

// ── Blink scheduler ───────────────────────────────────────────

/// Both pattern LED timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlinkScheduler {
    a: BlinkTimer,
    b: BlinkTimer,
}

impl BlinkScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both timers.  When nobody is home both outputs are forced
    /// low and the timers are not consulted at all, even if `patterns`
    /// is stale.
    pub fn advance(&mut self, patterns: LedPatterns, occupied: bool, now_ms: u64) -> [bool; 2] {
        if !occupied {
            self.force_off();
            return [false, false];
        }
        [
            self.a.advance(patterns.a, now_ms),
            self.b.advance(patterns.b, now_ms),
        ]
    }

    pub fn force_off(&mut self) {
        self.a.output = false;
        self.b.output = false;
    }
}

// ── Flash overlay ─────────────────────────────────────────────

/// A burst of `times` on/off flashes, each phase `period_ms` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub times: u8,
    pub period_ms: u32,
}

pub const FLASH_SUCCESS: Flash = Flash {
    times: 1,
    period_ms: 100,
};

pub const FLASH_ERROR: Flash = Flash {
    times: 3,
    period_ms: 200,
};

/// Time-based replacement for a blocking "blink N times" helper.
///
/// The LED is on during even phases and off during odd ones; the
/// sequence ends after `2 * times` phases.  Starting a new flash
/// replaces the running one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashSequence {
    active: Option<(Flash, u64)>,
}

impl FlashSequence {
    pub fn start(&mut self, flash: Flash, now_ms: u64) {
        if flash.times == 0 || flash.period_ms == 0 {
            self.active = None;
            return;
        }
        self.active = Some((flash, now_ms));
    }

    /// Level requested by the running flash, or `None` once it is over.
    pub fn level(&mut self, now_ms: u64) -> Option<bool> {
        let (flash, started) = self.active?;
        let phase = now_ms.saturating_sub(started) / u64::from(flash.period_ms);
        if phase >= 2 * u64::from(flash.times) {
            self.active = None;
            return None;
        }
        Some(phase % 2 == 0)
    }
}
