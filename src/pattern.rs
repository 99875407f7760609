//! Pattern engine: sensor pairs to LED display modes.
//!
//! | a | b | pattern   |
//! |---|---|-----------|
//! | F | F | Off       |
//! | T | T | Solid     |
//! | T | F | SlowBlink |
//! | F | T | FastBlink |
//!
//! Argument order matters: `a` is the sensor that maps to the slow blink.
//! Nobody home means every LED is `Off`, whatever the table says.

use core::fmt;

use crate::sensors::SensorTable;

/// Display mode for one pattern LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LedPatternKind {
    #[default]
    Off,
    Solid,
    SlowBlink,
    FastBlink,
}

impl LedPatternKind {
    /// Toggle period for the blinking kinds.
    pub const fn blink_period_ms(self) -> Option<u64> {
        match self {
            Self::SlowBlink => Some(1_000),
            Self::FastBlink => Some(300),
            Self::Off | Self::Solid => None,
        }
    }
}

impl fmt::Display for LedPatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Solid => "solid",
            Self::SlowBlink => "slow-blink",
            Self::FastBlink => "fast-blink",
        })
    }
}

pub const fn compute(a: bool, b: bool) -> LedPatternKind {
    match (a, b) {
        (false, false) => LedPatternKind::Off,
        (true, true) => LedPatternKind::Solid,
        (true, false) => LedPatternKind::SlowBlink,
        (false, true) => LedPatternKind::FastBlink,
    }
}

/// Patterns for both pattern LEDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedPatterns {
    /// LED A: (TV, light)
    pub a: LedPatternKind,
    /// LED B: (AC, coffee maker)
    pub b: LedPatternKind,
}

impl LedPatterns {
    pub const OFF: Self = Self {
        a: LedPatternKind::Off,
        b: LedPatternKind::Off,
    };

    /// Derive both patterns from the table, gated on occupancy.
    pub fn resolve(table: &SensorTable, occupied: bool) -> Self {
        if !occupied {
            return Self::OFF;
        }
        let (tv, light) = table.pair_a();
        let (ac, coffee) = table.pair_b();
        Self {
            a: compute(tv, light),
            b: compute(ac, coffee),
        }
    }
}

impl fmt::Display for LedPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A={} B={}", self.a, self.b)
    }
}
