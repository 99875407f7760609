//! Controller state threaded through every tick.
//!
//! `ControllerContext` is the one place that holds process-wide mutable
//! state: the event cursor, the sensor table, occupancy, the derived LED
//! patterns and the LED timers.  There is exactly one per device and it
//! is owned by the [`AppService`](crate::app::service::AppService).
//!
//! `patterns` is never written directly from outside; every mutation of
//! the table or occupancy goes through a method that recomputes it.

use crate::drivers::led_patterns::{BlinkScheduler, FlashSequence};
use crate::pattern::LedPatterns;
use crate::proximity::EventCursor;
use crate::sensors::SensorTable;

#[derive(Debug, Clone, Default)]
pub struct ControllerContext {
    // ---------------------------------------------------------------------------
    // Domain state
    // ---------------------------------------------------------------------------
    pub cursor: EventCursor,
    sensors: SensorTable,
    occupied: bool,
    patterns: LedPatterns,

    // ---------------------------------------------------------------------------
    // Indicator timing
    // ---------------------------------------------------------------------------
    pub blink: BlinkScheduler,
    /// Feedback flashes on the proximity LED.
    pub feedback: FlashSequence,
}

impl ControllerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensors(&self) -> &SensorTable {
        &self.sensors
    }

    pub fn occupied(&self) -> bool {
        self.occupied
    }

    pub fn patterns(&self) -> LedPatterns {
        self.patterns
    }

    pub fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
        self.refresh_patterns();
    }

    /// Swap in a freshly polled table.
    pub fn replace_sensors(&mut self, table: SensorTable) {
        self.sensors = table;
        self.refresh_patterns();
    }

    /// Local "everything off": clear the table and both patterns.
    pub fn force_all_off(&mut self) {
        self.sensors.clear();
        self.patterns = LedPatterns::OFF;
        self.blink.force_off();
    }

    fn refresh_patterns(&mut self) {
        self.patterns = LedPatterns::resolve(&self.sensors, self.occupied);
    }
}
