//! Discrete indicator LED driver.
//!
//! One GPIO per LED, driven through `embedded_hal::digital::OutputPin` so
//! the same driver runs on an ESP-IDF `PinDriver` and on a mock pin in
//! tests.  Callers always speak logical levels; `active_low` wiring is
//! handled here.

use embedded_hal::digital::OutputPin;

pub struct IndicatorLed<P: OutputPin> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> IndicatorLed<P> {
    /// Take ownership of `pin` and drive it to the logical off level.
    pub fn new(pin: P, active_low: bool) -> Result<Self, P::Error> {
        let mut led = Self {
            pin,
            active_low,
            lit: false,
        };
        led.write(false)?;
        Ok(led)
    }

    pub fn set_state(&mut self, on: bool) -> Result<(), P::Error> {
        if on == self.lit {
            return Ok(());
        }
        self.write(on)
    }

    pub fn turn_on(&mut self) -> Result<(), P::Error> {
        self.set_state(true)
    }

    pub fn turn_off(&mut self) -> Result<(), P::Error> {
        self.set_state(false)
    }

    /// Logical state (true = lit), independent of polarity.
    pub fn state(&self) -> bool {
        self.lit
    }

    fn write(&mut self, on: bool) -> Result<(), P::Error> {
        // Electrical level: high when lit, unless the LED sinks to the pin.
        if on != self.active_low {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.lit = on;
        Ok(())
    }
}
