//! Indicator drivers and LED timing.

pub mod indicator_led;
pub mod led_patterns;
