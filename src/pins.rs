//! GPIO pin assignments for the GeoEntry board.
//!
//! The binary references this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Indicator LEDs (discrete, one GPIO each)
// ---------------------------------------------------------------------------

/// Red LED: lit while the user is home; also carries link/request flashes.
pub const PROXIMITY_LED_GPIO: i32 = 2;
/// Green LED: TV / light pattern.
pub const PATTERN_LED_A_GPIO: i32 = 4;
/// Blue LED: air conditioning / coffee maker pattern.
pub const PATTERN_LED_B_GPIO: i32 = 5;
