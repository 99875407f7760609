//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (HTTP client, WiFi station, indicator LEDs, clock,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches the network or GPIO directly.
//!
//! Pacing between remote commands uses `embedded_hal::delay::DelayNs`
//! rather than a port of our own.

use embedded_hal::delay::DelayNs;

use crate::error::{LinkError, TransportError};

// ───────────────────────────────────────────────────────────────
// HTTP port (driven adapter: domain → remote API)
// ───────────────────────────────────────────────────────────────

/// A completed HTTP exchange.  Any status is returned here; deciding
/// what counts as success is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpPort {
    /// `GET url`.  `Err` only when no response was received at all.
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError>;

    /// `PUT url` with a JSON body (`Content-Type: application/json`).
    fn put_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError>;

    /// Change the per-request transport timeout.
    fn set_timeout_ms(&mut self, _timeout_ms: u32) {}
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain ↔ WiFi station)
// ───────────────────────────────────────────────────────────────

/// Station-mode link control.  Every call returns immediately; the
/// domain polls [`is_connected`](Self::is_connected) to learn the outcome.
pub trait ConnectivityPort {
    /// Store credentials for the next [`connect`](Self::connect).
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), LinkError>;

    /// Start associating with the configured network.
    fn connect(&mut self) -> Result<(), LinkError>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Signal strength of the current association, if any.
    fn rssi(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Logical levels for the three indicator LEDs (true = lit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorOutputs {
    pub proximity: bool,
    pub pattern_a: bool,
    pub pattern_b: bool,
}

impl IndicatorOutputs {
    pub const DARK: Self = Self {
        proximity: false,
        pattern_a: false,
        pattern_b: false,
    };
}

pub trait IndicatorPort {
    /// Drive all three LEDs.  Polarity is the adapter's concern.
    fn set_indicators(&mut self, outputs: IndicatorOutputs);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Monotonic milliseconds since boot.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Combined device port
// ───────────────────────────────────────────────────────────────

/// Everything the tick loop needs from the board, as one bound.  A single
/// adapter implements all of it, which avoids juggling several `&mut`
/// borrows of the same peripherals.
pub trait DevicePorts: HttpPort + ConnectivityPort + IndicatorPort + ClockPort + DelayNs {}

impl<T> DevicePorts for T where T: HttpPort + ConnectivityPort + IndicatorPort + ClockPort + DelayNs {}
