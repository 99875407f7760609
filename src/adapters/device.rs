//! Composite board adapter.
//!
//! Bundles the WiFi station, the HTTP client, the three indicator LEDs,
//! the clock and a delay provider into one value implementing every
//! port, so the service can take a single `&mut` to the whole board.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::adapters::http::HttpAdapter;
use crate::adapters::time::MonotonicClock;
use crate::adapters::wifi::WifiAdapter;
use crate::app::ports::{
    ClockPort, ConnectivityPort, HttpPort, HttpResponse, IndicatorOutputs, IndicatorPort,
};
use crate::drivers::indicator_led::IndicatorLed;
use crate::error::{LinkError, TransportError};

// ───────────────────────────────────────────────────────────────
// Indicator bank
// ───────────────────────────────────────────────────────────────

/// The proximity LED and the two pattern LEDs.
pub struct IndicatorBank<P: OutputPin> {
    proximity: IndicatorLed<P>,
    pattern_a: IndicatorLed<P>,
    pattern_b: IndicatorLed<P>,
}

impl<P: OutputPin> IndicatorBank<P> {
    /// Wrap the three pins; every LED starts dark.
    pub fn new(proximity: P, pattern_a: P, pattern_b: P, active_low: bool) -> Result<Self, P::Error> {
        Ok(Self {
            proximity: IndicatorLed::new(proximity, active_low)?,
            pattern_a: IndicatorLed::new(pattern_a, active_low)?,
            pattern_b: IndicatorLed::new(pattern_b, active_low)?,
        })
    }

    pub fn outputs(&self) -> IndicatorOutputs {
        IndicatorOutputs {
            proximity: self.proximity.state(),
            pattern_a: self.pattern_a.state(),
            pattern_b: self.pattern_b.state(),
        }
    }
}

impl<P: OutputPin> IndicatorPort for IndicatorBank<P> {
    fn set_indicators(&mut self, outputs: IndicatorOutputs) {
        let leds = [
            ("proximity", &mut self.proximity, outputs.proximity),
            ("pattern A", &mut self.pattern_a, outputs.pattern_a),
            ("pattern B", &mut self.pattern_b, outputs.pattern_b),
        ];
        for (name, led, on) in leds {
            if let Err(e) = led.set_state(on) {
                warn!("LED | {name} write failed: {e:?}");
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Device adapter
// ───────────────────────────────────────────────────────────────

pub struct DeviceAdapter<P: OutputPin, D: DelayNs> {
    pub wifi: WifiAdapter,
    pub http: HttpAdapter,
    pub leds: IndicatorBank<P>,
    clock: MonotonicClock,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> DeviceAdapter<P, D> {
    pub fn new(wifi: WifiAdapter, http: HttpAdapter, leds: IndicatorBank<P>, delay: D) -> Self {
        Self {
            wifi,
            http,
            leds,
            clock: MonotonicClock::new(),
            delay,
        }
    }
}

impl<P: OutputPin, D: DelayNs> HttpPort for DeviceAdapter<P, D> {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.http.get(url)
    }

    fn put_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        self.http.put_json(url, body)
    }

    fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.http.set_timeout_ms(timeout_ms);
    }
}

impl<P: OutputPin, D: DelayNs> ConnectivityPort for DeviceAdapter<P, D> {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        self.wifi.set_credentials(ssid, password)
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        self.wifi.connect()
    }

    fn disconnect(&mut self) {
        self.wifi.disconnect();
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_connected()
    }

    fn rssi(&self) -> Option<i8> {
        self.wifi.rssi()
    }
}

impl<P: OutputPin, D: DelayNs> IndicatorPort for DeviceAdapter<P, D> {
    fn set_indicators(&mut self, outputs: IndicatorOutputs) {
        self.leds.set_indicators(outputs);
    }
}

impl<P: OutputPin, D: DelayNs> ClockPort for DeviceAdapter<P, D> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl<P: OutputPin, D: DelayNs> DelayNs for DeviceAdapter<P, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
