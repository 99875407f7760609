//! Mock device adapter for integration tests.
//!
//! Implements every port behind `DevicePorts` in memory.  The fake
//! backend serves canned replies for the two GET endpoints and records
//! every request, indicator write and delay so tests can assert on the
//! full history without a network or GPIO.

use embedded_hal::delay::DelayNs;
use geoentry::app::events::AppEvent;
use geoentry::app::ports::{
    ClockPort, ConnectivityPort, EventSink, HttpPort, HttpResponse, IndicatorOutputs, IndicatorPort,
};
use geoentry::error::{LinkError, TransportError};

// ── HTTP call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HttpCall {
    Get(String),
    Put { url: String, body: String },
}

pub type Reply = Result<HttpResponse, TransportError>;

pub fn ok(body: &str) -> Reply {
    Ok(HttpResponse {
        status: 200,
        body: body.to_owned(),
    })
}

pub fn status(code: u16) -> Reply {
    Ok(HttpResponse {
        status: code,
        body: String::new(),
    })
}

// ── MockDevice ────────────────────────────────────────────────

pub struct MockDevice {
    pub now: u64,
    pub link_up: bool,
    /// `connect()` brings the link up immediately.
    pub connect_succeeds: bool,
    pub connects: u32,
    pub disconnects: u32,
    pub credentials: Option<(String, String)>,
    pub timeout_ms: Option<u32>,

    /// Reply for `GET {base}/{device_id}`.
    pub proximity: Reply,
    /// Reply for `GET {base}/sensors/user/{user_id}`.
    pub sensors: Reply,
    /// Sensor ids whose status PUT answers 500.
    pub failing_puts: Vec<String>,

    pub calls: Vec<HttpCall>,
    pub indicator_writes: Vec<IndicatorOutputs>,
    pub slept_ms: u64,
}

#[allow(dead_code)]
impl MockDevice {
    /// Associated board with an empty backend.
    pub fn new() -> Self {
        Self {
            now: 0,
            link_up: true,
            connect_succeeds: true,
            connects: 0,
            disconnects: 0,
            credentials: None,
            timeout_ms: None,
            proximity: ok("[]"),
            sensors: ok("[]"),
            failing_puts: Vec::new(),
            calls: Vec::new(),
            indicator_writes: Vec::new(),
            slept_ms: 0,
        }
    }

    /// Board whose access point never answers.
    pub fn offline() -> Self {
        Self {
            link_up: false,
            connect_succeeds: false,
            ..Self::new()
        }
    }

    pub fn gets(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HttpCall::Get(url) => Some(url.as_str()),
                HttpCall::Put { .. } => None,
            })
            .collect()
    }

    pub fn puts(&self) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HttpCall::Put { url, body } => Some((url.as_str(), body.as_str())),
                HttpCall::Get(_) => None,
            })
            .collect()
    }

    pub fn leds(&self) -> IndicatorOutputs {
        self.indicator_writes
            .last()
            .copied()
            .unwrap_or(IndicatorOutputs::DARK)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPort for MockDevice {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.push(HttpCall::Get(url.to_owned()));
        if url.contains("/sensors/user/") {
            self.sensors.clone()
        } else {
            self.proximity.clone()
        }
    }

    fn put_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        self.calls.push(HttpCall::Put {
            url: url.to_owned(),
            body: body.to_owned(),
        });
        let failing = self
            .failing_puts
            .iter()
            .any(|id| url.ends_with(&format!("/sensors/{id}/status")));
        if failing { status(500) } else { status(200) }
    }

    fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = Some(timeout_ms);
    }
}

impl ConnectivityPort for MockDevice {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        if ssid.is_empty() {
            return Err(LinkError::InvalidSsid);
        }
        self.credentials = Some((ssid.to_owned(), password.to_owned()));
        Ok(())
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        self.connects += 1;
        if self.connect_succeeds {
            self.link_up = true;
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.link_up = false;
    }

    fn is_connected(&self) -> bool {
        self.link_up
    }

    fn rssi(&self) -> Option<i8> {
        self.link_up.then_some(-55)
    }
}

impl IndicatorPort for MockDevice {
    fn set_indicators(&mut self, outputs: IndicatorOutputs) {
        self.indicator_writes.push(outputs);
    }
}

impl ClockPort for MockDevice {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

impl DelayNs for MockDevice {
    fn delay_ns(&mut self, ns: u32) {
        self.now += u64::from(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms += u64::from(ms);
        self.now += u64::from(ms);
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
