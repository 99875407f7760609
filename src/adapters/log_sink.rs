//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future MQTT adapter would implement the same trait.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | monitoring proximity events");
            }
            AppEvent::UserEntered { event_id, location } => {
                info!("EVENT | enter id={event_id} location='{location}'");
            }
            AppEvent::UserExited { event_id, location } => {
                info!("EVENT | exit id={event_id} location='{location}'");
            }
            AppEvent::WifiConnected => {
                info!("LINK | connected");
            }
            AppEvent::WifiDisconnected => {
                error!("LINK | disconnected");
            }
            AppEvent::RequestSucceeded(endpoint) => {
                info!("HTTP | {endpoint} ok");
            }
            AppEvent::RequestFailed(endpoint, e) => {
                warn!("HTTP | {endpoint} failed: {e}");
            }
            AppEvent::SensorsRefreshed { table, patterns } => {
                info!("SENSORS | {table} | LEDs {patterns}");
            }
            AppEvent::ActuationFinished(report) => {
                info!("ACTUATION | {report}");
            }
            AppEvent::Status(s) => {
                info!(
                    "STATUS | up={}ms ticks={} | link={} rssi={:?} | home={} | {} | LEDs {} | last_event='{}'",
                    s.uptime_ms,
                    s.tick_count,
                    if s.link_up { "up" } else { "down" },
                    s.rssi,
                    s.occupied,
                    s.sensors,
                    s.patterns,
                    s.last_event_id,
                );
            }
        }
    }
}
