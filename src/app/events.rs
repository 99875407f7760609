//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; on the device they go to the log.

use crate::actuation::ActuationReport;
use crate::error::Error;
use crate::pattern::LedPatterns;
use crate::remote::Endpoint;
use crate::sensors::SensorTable;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// A fresh `enter` event set occupancy.
    UserEntered { event_id: String, location: String },

    /// A fresh `exit` event cleared occupancy.
    UserExited { event_id: String, location: String },

    WifiConnected,
    WifiDisconnected,

    RequestSucceeded(Endpoint),
    RequestFailed(Endpoint, Error),

    /// The sensor table was rebuilt from a successful poll.
    SensorsRefreshed {
        table: SensorTable,
        patterns: LedPatterns,
    },

    /// A bulk activate/deactivate run finished.
    ActuationFinished(ActuationReport),

    Status(StatusSnapshot),
}

/// A point-in-time view of the controller, for logging or transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub uptime_ms: u64,
    pub tick_count: u64,
    pub link_up: bool,
    /// WiFi signal strength in dBm, when associated.
    pub rssi: Option<i8>,
    pub occupied: bool,
    pub sensors: SensorTable,
    pub patterns: LedPatterns,
    pub last_event_id: String,
}
