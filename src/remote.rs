//! Remote API client.
//!
//! Builds the three endpoint URLs and turns HTTP exchanges into
//! `Result`s: anything other than a 2xx response is a
//! [`TransportError`], so callers only ever see bodies of successful
//! requests.

use core::fmt;

use log::{debug, warn};

use crate::app::ports::HttpPort;
use crate::config::DeviceConfig;
use crate::error::TransportError;

/// Which remote endpoint a request went to (for events and logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Proximity,
    Sensors,
    SensorStatus,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Proximity => "proximity",
            Self::Sensors => "sensors",
            Self::SensorStatus => "sensor-status",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteApi {
    base_url: String,
    device_id: String,
    user_id: String,
}

impl RemoteApi {
    pub fn new(base_url: &str, device_id: &str, user_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            device_id: device_id.to_owned(),
            user_id: user_id.to_owned(),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(&config.api_base_url, &config.device_id, &config.user_id)
    }

    // ── URLs ──────────────────────────────────────────────────

    pub fn proximity_url(&self) -> String {
        format!("{}/{}", self.base_url, self.device_id)
    }

    pub fn sensors_url(&self) -> String {
        format!("{}/sensors/user/{}", self.base_url, self.user_id)
    }

    pub fn sensor_status_url(&self, sensor_id: &str) -> String {
        format!("{}/sensors/{}/status", self.base_url, sensor_id)
    }

    // ── Requests ──────────────────────────────────────────────

    /// Body of the latest proximity events.
    pub fn fetch_proximity(&self, http: &mut impl HttpPort) -> Result<String, TransportError> {
        fetch(http, Endpoint::Proximity, &self.proximity_url())
    }

    /// Body of the user's sensor list.
    pub fn fetch_sensors(&self, http: &mut impl HttpPort) -> Result<String, TransportError> {
        fetch(http, Endpoint::Sensors, &self.sensors_url())
    }

    /// `PUT {"isActive": active}` for one sensor.
    pub fn set_sensor_state(
        &self,
        http: &mut impl HttpPort,
        sensor_id: &str,
        active: bool,
    ) -> Result<(), TransportError> {
        let url = self.sensor_status_url(sensor_id);
        let body = serde_json::json!({ "isActive": active }).to_string();
        debug!("HTTP | PUT {url} {body}");
        let response = http.put_json(&url, &body)?;
        if !response.is_success() {
            warn!(
                "HTTP | {} {sensor_id} -> status {}",
                Endpoint::SensorStatus,
                response.status
            );
            return Err(TransportError::Status(response.status));
        }
        Ok(())
    }
}

fn fetch(http: &mut impl HttpPort, endpoint: Endpoint, url: &str) -> Result<String, TransportError> {
    debug!("HTTP | GET {url}");
    let response = http.get(url)?;
    if !response.is_success() {
        warn!("HTTP | {endpoint} -> status {}", response.status);
        return Err(TransportError::Status(response.status));
    }
    debug!("HTTP | {endpoint} -> {} bytes", response.body.len());
    Ok(response.body)
}
