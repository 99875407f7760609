//! Device configuration parameters
//!
//! Every tunable of the GeoEntry controller, all defaulted.  Values can be
//! overridden at build time (`GEOENTRY_CONFIG_JSON`) or at runtime through
//! [`AppCommand::UpdateConfig`](crate::app::commands::AppCommand::UpdateConfig).

use serde::{Deserialize, Serialize};

use crate::error::{Error, LinkError, Result};

pub const DEFAULT_WIFI_SSID: &str = "Wokwi-GUEST";
pub const DEFAULT_API_BASE_URL: &str = "https://geoentry-edge-api.onrender.com/api/v1/";
pub const DEFAULT_DEVICE_ID: &str = "7b4cdbcd-2bf0-4047-9355-05e33babf2c9";
pub const DEFAULT_USER_ID: &str = "dd380cd7-852b-4855-9c68-c45f71b62521";

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    // --- WiFi ---
    /// Station SSID (1-32 printable ASCII bytes)
    pub wifi_ssid: heapless::String<32>,
    /// WPA2 passphrase, empty for open networks
    pub wifi_password: heapless::String<64>,

    // --- Remote API ---
    /// Base URL shared by the proximity and sensor endpoints
    pub api_base_url: String,
    /// Device id appended to the base URL for proximity events
    pub device_id: String,
    /// User whose sensors are polled and actuated
    pub user_id: String,
    /// Transport timeout for every request (milliseconds)
    pub http_timeout_ms: u32,

    // --- Timing ---
    /// Proximity poll interval (milliseconds)
    pub proximity_interval_ms: u32,
    /// Sensor poll interval (milliseconds)
    pub sensor_interval_ms: u32,
    /// Tick loop period (milliseconds)
    pub tick_interval_ms: u32,
    /// Spacing between link-status polls while reconnecting (milliseconds)
    pub reconnect_poll_interval_ms: u32,
    /// Link-status polls per reconnect cycle
    pub reconnect_max_polls: u8,
    /// Pause between successive activate/deactivate commands (milliseconds)
    pub command_spacing_ms: u32,
    /// Delay before resynchronising sensors after bulk activation (milliseconds)
    pub settle_delay_ms: u32,

    // --- Indicators ---
    /// LEDs are wired active-low
    pub led_active_low: bool,
    /// Flash the proximity LED after each proximity request
    pub request_feedback: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let mut wifi_ssid = heapless::String::new();
        // Fits: the default SSID is 11 bytes.
        let _ = wifi_ssid.push_str(DEFAULT_WIFI_SSID);

        Self {
            wifi_ssid,
            wifi_password: heapless::String::new(),

            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            device_id: DEFAULT_DEVICE_ID.to_owned(),
            user_id: DEFAULT_USER_ID.to_owned(),
            http_timeout_ms: 10_000,

            proximity_interval_ms: 5_000,
            sensor_interval_ms: 10_000,
            tick_interval_ms: 100,
            reconnect_poll_interval_ms: 500,
            reconnect_max_polls: 20,
            command_spacing_ms: 300,
            settle_delay_ms: 1_000,

            led_active_low: false,
            request_feedback: true,
        }
    }
}

impl DeviceConfig {
    /// Defaults, overlaid with the JSON baked in via `GEOENTRY_CONFIG_JSON`
    /// when the firmware was built with it.
    pub fn from_build_env() -> Result<Self> {
        match option_env!("GEOENTRY_CONFIG_JSON") {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their
    /// defaults.  The result is validated.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn set_wifi_credentials(&mut self, ssid: &str, password: &str) -> Result<()> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.wifi_ssid.clear();
        self.wifi_ssid
            .push_str(ssid)
            .map_err(|()| LinkError::InvalidSsid)?;
        self.wifi_password.clear();
        self.wifi_password
            .push_str(password)
            .map_err(|()| LinkError::InvalidPassword)?;
        Ok(())
    }

    pub fn set_api_configuration(&mut self, base_url: &str, device_id: &str) -> Result<()> {
        validate_base_url(base_url)?;
        if device_id.is_empty() {
            return Err(Error::Config("device_id must not be empty"));
        }
        self.api_base_url = base_url.to_owned();
        self.device_id = device_id.to_owned();
        Ok(())
    }

    pub fn set_user_configuration(&mut self, user_id: &str) -> Result<()> {
        if user_id.is_empty() {
            return Err(Error::Config("user_id must not be empty"));
        }
        self.user_id = user_id.to_owned();
        Ok(())
    }

    pub fn set_check_interval(&mut self, interval_ms: u32) -> Result<()> {
        if interval_ms <= self.tick_interval_ms {
            return Err(Error::Config("proximity_interval_ms must exceed tick_interval_ms"));
        }
        self.proximity_interval_ms = interval_ms;
        Ok(())
    }

    pub fn set_sensor_check_interval(&mut self, interval_ms: u32) -> Result<()> {
        if interval_ms <= self.tick_interval_ms {
            return Err(Error::Config("sensor_interval_ms must exceed tick_interval_ms"));
        }
        self.sensor_interval_ms = interval_ms;
        Ok(())
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        validate_ssid(&self.wifi_ssid)?;
        validate_password(&self.wifi_password)?;
        validate_base_url(&self.api_base_url)?;
        if self.device_id.is_empty() {
            return Err(Error::Config("device_id must not be empty"));
        }
        if self.user_id.is_empty() {
            return Err(Error::Config("user_id must not be empty"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be non-zero"));
        }
        if self.proximity_interval_ms <= self.tick_interval_ms {
            return Err(Error::Config("proximity_interval_ms must exceed tick_interval_ms"));
        }
        if self.sensor_interval_ms <= self.tick_interval_ms {
            return Err(Error::Config("sensor_interval_ms must exceed tick_interval_ms"));
        }
        if self.reconnect_poll_interval_ms == 0 || self.reconnect_max_polls == 0 {
            return Err(Error::Config("reconnect polling must be non-zero"));
        }
        if self.http_timeout_ms == 0 {
            return Err(Error::Config("http_timeout_ms must be non-zero"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub(crate) fn validate_ssid(ssid: &str) -> core::result::Result<(), LinkError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(LinkError::InvalidSsid);
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> core::result::Result<(), LinkError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(LinkError::InvalidPassword);
    }
    Ok(())
}

fn validate_base_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(Error::Config("api_base_url must be an http(s) URL")),
    }
}
