//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! connectivity.  Every call returns immediately: `connect` only starts
//! the association and the domain polls `is_connected` afterwards.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::{info, warn};

#[cfg(target_os = "espidf")]
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::EspWifi;

use crate::app::ports::ConnectivityPort;
use crate::config::{validate_password, validate_ssid};
use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    driver: Option<EspWifi<'static>>,
    /// Simulation: link level, flipped by `connect`/`disconnect`.
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
    /// Simulation: counts platform_connect() calls.
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim_link_up: false,
            #[cfg(not(target_os = "espidf"))]
            sim_connect_counter: 0,
        }
    }

    /// Hand over the driver created in `main` (owns the modem peripheral).
    #[cfg(target_os = "espidf")]
    pub fn attach(&mut self, driver: EspWifi<'static>) {
        self.driver = Some(driver);
    }

    /// Simulation: drop the link as if the AP went away.
    #[cfg(not(target_os = "espidf"))]
    pub fn simulate_link_loss(&mut self) {
        warn!("WiFi(sim): link lost");
        self.sim_link_up = false;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), LinkError> {
        let driver = self.driver.as_mut().ok_or(LinkError::ConnectFailed)?;

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let configuration = Configuration::Client(ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| LinkError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| LinkError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        driver.set_configuration(&configuration).map_err(|e| {
            warn!("WiFi(espidf): set_configuration failed: {e}");
            LinkError::ConnectFailed
        })?;
        if !driver.is_started().unwrap_or(false) {
            driver.start().map_err(|e| {
                warn!("WiFi(espidf): start failed: {e}");
                LinkError::ConnectFailed
            })?;
        }
        driver.connect().map_err(|e| {
            warn!("WiFi(espidf): connect failed: {e}");
            LinkError::ConnectFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), LinkError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        self.sim_link_up = true;
        info!("WiFi(sim): associated with '{}' (attempt {})", self.ssid, self.sim_connect_counter);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            // Fails harmlessly when not associated.
            let _ = driver.disconnect();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim_link_up = false;
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|d| d.is_connected().unwrap_or(false))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_link_up
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        if !self.platform_is_connected() {
            return None;
        }
        let mut ap_info = esp_idf_svc::sys::wifi_ap_record_t::default();
        esp_idf_svc::sys::esp!(unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) })
            .ok()?;
        Some(ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        if !self.sim_link_up {
            return None;
        }
        // Vary a little per association, like a real environment.
        let oscillation = ((self.sim_connect_counter % 12) as i8) - 6;
        Some(-60_i8.saturating_add(oscillation))
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| LinkError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| LinkError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        if self.ssid.is_empty() {
            return Err(LinkError::NoCredentials);
        }
        info!("WiFi: connecting to '{}'", self.ssid);
        self.platform_connect()
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn rssi(&self) -> Option<i8> {
        self.platform_rssi()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
