//! HTTP client adapter.
//!
//! Implements [`HttpPort`] on top of `esp_idf_svc::http::client`.  A fresh
//! connection is opened per request with the configured timeout and the
//! ESP-IDF certificate bundle for `https://` URLs.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` wrapped in an
//!   `embedded_svc` client.
//! - **all other targets**: simulation stub answering every request
//!   with `200` and an empty JSON array.

use log::debug;

use crate::app::ports::{HttpPort, HttpResponse};
use crate::error::TransportError;

/// Bodies beyond this size are truncated and reported as a body error.
pub const MAX_BODY_BYTES: usize = 8 * 1024;

pub struct HttpAdapter {
    timeout_ms: u32,
}

impl HttpAdapter {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use core::time::Duration;

    use embedded_svc::http::client::Client;
    use embedded_svc::http::{Method, Status};
    use embedded_svc::io::{Read, Write};
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use esp_idf_svc::io::EspIOError;
    use log::warn;

    use super::MAX_BODY_BYTES;
    use crate::app::ports::HttpResponse;
    use crate::error::TransportError;

    fn classify(err: &EspIOError) -> TransportError {
        if err.0.code() == esp_idf_svc::sys::ESP_ERR_TIMEOUT as i32 {
            TransportError::Timeout
        } else {
            TransportError::Unreachable
        }
    }

    pub(super) fn send(
        timeout_ms: u32,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        let config = Configuration {
            timeout: Some(Duration::from_millis(u64::from(timeout_ms))),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let connection = EspHttpConnection::new(&config).map_err(|e| {
            warn!("HTTP(espidf): connection setup failed: {e}");
            TransportError::Unreachable
        })?;
        let mut client = Client::wrap(connection);

        let content_length = body.map_or(0, str::len).to_string();
        let headers = [
            ("accept", "application/json"),
            ("content-type", "application/json"),
            ("content-length", content_length.as_str()),
        ];

        let mut request = client
            .request(method, url, &headers)
            .map_err(|e| classify(&e))?;
        if let Some(body) = body {
            request
                .write_all(body.as_bytes())
                .map_err(|e| classify(&e))?;
            request.flush().map_err(|e| classify(&e))?;
        }
        let mut response = request.submit().map_err(|e| classify(&e))?;
        let status = response.status();

        let mut raw = Vec::new();
        let mut chunk = [0_u8; 512];
        loop {
            let read = response.read(&mut chunk).map_err(|_| TransportError::Body)?;
            if read == 0 {
                break;
            }
            if raw.len() + read > MAX_BODY_BYTES {
                warn!("HTTP(espidf): body exceeds {MAX_BODY_BYTES} bytes");
                return Err(TransportError::Body);
            }
            raw.extend_from_slice(&chunk[..read]);
        }
        let body = String::from_utf8(raw).map_err(|_| TransportError::Body)?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(target_os = "espidf")]
impl HttpPort for HttpAdapter {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        debug!("HTTP(espidf): GET {url}");
        platform::send(self.timeout_ms, embedded_svc::http::Method::Get, url, None)
    }

    fn put_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        debug!("HTTP(espidf): PUT {url}");
        platform::send(self.timeout_ms, embedded_svc::http::Method::Put, url, Some(body))
    }

    fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl HttpPort for HttpAdapter {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        debug!("HTTP(sim): GET {url}");
        Ok(HttpResponse {
            status: 200,
            body: "[]".to_owned(),
        })
    }

    fn put_json(&mut self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        debug!("HTTP(sim): PUT {url} {body}");
        Ok(HttpResponse {
            status: 200,
            body: String::new(),
        })
    }

    fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }
}
