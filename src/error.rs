//! Unified error types for the GeoEntry firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! tick loop's failure handling uniform.  Every variant is `Copy` so a
//! failed poll can be logged and reported through events without
//! allocating.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A response body was not the JSON shape we expect.
    Decode(DecodeError),
    /// The request never produced a 2xx response.
    Transport(TransportError),
    /// The WiFi station could not be configured or started.
    Link(LinkError),
    /// Configuration failed validation.  Names the offending field.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid JSON (syntax error or truncated body).
    Malformed { line: usize, column: usize },
    /// Valid JSON, but neither a record, a record array, nor a `data` wrapper.
    UnexpectedShape,
    /// Empty response body.
    Empty,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line, column } => {
                write!(f, "malformed JSON at line {line}, column {column}")
            }
            Self::UnexpectedShape => write!(f, "unexpected payload shape"),
            Self::Empty => write!(f, "empty body"),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match e.classify() {
            Category::Data => Self::UnexpectedShape,
            Category::Syntax | Category::Eof | Category::Io => Self::Malformed {
                line: e.line(),
                column: e.column(),
            },
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.into())
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be opened (DNS, TCP or TLS failure).
    Unreachable,
    /// The transport timeout expired before a response arrived.
    Timeout,
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The response body could not be read completely.
    Body,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "host unreachable"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Body => write!(f, "response body read failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Link (WiFi station) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The station is not associated right now.
    Down,
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => write!(f, "WiFi link is down"),
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectFailed => write!(f, "WiFi connection could not be started"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
