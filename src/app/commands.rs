//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (serial
//! console, a future provisioning channel, tests) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::DeviceConfig;
use crate::error::Error;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Poll the proximity endpoint now, outside the regular interval.
    CheckProximity,

    /// Refresh the sensor table now.
    CheckSensors,

    /// Start a reconnect cycle if the link is down.
    ReconnectWifi,

    /// Ask the binary to restart the chip.
    ResetSystem,

    /// Emit a status snapshot.
    UpdateStatus,

    /// Validate and apply a new configuration.
    UpdateConfig(DeviceConfig),
}

/// What happened to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// The caller must restart the device.
    RestartRequested,
    Rejected(Error),
}
