//! Bulk remote actuation on occupancy changes.
//!
//! On Enter every inactive remote sensor is switched on; on Exit every
//! active one is switched off.  Both directions are best effort: a failed
//! command is logged and the batch carries on, there is no retry and no
//! rollback.  Commands are paced with a fixed blocking delay so the
//! backend sees at most one request per spacing interval.
//!
//! Exit additionally forces the local table and patterns off *before*
//! talking to the backend, so a failed or slow deactivation can never
//! leave an "on" indicator behind.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::HttpPort;
use crate::context::ControllerContext;
use crate::error::Result;
use crate::remote::RemoteApi;
use crate::sensors::{self, SensorRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCommand {
    Activate,
    Deactivate,
}

impl SensorCommand {
    /// Remote `isActive` value this command sets.
    pub const fn target_state(self) -> bool {
        matches!(self, Self::Activate)
    }
}

impl fmt::Display for SensorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        })
    }
}

/// Outcome of one bulk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationReport {
    pub command: SensorCommand,
    /// Requests actually sent.
    pub issued: usize,
    pub succeeded: usize,
    /// Sent but not 2xx, or skipped because the sensor had no id.
    pub failed: usize,
    /// Already in the target state.
    pub untouched: usize,
}

impl ActuationReport {
    fn new(command: SensorCommand) -> Self {
        Self {
            command,
            issued: 0,
            succeeded: 0,
            failed: 0,
            untouched: 0,
        }
    }
}

impl fmt::Display for ActuationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: issued={} ok={} failed={} untouched={}",
            self.command, self.issued, self.succeeded, self.failed, self.untouched
        )
    }
}

pub struct OccupancyActuationController {
    spacing_ms: u32,
}

impl OccupancyActuationController {
    pub fn new(spacing_ms: u32) -> Self {
        Self { spacing_ms }
    }

    pub fn set_spacing_ms(&mut self, spacing_ms: u32) {
        self.spacing_ms = spacing_ms;
    }

    /// Switch on every inactive remote sensor.
    ///
    /// Local state is not touched; the caller resynchronises with a sensor
    /// poll once the backend has settled.
    pub fn on_enter<H: HttpPort + DelayNs>(&self, api: &RemoteApi, hw: &mut H) -> Result<ActuationReport> {
        let records = fetch_records(api, hw)?;
        Ok(self.apply(api, hw, &records, SensorCommand::Activate))
    }

    /// Force everything off locally, then switch off every active remote
    /// sensor.
    ///
    /// The local reset happens even when the sensor list cannot be fetched.
    pub fn on_exit<H: HttpPort + DelayNs>(
        &self,
        api: &RemoteApi,
        hw: &mut H,
        ctx: &mut ControllerContext,
    ) -> Result<ActuationReport> {
        ctx.force_all_off();
        let records = fetch_records(api, hw)?;
        Ok(self.apply(api, hw, &records, SensorCommand::Deactivate))
    }

    fn apply<H: HttpPort + DelayNs>(
        &self,
        api: &RemoteApi,
        hw: &mut H,
        records: &[SensorRecord],
        command: SensorCommand,
    ) -> ActuationReport {
        let target = command.target_state();
        let mut report = ActuationReport::new(command);

        for record in records {
            if record.is_active == target {
                report.untouched += 1;
                continue;
            }
            if record.id.is_empty() {
                warn!("ACTUATION | {command} skipped: sensor '{}' has no id", record.name);
                report.failed += 1;
                continue;
            }
            if report.issued > 0 {
                hw.delay_ms(self.spacing_ms);
            }
            report.issued += 1;
            match api.set_sensor_state(hw, &record.id, target) {
                Ok(()) => {
                    report.succeeded += 1;
                    info!("ACTUATION | {command} {} ({})", record.id, record.name);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("ACTUATION | {command} {} failed: {e}", record.id);
                }
            }
        }

        info!("ACTUATION | {report}");
        report
    }
}

fn fetch_records(api: &RemoteApi, http: &mut impl HttpPort) -> Result<Vec<SensorRecord>> {
    let body = api.fetch_sensors(http)?;
    Ok(sensors::decode_sensor_list(&body)?)
}
