//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the controller context, the connectivity manager,
//! the poll schedule and the actuation controller.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!    HttpPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//! Connectivity ──▶│          AppService          │
//!                 │ link · events · sensors · LED │ ──▶ IndicatorPort
//!   ClockPort ──▶ └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::actuation::OccupancyActuationController;
use crate::config::DeviceConfig;
use crate::connectivity::{ConnectivityManager, LinkEvent, LinkState};
use crate::context::ControllerContext;
use crate::drivers::led_patterns::{FLASH_ERROR, FLASH_SUCCESS, Flash};
use crate::error::{Error, LinkError};
use crate::pattern::LedPatterns;
use crate::proximity::{self, Transition};
use crate::remote::{Endpoint, RemoteApi};
use crate::scheduler::PollSchedule;
use crate::sensors::{self, SensorTable};

use super::commands::{AppCommand, CommandOutcome};
use super::events::{AppEvent, StatusSnapshot};
use super::ports::{DevicePorts, EventSink, IndicatorOutputs};

/// What one tick did, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub link_up: bool,
    pub proximity_polled: bool,
    pub sensors_polled: bool,
    pub outputs: IndicatorOutputs,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: DeviceConfig,
    ctx: ControllerContext,
    api: RemoteApi,
    link: ConnectivityManager,
    schedule: PollSchedule,
    actuation: OccupancyActuationController,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            ctx: ControllerContext::new(),
            api: RemoteApi::from_config(&config),
            link: ConnectivityManager::new(
                config.reconnect_poll_interval_ms,
                config.reconnect_max_polls,
            ),
            schedule: PollSchedule::new(config.proximity_interval_ms, config.sensor_interval_ms),
            actuation: OccupancyActuationController::new(config.command_spacing_ms),
            tick_count: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Push configuration to the adapters, darken the LEDs and start the
    /// first association.
    pub fn start(&mut self, hw: &mut impl DevicePorts, sink: &mut impl EventSink) {
        hw.set_timeout_ms(self.config.http_timeout_ms);
        if let Err(e) = hw.set_credentials(&self.config.wifi_ssid, &self.config.wifi_password) {
            warn!("WiFi credentials rejected: {e}");
        }
        hw.set_indicators(IndicatorOutputs::DARK);
        self.link.begin(hw.now_ms(), hw);
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started (device {}, proximity every {} ms, sensors every {} ms)",
            self.config.device_id, self.config.proximity_interval_ms, self.config.sensor_interval_ms
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick: link check → proximity poll → sensor poll → LEDs.
    ///
    /// The `hw` parameter satisfies every port at once, which avoids
    /// several mutable borrows of the same adapter.
    pub fn run_tick(&mut self, hw: &mut impl DevicePorts, sink: &mut impl EventSink) -> TickReport {
        self.tick_count += 1;

        // 1. Connectivity gate
        let now = hw.now_ms();
        let check = self.link.check(now, hw);
        match check.event {
            Some(LinkEvent::Connected) => {
                sink.emit(&AppEvent::WifiConnected);
                self.flash(FLASH_SUCCESS, now);
            }
            Some(LinkEvent::Disconnected) => {
                sink.emit(&AppEvent::WifiDisconnected);
                self.flash(FLASH_ERROR, now);
            }
            None => {}
        }

        let mut report = TickReport {
            link_up: check.up,
            proximity_polled: false,
            sensors_polled: false,
            outputs: IndicatorOutputs::DARK,
        };

        if check.up {
            // 2. Proximity
            if self.schedule.proximity_due(hw.now_ms()) {
                self.poll_proximity(hw, sink);
                self.schedule.mark_proximity_polled(hw.now_ms());
                report.proximity_polled = true;
            }

            // 3. Sensors
            if self.schedule.sensors_due(hw.now_ms()) {
                self.poll_sensors(hw, sink);
                self.schedule.mark_sensors_polled(hw.now_ms());
                report.sensors_polled = true;
            }
        }

        // 4. Indicators
        report.outputs = self.drive_indicators(check.up, hw);
        report
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl DevicePorts,
        sink: &mut impl EventSink,
    ) -> CommandOutcome {
        match cmd {
            AppCommand::CheckProximity => {
                if !self.link.is_up() {
                    return CommandOutcome::Rejected(LinkError::Down.into());
                }
                self.poll_proximity(hw, sink);
                self.schedule.mark_proximity_polled(hw.now_ms());
                CommandOutcome::Done
            }
            AppCommand::CheckSensors => {
                if !self.link.is_up() {
                    return CommandOutcome::Rejected(LinkError::Down.into());
                }
                self.poll_sensors(hw, sink);
                self.schedule.mark_sensors_polled(hw.now_ms());
                CommandOutcome::Done
            }
            AppCommand::ReconnectWifi => {
                self.link.force_reconnect(hw.now_ms(), hw);
                CommandOutcome::Done
            }
            AppCommand::ResetSystem => {
                warn!("Restart requested");
                CommandOutcome::RestartRequested
            }
            AppCommand::UpdateStatus => {
                sink.emit(&AppEvent::Status(self.status(&*hw)));
                CommandOutcome::Done
            }
            AppCommand::UpdateConfig(new_config) => match self.apply_config(new_config, hw) {
                Ok(()) => CommandOutcome::Done,
                Err(e) => {
                    warn!("Configuration rejected: {e}");
                    CommandOutcome::Rejected(e)
                }
            },
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self, hw: &impl DevicePorts) -> StatusSnapshot {
        StatusSnapshot {
            uptime_ms: hw.now_ms(),
            tick_count: self.tick_count,
            link_up: self.link.is_up(),
            rssi: hw.rssi(),
            occupied: self.ctx.occupied(),
            sensors: *self.ctx.sensors(),
            patterns: self.ctx.patterns(),
            last_event_id: self.ctx.cursor.last_id().to_owned(),
        }
    }

    pub fn occupied(&self) -> bool {
        self.ctx.occupied()
    }

    pub fn sensors(&self) -> &SensorTable {
        self.ctx.sensors()
    }

    pub fn patterns(&self) -> LedPatterns {
        self.ctx.patterns()
    }

    pub fn last_event_id(&self) -> &str {
        self.ctx.cursor.last_id()
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn resync_pending(&self) -> bool {
        self.schedule.resync_pending()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn poll_proximity(&mut self, hw: &mut impl DevicePorts, sink: &mut impl EventSink) {
        let outcome = self
            .api
            .fetch_proximity(hw)
            .map_err(Error::from)
            .and_then(|body| Ok(proximity::process_payload(&body, &mut self.ctx.cursor)?));

        match outcome {
            Ok(transitions) => {
                sink.emit(&AppEvent::RequestSucceeded(Endpoint::Proximity));
                for transition in transitions {
                    self.apply_transition(transition, hw, sink);
                }
                if self.config.request_feedback {
                    self.flash(FLASH_SUCCESS, hw.now_ms());
                }
            }
            Err(e) => {
                warn!("Proximity poll failed: {e}");
                sink.emit(&AppEvent::RequestFailed(Endpoint::Proximity, e));
                if self.config.request_feedback {
                    self.flash(FLASH_ERROR, hw.now_ms());
                }
            }
        }
    }

    fn apply_transition(&mut self, transition: Transition, hw: &mut impl DevicePorts, sink: &mut impl EventSink) {
        match transition {
            Transition::Entered(event) => {
                info!("User ENTERED {} - proximity LED on", event.location_name);
                self.ctx.set_occupied(true);
                sink.emit(&AppEvent::UserEntered {
                    event_id: event.id,
                    location: event.location_name,
                });
                match self.actuation.on_enter(&self.api, hw) {
                    Ok(report) => {
                        if report.issued > 0 {
                            let at = hw.now_ms() + u64::from(self.config.settle_delay_ms);
                            self.schedule.request_resync(at);
                        }
                        sink.emit(&AppEvent::ActuationFinished(report));
                    }
                    Err(e) => {
                        warn!("Bulk activation aborted: {e}");
                        sink.emit(&AppEvent::RequestFailed(Endpoint::Sensors, e));
                    }
                }
            }
            Transition::Exited(event) => {
                info!("User EXITED {} - proximity LED off", event.location_name);
                self.ctx.set_occupied(false);
                sink.emit(&AppEvent::UserExited {
                    event_id: event.id,
                    location: event.location_name,
                });
                match self.actuation.on_exit(&self.api, hw, &mut self.ctx) {
                    Ok(report) => sink.emit(&AppEvent::ActuationFinished(report)),
                    Err(e) => {
                        warn!("Bulk deactivation aborted: {e}");
                        sink.emit(&AppEvent::RequestFailed(Endpoint::Sensors, e));
                    }
                }
            }
        }
    }

    fn poll_sensors(&mut self, hw: &mut impl DevicePorts, sink: &mut impl EventSink) {
        let outcome = self
            .api
            .fetch_sensors(hw)
            .map_err(Error::from)
            .and_then(|body| Ok(sensors::decode_sensor_list(&body)?));

        match outcome {
            Ok(records) => {
                let table = SensorTable::from_records(&records);
                self.ctx.replace_sensors(table);
                let patterns = self.ctx.patterns();
                debug!("Sensors: {table} -> {patterns}");
                sink.emit(&AppEvent::SensorsRefreshed { table, patterns });
            }
            Err(e) => {
                warn!("Sensor poll failed: {e}");
                sink.emit(&AppEvent::RequestFailed(Endpoint::Sensors, e));
            }
        }
    }

    /// Compute and write the three LED levels.
    fn drive_indicators(&mut self, link_up: bool, hw: &mut impl DevicePorts) -> IndicatorOutputs {
        let now = hw.now_ms();
        let flash = self.ctx.feedback.level(now);
        let occupied = self.ctx.occupied();
        let patterns = self.ctx.patterns();

        // Only the pattern LEDs go dark while the link is down.
        let [a, b] = if link_up {
            self.ctx.blink.advance(patterns, occupied, now)
        } else {
            self.ctx.blink.force_off();
            [false, false]
        };
        let outputs = IndicatorOutputs {
            proximity: flash.unwrap_or(occupied),
            pattern_a: a,
            pattern_b: b,
        };

        hw.set_indicators(outputs);
        outputs
    }

    fn flash(&mut self, flash: Flash, now_ms: u64) {
        self.ctx.feedback.start(flash, now_ms);
    }

    fn apply_config(&mut self, config: DeviceConfig, hw: &mut impl DevicePorts) -> Result<(), Error> {
        config.validate()?;
        // Pin polarity is fixed when the LED drivers are built at boot.
        if config.led_active_low != self.config.led_active_low {
            return Err(Error::Config("led_active_low cannot change at runtime"));
        }
        if config.wifi_ssid != self.config.wifi_ssid || config.wifi_password != self.config.wifi_password {
            hw.set_credentials(&config.wifi_ssid, &config.wifi_password)?;
            info!("WiFi credentials updated, used on next reconnect");
        }
        hw.set_timeout_ms(config.http_timeout_ms);
        self.api = RemoteApi::from_config(&config);
        self.schedule
            .apply_config(config.proximity_interval_ms, config.sensor_interval_ms);
        self.link
            .apply_config(config.reconnect_poll_interval_ms, config.reconnect_max_polls);
        self.actuation.set_spacing_ms(config.command_spacing_ms);
        self.config = config;
        info!("Configuration updated at runtime");
        Ok(())
    }
}
