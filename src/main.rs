//! GeoEntry firmware entry point.
//!
//! Hexagonal architecture with a fixed-cadence tick loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  DeviceAdapter                                  LogEventSink   │
//! │  (WiFi · HTTP · LEDs · clock · delay)           (EventSink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  link · proximity · sensors · actuation · LEDs         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{info, warn};

use geoentry::adapters::device::{DeviceAdapter, IndicatorBank};
use geoentry::adapters::http::HttpAdapter;
use geoentry::adapters::log_sink::LogEventSink;
use geoentry::adapters::wifi::WifiAdapter;
use geoentry::app::commands::{AppCommand, CommandOutcome};
use geoentry::app::ports::{ClockPort, DevicePorts, EventSink};
use geoentry::app::service::AppService;
use geoentry::config::DeviceConfig;
use geoentry::pins;
use geoentry::scheduler::IntervalTimer;

/// Period of the `UpdateStatus` snapshot in the log.
const STATUS_INTERVAL_MS: u32 = 60_000;

type LedPin = PinDriver<'static, AnyOutputPin, Output>;

fn output_pin(gpio: i32) -> Result<LedPin> {
    // SAFETY: each GPIO number in `pins` is claimed exactly once, here.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

fn dispatch(
    app: &mut AppService,
    cmd: AppCommand,
    hw: &mut impl DevicePorts,
    sink: &mut impl EventSink,
) {
    match app.handle_command(cmd, hw, sink) {
        CommandOutcome::Done => {}
        CommandOutcome::Rejected(e) => warn!("Command rejected: {}", e),
        CommandOutcome::RestartRequested => {
            info!("Restarting...");
            unsafe { esp_idf_svc::sys::esp_restart() };
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GeoEntry v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (defaults + build-time overrides) ────
    let config = match DeviceConfig::from_build_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Build-time config rejected ({}), using defaults", e);
            DeviceConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut wifi = WifiAdapter::new();
    wifi.attach(EspWifi::new(peripherals.modem, sysloop, Some(nvs))?);

    let leds = IndicatorBank::new(
        output_pin(pins::PROXIMITY_LED_GPIO)?,
        output_pin(pins::PATTERN_LED_A_GPIO)?,
        output_pin(pins::PATTERN_LED_B_GPIO)?,
        config.led_active_low,
    )?;

    let mut hw = DeviceAdapter::new(wifi, HttpAdapter::new(config.http_timeout_ms), leds, FreeRtos);
    let mut log_sink = LogEventSink::new();

    // ── 4. App service ────────────────────────────────────────
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut log_sink);

    let mut status_timer = IntervalTimer::new(STATUS_INTERVAL_MS);

    info!("System ready. Entering tick loop.");

    // ── 5. Tick loop ──────────────────────────────────────────
    loop {
        app.run_tick(&mut hw, &mut log_sink);

        let now = hw.now_ms();
        if status_timer.is_due(now) {
            status_timer.reset(now);
            dispatch(&mut app, AppCommand::UpdateStatus, &mut hw, &mut log_sink);
        }

        FreeRtos::delay_ms(app.config().tick_interval_ms);
    }
}
