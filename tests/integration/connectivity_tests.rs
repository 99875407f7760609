//! Integration tests for link supervision and the command surface.

use crate::mock_device::{MockDevice, RecordingSink, ok};

use geoentry::app::commands::{AppCommand, CommandOutcome};
use geoentry::app::events::AppEvent;
use geoentry::app::ports::IndicatorOutputs;
use geoentry::app::service::{AppService, TickReport};
use geoentry::config::DeviceConfig;
use geoentry::connectivity::LinkState;
use geoentry::error::{Error, LinkError};

fn start(hw: &mut MockDevice, config: DeviceConfig) -> (AppService, RecordingSink) {
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(config);
    app.start(hw, &mut sink);
    (app, sink)
}

fn tick_at(app: &mut AppService, hw: &mut MockDevice, sink: &mut RecordingSink, t: u64) -> TickReport {
    hw.now = t;
    app.run_tick(hw, sink)
}

fn short_cycles() -> DeviceConfig {
    DeviceConfig {
        reconnect_max_polls: 3,
        ..DeviceConfig::default()
    }
}

// ── Boot ─────────────────────────────────────────────────────

#[test]
fn start_pushes_config_and_darkens_leds() {
    let mut hw = MockDevice::offline();
    let (_app, sink) = start(&mut hw, DeviceConfig::default());

    assert_eq!(hw.credentials, Some(("Wokwi-GUEST".into(), String::new())));
    assert_eq!(hw.timeout_ms, Some(10_000));
    assert_eq!(hw.connects, 1);
    assert_eq!(hw.disconnects, 0, "boot must not tear down a link first");
    assert_eq!(hw.indicator_writes.first().copied(), Some(IndicatorOutputs::DARK));
    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
}

#[test]
fn link_that_comes_up_on_connect_is_reported_once_polled() {
    let mut hw = MockDevice::offline();
    hw.connect_succeeds = true;
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());

    // Inside the poll spacing: not yet checked.
    assert!(!tick_at(&mut app, &mut hw, &mut sink, 100).link_up);
    assert!(tick_at(&mut app, &mut hw, &mut sink, 500).link_up);
    assert_eq!(sink.count(|e| *e == AppEvent::WifiConnected), 1);
    assert_eq!(app.link_state(), LinkState::Connected);
}

// ── Gating ───────────────────────────────────────────────────

#[test]
fn no_polling_while_link_is_down() {
    let mut hw = MockDevice::offline();
    hw.proximity = ok(r#"[{"event_id":"A","event_type":"enter"}]"#);
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());

    for t in (0..=20_000).step_by(500) {
        let report = tick_at(&mut app, &mut hw, &mut sink, t);
        assert!(!report.link_up);
        assert!(!report.proximity_polled && !report.sensors_polled);
    }
    assert!(hw.gets().is_empty());
    assert!(!app.occupied());
}

#[test]
fn polling_resumes_after_recovery() {
    let mut hw = MockDevice::offline();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(hw.gets().is_empty());

    hw.link_up = true;
    let report = tick_at(&mut app, &mut hw, &mut sink, 5_500);
    assert!(report.link_up);
    assert!(report.proximity_polled, "overdue poll runs on the first up tick");
}

// ── Loss and reconnect cycles ────────────────────────────────

#[test]
fn link_loss_emits_disconnect_and_starts_a_cycle() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    tick_at(&mut app, &mut hw, &mut sink, 0);
    assert_eq!(app.link_state(), LinkState::Connected);

    hw.link_up = false;
    hw.connect_succeeds = false;
    let report = tick_at(&mut app, &mut hw, &mut sink, 1_000);

    assert!(!report.link_up);
    assert!(sink.events.contains(&AppEvent::WifiDisconnected));
    assert_eq!((hw.disconnects, hw.connects), (1, 1));
    assert!(!report.outputs.pattern_a && !report.outputs.pattern_b);
    // Error flash on the proximity LED.
    assert!(report.outputs.proximity);
    assert!(!tick_at(&mut app, &mut hw, &mut sink, 1_200).outputs.proximity);
}

#[test]
fn proximity_led_keeps_showing_occupancy_while_down() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[{"event_id":"A","event_type":"enter"}]"#);
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    tick_at(&mut app, &mut hw, &mut sink, 0);
    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(app.occupied());

    hw.link_up = false;
    hw.connect_succeeds = false;
    tick_at(&mut app, &mut hw, &mut sink, 6_000);

    // Error flash (3 x 200 ms) is over by 7 200.
    let report = tick_at(&mut app, &mut hw, &mut sink, 7_200);
    assert!(!report.link_up);
    assert!(report.outputs.proximity);
    assert!(!report.outputs.pattern_a && !report.outputs.pattern_b);
}

#[test]
fn exhausted_cycle_restarts_on_next_tick() {
    let mut hw = MockDevice::offline();
    let (mut app, mut sink) = start(&mut hw, short_cycles());
    assert_eq!(hw.connects, 1);

    tick_at(&mut app, &mut hw, &mut sink, 500);
    tick_at(&mut app, &mut hw, &mut sink, 1_000);
    assert!(matches!(app.link_state(), LinkState::Reconnecting { polls: 2, .. }));

    tick_at(&mut app, &mut hw, &mut sink, 1_500);
    assert_eq!(app.link_state(), LinkState::Down);
    assert_eq!(hw.connects, 1);

    tick_at(&mut app, &mut hw, &mut sink, 1_600);
    assert_eq!(hw.connects, 2, "a fresh cycle starts on the following tick");
    assert!(matches!(app.link_state(), LinkState::Reconnecting { polls: 0, .. }));
}

#[test]
fn polls_respect_spacing() {
    let mut hw = MockDevice::offline();
    let (mut app, mut sink) = start(&mut hw, short_cycles());

    for t in [100, 200, 300, 400] {
        tick_at(&mut app, &mut hw, &mut sink, t);
    }
    assert!(matches!(app.link_state(), LinkState::Reconnecting { polls: 0, .. }));
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn poll_commands_are_rejected_while_down() {
    let mut hw = MockDevice::offline();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());

    for cmd in [AppCommand::CheckProximity, AppCommand::CheckSensors] {
        assert_eq!(
            app.handle_command(cmd, &mut hw, &mut sink),
            CommandOutcome::Rejected(Error::Link(LinkError::Down))
        );
    }
    assert!(hw.gets().is_empty());
}

#[test]
fn reconnect_command_restarts_association_when_down() {
    let mut hw = MockDevice::offline();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());

    app.handle_command(AppCommand::ReconnectWifi, &mut hw, &mut sink);
    assert_eq!((hw.disconnects, hw.connects), (1, 2));
}

#[test]
fn reconnect_command_is_a_no_op_when_up() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    tick_at(&mut app, &mut hw, &mut sink, 0);

    app.handle_command(AppCommand::ReconnectWifi, &mut hw, &mut sink);
    assert_eq!((hw.disconnects, hw.connects), (0, 0));
}

#[test]
fn status_command_emits_snapshot() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    tick_at(&mut app, &mut hw, &mut sink, 0);
    hw.now = 42_000;

    app.handle_command(AppCommand::UpdateStatus, &mut hw, &mut sink);
    let Some(AppEvent::Status(snapshot)) = sink.events.last() else {
        panic!("expected a status event, got {:?}", sink.events.last());
    };
    assert_eq!(snapshot.uptime_ms, 42_000);
    assert_eq!(snapshot.tick_count, 1);
    assert!(snapshot.link_up);
    assert_eq!(snapshot.rssi, Some(-55));
    assert!(!snapshot.occupied);
}

#[test]
fn config_update_pushes_credentials_and_intervals() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    tick_at(&mut app, &mut hw, &mut sink, 0);

    let mut config = DeviceConfig::default();
    config
        .set_wifi_credentials("HomeNet", "correct-horse")
        .expect("valid credentials");
    config.set_check_interval(2_000).expect("valid interval");
    config.http_timeout_ms = 4_000;

    assert_eq!(
        app.handle_command(AppCommand::UpdateConfig(config), &mut hw, &mut sink),
        CommandOutcome::Done
    );
    assert_eq!(hw.credentials, Some(("HomeNet".into(), "correct-horse".into())));
    assert_eq!(hw.timeout_ms, Some(4_000));
    assert!(tick_at(&mut app, &mut hw, &mut sink, 2_000).proximity_polled);
}

#[test]
fn reset_requests_restart_without_side_effects() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = start(&mut hw, DeviceConfig::default());
    let writes = hw.indicator_writes.len();

    assert_eq!(
        app.handle_command(AppCommand::ResetSystem, &mut hw, &mut sink),
        CommandOutcome::RestartRequested
    );
    assert_eq!(hw.indicator_writes.len(), writes);
    assert!(hw.calls.is_empty());
}
