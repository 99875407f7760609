//! Integration tests for the proximity poll → occupancy → indicator path.

use crate::mock_device::{MockDevice, RecordingSink, ok, status};

use geoentry::app::events::AppEvent;
use geoentry::app::service::{AppService, TickReport};
use geoentry::config::DeviceConfig;
use geoentry::error::{Error, TransportError};
use geoentry::remote::Endpoint;

const PROXIMITY_URL: &str =
    "https://geoentry-edge-api.onrender.com/api/v1/7b4cdbcd-2bf0-4047-9355-05e33babf2c9";

fn boot(hw: &mut MockDevice, config: DeviceConfig) -> (AppService, RecordingSink) {
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(config);
    app.start(hw, &mut sink);
    // t = 0: link reported up, nothing due yet.
    app.run_tick(hw, &mut sink);
    (app, sink)
}

fn tick_at(app: &mut AppService, hw: &mut MockDevice, sink: &mut RecordingSink, t: u64) -> TickReport {
    hw.now = t;
    app.run_tick(hw, sink)
}

fn quiet() -> DeviceConfig {
    DeviceConfig {
        request_feedback: false,
        ..DeviceConfig::default()
    }
}

fn entered(e: &AppEvent) -> bool {
    matches!(e, AppEvent::UserEntered { .. })
}

fn exited(e: &AppEvent) -> bool {
    matches!(e, AppEvent::UserExited { .. })
}

// ── Polling cadence ──────────────────────────────────────────

#[test]
fn proximity_is_polled_on_its_interval() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = boot(&mut hw, quiet());
    assert!(hw.gets().is_empty(), "nothing is due at boot");

    let report = tick_at(&mut app, &mut hw, &mut sink, 4_999);
    assert!(!report.proximity_polled);

    let report = tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(report.proximity_polled);
    assert_eq!(hw.gets(), vec![PROXIMITY_URL]);

    let report = tick_at(&mut app, &mut hw, &mut sink, 9_999);
    assert!(!report.proximity_polled);
}

// ── Enter / duplicate ────────────────────────────────────────

#[test]
fn duplicate_enter_triggers_once() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[{"event_id":"A","event_type":"enter","home_location_name":"Casa"}]"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(app.occupied());
    assert!(sink.events.contains(&AppEvent::UserEntered {
        event_id: "A".into(),
        location: "Casa".into(),
    }));

    tick_at(&mut app, &mut hw, &mut sink, 10_000);
    assert!(app.occupied());
    assert_eq!(sink.count(entered), 1, "repeated id must not re-trigger Enter");
}

#[test]
fn enter_then_exit_toggles_occupancy() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[{"event_id":"A","event_type":"enter"}]"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(app.occupied());

    hw.proximity = ok(r#"[{"event_id":"B","event_type":"exit"}]"#);
    tick_at(&mut app, &mut hw, &mut sink, 10_000);
    assert!(!app.occupied());
    assert_eq!(app.last_event_id(), "B");
    assert_eq!(sink.count(exited), 1);
}

// ── Payload shapes ───────────────────────────────────────────

#[test]
fn bare_array_only_processes_first_element() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[
        {"event_id":"B","event_type":"exit"},
        {"event_id":"A","event_type":"enter"}
    ]"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert_eq!(app.last_event_id(), "B");
    assert!(!app.occupied());
    assert_eq!(sink.count(entered), 0);
}

#[test]
fn data_wrapper_processes_every_element_in_order() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"{"data":[
        {"event_id":"A","event_type":"enter"},
        {"event_id":"B","event_type":"exit"}
    ]}"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert_eq!(app.last_event_id(), "B");
    assert!(!app.occupied());

    let entered_at = sink.events.iter().position(entered);
    let exited_at = sink.events.iter().position(exited);
    assert!(entered_at.is_some() && exited_at.is_some());
    assert!(entered_at < exited_at);
}

#[test]
fn single_object_with_fallback_id_is_processed() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"{"id":"X9","event_type":"enter","location_name":"Oficina"}"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(app.occupied());
    assert!(sink.events.contains(&AppEvent::UserEntered {
        event_id: "X9".into(),
        location: "Oficina".into(),
    }));
}

#[test]
fn unknown_event_type_advances_cursor_only() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[{"event_id":"D","event_type":"dwell"}]"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert_eq!(app.last_event_id(), "D");
    assert!(!app.occupied());
    assert_eq!(sink.count(entered) + sink.count(exited), 0);
    assert!(hw.puts().is_empty());
}

// ── Failures keep prior state ────────────────────────────────

#[test]
fn decode_failure_leaves_state_untouched() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[{"event_id":"A","event_type":"enter"}]"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());
    tick_at(&mut app, &mut hw, &mut sink, 5_000);

    hw.proximity = ok(r#"[{"event_id":"B","event_type":"ex"#);
    tick_at(&mut app, &mut hw, &mut sink, 10_000);

    assert!(app.occupied());
    assert_eq!(app.last_event_id(), "A");
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::RequestFailed(Endpoint::Proximity, Error::Decode(_))
    )));
}

#[test]
fn non_success_status_is_a_failed_poll() {
    let mut hw = MockDevice::new();
    hw.proximity = status(503);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    let report = tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(report.proximity_polled, "a failed poll still counts as polled");
    assert_eq!(app.last_event_id(), "");
    assert!(sink.events.contains(&AppEvent::RequestFailed(
        Endpoint::Proximity,
        Error::Transport(TransportError::Status(503)),
    )));

    // The timer restarted, so the next attempt waits a full interval.
    assert!(!tick_at(&mut app, &mut hw, &mut sink, 9_999).proximity_polled);
    assert!(tick_at(&mut app, &mut hw, &mut sink, 10_000).proximity_polled);
}

// ── Indicator LEDs ───────────────────────────────────────────

#[test]
fn proximity_led_follows_occupancy() {
    let mut hw = MockDevice::new();
    hw.proximity = ok(r#"[{"event_id":"A","event_type":"enter"}]"#);
    let (mut app, mut sink) = boot(&mut hw, quiet());

    let report = tick_at(&mut app, &mut hw, &mut sink, 5_000);
    assert!(report.outputs.proximity);
    assert!(hw.leds().proximity);

    hw.proximity = ok(r#"[{"event_id":"B","event_type":"exit"}]"#);
    let report = tick_at(&mut app, &mut hw, &mut sink, 10_000);
    assert!(!report.outputs.proximity);
    assert!(!report.outputs.pattern_a && !report.outputs.pattern_b);
}

#[test]
fn failed_poll_flashes_error_pattern() {
    let mut hw = MockDevice::new();
    hw.proximity = status(500);
    let (mut app, mut sink) = boot(&mut hw, DeviceConfig::default());

    let mut levels = Vec::new();
    for t in (5_000..=6_000).step_by(200) {
        levels.push(tick_at(&mut app, &mut hw, &mut sink, t).outputs.proximity);
    }
    assert_eq!(levels, vec![true, false, true, false, true, false]);

    // Burst over: back to the (unoccupied) steady state.
    assert!(!tick_at(&mut app, &mut hw, &mut sink, 6_200).outputs.proximity);
}

#[test]
fn successful_poll_flashes_once() {
    let mut hw = MockDevice::new();
    let (mut app, mut sink) = boot(&mut hw, DeviceConfig::default());

    assert!(tick_at(&mut app, &mut hw, &mut sink, 5_000).outputs.proximity);
    assert!(!tick_at(&mut app, &mut hw, &mut sink, 5_100).outputs.proximity);
    assert!(!tick_at(&mut app, &mut hw, &mut sink, 5_250).outputs.proximity);
}
