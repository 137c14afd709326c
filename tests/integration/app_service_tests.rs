//! Integration tests for the AppService acquisition → filter → indicator
//! pipeline and its command replies.

use crate::mock_hw::{MockHardware, RecordingSink, failed_primary, primary};

use thermobox::app::commands::AppCommand;
use thermobox::app::events::AppEvent;
use thermobox::app::reading::Reading;
use thermobox::app::service::AppService;
use thermobox::config::SystemConfig;
use thermobox::drivers::indicator::{Brightness, Colour, Status};

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::healthy(20.0, 50.0, 22.0);
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn telemetry(app: &mut AppService, sink: &mut RecordingSink) -> String {
    app.handle_line(b"", sink).as_str().to_owned()
}

// ── Start-up ─────────────────────────────────────────────────

#[test]
fn blue_shown_exactly_once_before_first_cycle() {
    let (mut app, mut hw, mut sink) = make_app();
    assert_eq!(hw.pushes, [(Colour::Blue, Brightness::Bright)]);

    for _ in 0..5 {
        app.acquire(&mut hw, &mut sink);
    }
    let blues = hw.pushes.iter().filter(|(c, _)| *c == Colour::Blue).count();
    assert_eq!(blues, 1);
}

#[test]
fn telemetry_before_first_cycle_is_all_nan() {
    let (mut app, _hw, mut sink) = make_app();
    assert_eq!(telemetry(&mut app, &mut sink), "0\tNaN\tNaN\tNaN");
}

// ── Worked scenarios ─────────────────────────────────────────

#[test]
fn first_two_cycles_match_reference_output() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.queue(primary(20.0, 50.0)).queue(primary(21.0, 50.0));

    app.acquire(&mut hw, &mut sink);
    assert_eq!(telemetry(&mut app, &mut sink), "1\t20.000\t50.0\t22.00");

    app.acquire(&mut hw, &mut sink);
    assert_eq!(telemetry(&mut app, &mut sink), "2\t20.050\t50.0\t22.00");
}

#[test]
fn failed_primary_read_turns_red_and_reports_nan() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.queue(primary(20.0, 50.0))
        .queue(primary(21.0, 50.0))
        .queue(failed_primary());

    app.acquire(&mut hw, &mut sink);
    app.acquire(&mut hw, &mut sink);
    app.acquire(&mut hw, &mut sink);

    assert_eq!(hw.last_push().map(|(c, _)| c), Some(Colour::Red));
    assert_eq!(telemetry(&mut app, &mut sink), "3\tNaN\tNaN\t22.00");
}

#[test]
fn humidity_failure_alone_is_a_fault() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.queue(thermobox::app::reading::PrimaryReading {
        temperature: Reading::Valid(20.0),
        humidity: Reading::Unavailable,
    });
    let snap = app.acquire(&mut hw, &mut sink);
    assert_eq!(hw.last_push().map(|(c, _)| c), Some(Colour::Red));
    // Temperature still flows through the filter.
    assert_eq!(snap.primary_temp_filtered, Reading::Valid(20.0));
    assert!(snap.humidity.is_unavailable());
}

#[test]
fn filter_skips_failed_cycle_and_resumes() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.queue(primary(20.0, 50.0))
        .queue(primary(21.0, 50.0))
        .queue(failed_primary())
        .queue(primary(20.0, 50.0));
    for _ in 0..4 {
        app.acquire(&mut hw, &mut sink);
    }
    // 0.95 * 20.05 + 0.05 * 20.0
    let v = app.snapshot().primary_temp_filtered.value().unwrap();
    assert!((v - 20.0475).abs() < 1e-3, "{v}");
    assert_eq!(hw.last_push().map(|(c, _)| c), Some(Colour::Green));
}

#[test]
fn disconnected_probe_reports_nan_field() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.secondary = Reading::Unavailable;
    app.acquire(&mut hw, &mut sink);
    assert_eq!(telemetry(&mut app, &mut sink), "1\t20.000\t50.0\tNaN");
}

// ── Heartbeat ────────────────────────────────────────────────

#[test]
fn heartbeat_alternates_from_dim() {
    let (mut app, mut hw, mut sink) = make_app();
    for _ in 0..4 {
        app.acquire(&mut hw, &mut sink);
    }
    let cycle_pushes: Vec<_> = hw.pushes[1..].to_vec();
    assert_eq!(
        cycle_pushes,
        [
            (Colour::Green, Brightness::Dim),
            (Colour::Green, Brightness::Bright),
            (Colour::Green, Brightness::Dim),
            (Colour::Green, Brightness::Bright),
        ]
    );
}

#[test]
fn heartbeat_keeps_toggling_through_faults() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.queue(primary(20.0, 50.0)).queue(failed_primary());
    app.acquire(&mut hw, &mut sink);
    app.acquire(&mut hw, &mut sink);
    assert_eq!(hw.pushes[1], (Colour::Green, Brightness::Dim));
    assert_eq!(hw.pushes[2], (Colour::Red, Brightness::Bright));
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn identify_always_returns_identity() {
    let (mut app, mut hw, mut sink) = make_app();
    assert_eq!(app.handle_line(b"id?", &mut sink).as_str(), "Arduino, E. coli sauna");
    app.acquire(&mut hw, &mut sink);
    assert_eq!(app.handle_line(b"id?", &mut sink).as_str(), "Arduino, E. coli sauna");
}

#[test]
fn unknown_and_binary_lines_get_telemetry() {
    let (mut app, mut hw, mut sink) = make_app();
    app.acquire(&mut hw, &mut sink);
    for line in [&b"ID?"[..], b"hello", b"\xff\x00\x80", b"id? "] {
        let reply = app.handle_line(line, &mut sink);
        let fields: Vec<&str> = reply.split('\t').collect();
        assert_eq!(fields.len(), 4, "{reply}");
        assert!(fields.iter().all(|f| !f.is_empty()));
    }
}

#[test]
fn custom_identity_is_used() {
    let mut config = SystemConfig::default();
    config.device_id.clear();
    config.device_id.push_str("bench unit 2").unwrap();
    let mut app = AppService::new(config);
    let mut sink = RecordingSink::new();
    assert_eq!(app.handle_line(b"id?", &mut sink).as_str(), "bench unit 2");
}

// ── Events ───────────────────────────────────────────────────

#[test]
fn events_trace_the_lifecycle() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.queue(primary(20.0, 50.0)).queue(failed_primary());
    app.acquire(&mut hw, &mut sink);
    app.acquire(&mut hw, &mut sink);
    app.handle_line(b"id?", &mut sink);

    assert!(matches!(sink.events[0], AppEvent::Started { .. }));
    let changes: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StatusChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        [
            (Status::Initializing, Status::Healthy),
            (Status::Healthy, Status::Faulted),
        ]
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::CommandHandled(AppCommand::Identify))
    );
}
