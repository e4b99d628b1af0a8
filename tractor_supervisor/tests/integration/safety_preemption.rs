//! Integration test: safety preemption across the full cycle path.
//!
//! Validates estop latching through recovery, over-temperature latching,
//! and derate propagation into drive and actuator setpoints over many
//! cycles.

use std::time::{Duration, Instant};

use tractor_common::command::{ActionKind, Command};
use tractor_common::config::TractorConfig;
use tractor_common::state::SafetyMode;
use tractor_common::telemetry::TelemetryFrame;
use tractor_supervisor::supervisor::Supervisor;

fn supervisor() -> Supervisor {
    Supervisor::new(TractorConfig::default()).unwrap()
}

fn nominal() -> TelemetryFrame {
    TelemetryFrame::full(80.0, 30.0, 5.0, false)
}

#[test]
fn estop_latch_holds_until_reset_then_full_recovery() {
    let mut supervisor = supervisor();
    let t0 = Instant::now();

    // Drive forward at full throttle with the cutter running.
    supervisor.cycle(nominal(), Some(Command::Movement { x: 0.0, y: 1.0 }), t0);
    let out = supervisor.cycle(
        nominal(),
        Some(Command::Action {
            action: ActionKind::StartCutting,
        }),
        t0 + Duration::from_millis(100),
    );
    assert_eq!(out.setpoints.left_drive, 1.0);
    assert_eq!(out.setpoints.cutting, 1.0);

    // Estop edge arrives asynchronously between cycles.
    supervisor.estop_handle().trip();
    let out = supervisor.cycle(nominal(), None, t0 + Duration::from_millis(200));
    assert_eq!(out.record.safety_mode, SafetyMode::EmergencyStopped);
    assert_eq!(out.setpoints.left_drive, 0.0);
    assert_eq!(out.setpoints.right_drive, 0.0);
    assert_eq!(out.setpoints.cutting, 0.0);

    // Telemetry is fully nominal for many cycles; the latch holds anyway.
    for i in 3..20 {
        let out = supervisor.cycle(nominal(), None, t0 + Duration::from_millis(100 * i));
        assert_eq!(out.record.safety_mode, SafetyMode::EmergencyStopped);
        assert_eq!(out.setpoints.left_drive, 0.0);
    }

    // Operator reset restores operation, including the persisted drive
    // intent and the cutting state set before the stop.
    supervisor.reset().unwrap();
    let out = supervisor.cycle(nominal(), None, t0 + Duration::from_secs(5));
    assert_eq!(out.record.safety_mode, SafetyMode::Normal);
    assert_eq!(out.setpoints.left_drive, 1.0);
    assert_eq!(out.setpoints.cutting, 1.0);
}

#[test]
fn over_temperature_behaves_like_a_manual_stop() {
    let mut supervisor = supervisor();
    let t0 = Instant::now();
    supervisor.cycle(nominal(), Some(Command::Movement { x: 0.0, y: 0.8 }), t0);

    let out = supervisor.cycle(
        TelemetryFrame::full(80.0, 72.0, 5.0, false),
        None,
        t0 + Duration::from_secs(2),
    );
    assert_eq!(out.record.safety_mode, SafetyMode::EmergencyStopped);

    // Cooling down does not clear the latch by itself.
    let out = supervisor.cycle(nominal(), None, t0 + Duration::from_secs(4));
    assert_eq!(out.record.safety_mode, SafetyMode::EmergencyStopped);

    // But once cool, a reset is accepted.
    supervisor.reset().unwrap();
    let out = supervisor.cycle(nominal(), None, t0 + Duration::from_secs(6));
    assert_eq!(out.record.safety_mode, SafetyMode::Normal);
    assert!((out.setpoints.left_drive - 0.8).abs() < 1e-12);
}

#[test]
fn derates_track_telemetry_without_new_commands() {
    let mut supervisor = supervisor();
    let t0 = Instant::now();
    supervisor.cycle(nominal(), Some(Command::Movement { x: 0.0, y: 1.0 }), t0);

    // Battery collapses: half speed on the next cadence tick.
    let out = supervisor.cycle(
        TelemetryFrame::full(10.0, 30.0, 5.0, false),
        None,
        t0 + Duration::from_secs(2),
    );
    assert_eq!(out.record.safety_mode, SafetyMode::LowBatteryDerate);
    assert_eq!(out.setpoints.left_drive, 0.5);

    // Battery recovers but the vehicle is rolling downhill at 20 km/h:
    // proportional derate 10/20.
    let out = supervisor.cycle(
        TelemetryFrame::full(80.0, 30.0, 20.0, false),
        None,
        t0 + Duration::from_secs(4),
    );
    assert_eq!(out.record.safety_mode, SafetyMode::SpeedLimited);
    assert!((out.setpoints.left_drive - 0.5).abs() < 1e-9);

    // Everything nominal again: full authority restored automatically.
    let out = supervisor.cycle(nominal(), None, t0 + Duration::from_secs(6));
    assert_eq!(out.record.safety_mode, SafetyMode::Normal);
    assert_eq!(out.setpoints.left_drive, 1.0);
}

#[test]
fn cadence_gate_defers_condition_changes_within_the_interval() {
    let mut supervisor = supervisor();
    let t0 = Instant::now();
    supervisor.cycle(nominal(), Some(Command::Movement { x: 0.0, y: 1.0 }), t0);

    // 200 ms later the battery is low, but the gate holds Normal.
    let out = supervisor.cycle(
        TelemetryFrame::full(10.0, 30.0, 5.0, false),
        None,
        t0 + Duration::from_millis(200),
    );
    assert_eq!(out.record.safety_mode, SafetyMode::Normal);
    assert_eq!(out.setpoints.left_drive, 1.0);

    // The estop edge is never gated.
    supervisor.estop_handle().trip();
    let out = supervisor.cycle(nominal(), None, t0 + Duration::from_millis(400));
    assert_eq!(out.record.safety_mode, SafetyMode::EmergencyStopped);
}
