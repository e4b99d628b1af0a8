//! Integration test: a full simulated work session.
//!
//! Runs a multi-minute scripted scenario at 10 Hz through the public
//! supervisor interface: drive out, mow, load the trailer, suffer a low
//! battery, hit the estop, recover, and drive home.

use std::time::{Duration, Instant};

use tractor_common::command::{ActionKind, Command};
use tractor_common::config::TractorConfig;
use tractor_common::state::{CuttingState, SafetyMode, TrailerStatus};
use tractor_common::telemetry::TelemetryFrame;
use tractor_supervisor::supervisor::{CycleOutput, Supervisor};

const TICK: Duration = Duration::from_millis(100);

/// Drives the supervisor with a simulated vehicle: speed follows the
/// previous cycle's estimate, battery drains slowly.
struct Session {
    supervisor: Supervisor,
    now: Instant,
    battery_pct: f64,
    speed_kph: f64,
    temperature_c: f64,
}

impl Session {
    fn new() -> Self {
        Self {
            supervisor: Supervisor::new(TractorConfig::default()).unwrap(),
            now: Instant::now(),
            battery_pct: 100.0,
            speed_kph: 0.0,
            temperature_c: 25.0,
        }
    }

    fn step(&mut self, command: Option<Command>) -> CycleOutput {
        self.now += TICK;
        self.battery_pct = (self.battery_pct - 0.01).max(0.0);
        let frame = TelemetryFrame::full(
            self.battery_pct,
            self.temperature_c,
            self.speed_kph,
            false,
        );
        let out = self.supervisor.cycle(frame, command, self.now);
        self.speed_kph = out.speed_estimate_kph;
        out
    }

    fn run(&mut self, cycles: usize) -> CycleOutput {
        let mut out = self.step(None);
        for _ in 1..cycles {
            out = self.step(None);
        }
        out
    }
}

#[test]
fn scripted_work_session() {
    let mut session = Session::new();

    // Power-on settles in Normal with everything at rest.
    let out = session.run(5);
    assert_eq!(out.record.safety_mode, SafetyMode::Normal);
    assert_eq!(out.setpoints.left_drive, 0.0);

    // Drive out at 80% throttle and start mowing.
    session.step(Some(Command::Movement { x: 0.0, y: 0.8 }));
    let out = session.step(Some(Command::Action {
        action: ActionKind::StartCutting,
    }));
    assert_eq!(out.record.cutting_status, CuttingState::On);
    let out = session.run(20);
    assert!((out.setpoints.left_drive - 0.8).abs() < 1e-9);
    assert!((out.record.speed - 8.0).abs() < 1e-9);

    // Stop, load the trailer, carry on.
    session.step(Some(Command::Movement { x: 0.0, y: 0.0 }));
    let out = session.step(Some(Command::Action {
        action: ActionKind::LoadTrailer,
    }));
    assert_eq!(out.record.trailer_status, TrailerStatus::Loading);
    let out = session.run(25); // 2.5 s > the 2 s sequence
    assert_eq!(out.record.trailer_status, TrailerStatus::Loaded);

    // Battery collapses mid-field: half speed, cutter derated but running.
    session.battery_pct = 12.0;
    session.step(Some(Command::Movement { x: 0.0, y: 1.0 }));
    let out = session.run(15);
    assert_eq!(out.record.safety_mode, SafetyMode::LowBatteryDerate);
    assert_eq!(out.setpoints.left_drive, 0.5);
    assert_eq!(out.setpoints.cutting, 0.5);
    assert_eq!(out.record.cutting_status, CuttingState::On);

    // Operator slams the estop.
    session.supervisor.estop_handle().trip();
    let out = session.run(10);
    assert_eq!(out.record.safety_mode, SafetyMode::EmergencyStopped);
    assert_eq!(out.setpoints.left_drive, 0.0);
    assert_eq!(out.setpoints.cutting, 0.0);
    assert_eq!(out.record.speed, 0.0);
    // The loaded trailer keeps its settled status through the stop.
    assert_eq!(out.record.trailer_status, TrailerStatus::Loaded);

    // Swap in a fresh battery and reset.
    session.battery_pct = 95.0;
    session.supervisor.reset().unwrap();
    let out = session.run(15);
    assert_eq!(out.record.safety_mode, SafetyMode::Normal);
    // Drive intent and cutting survive the stop and resume at full scale.
    assert_eq!(out.setpoints.left_drive, 1.0);
    assert_eq!(out.setpoints.cutting, 1.0);

    // Drive home and shut the cutter down.
    let out = session.step(Some(Command::Action {
        action: ActionKind::StopCutting,
    }));
    assert_eq!(out.record.cutting_status, CuttingState::Off);
    session.step(Some(Command::Movement { x: 0.0, y: 0.0 }));
    let out = session.run(10);
    assert_eq!(out.setpoints.left_drive, 0.0);
    assert_eq!(out.setpoints.cutting, 0.0);

    let stats = session.supervisor.stats();
    assert_eq!(stats.estop_trips, 1);
    assert_eq!(stats.commands_rejected, 0);
    assert!(stats.cycles > 100);
}

#[test]
fn speed_feedback_never_triggers_the_speed_limiter() {
    // The estimate is derived from derated setpoints, so a closed loop on
    // it can reach but never exceed the configured maximum.
    let mut session = Session::new();
    session.step(Some(Command::Movement { x: 0.0, y: 1.0 }));
    for _ in 0..50 {
        let out = session.step(None);
        assert_ne!(out.record.safety_mode, SafetyMode::SpeedLimited);
        assert!(out.speed_estimate_kph <= 10.0 + 1e-9);
    }
}
