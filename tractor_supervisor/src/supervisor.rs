//! Per-cycle orchestration: telemetry in, setpoints and one record out.
//!
//! One control cycle accepts a (possibly partial) telemetry frame and at
//! most one pending operator command, runs the safety evaluation, applies
//! the resulting derate to motion and actuators, and emits the final
//! setpoint set plus one aggregated telemetry record. Command rejections
//! (`ActuatorBlocked`, `SequenceInProgress`) never abort a cycle — they
//! are logged and the cycle proceeds with its remaining actions.

use std::time::Instant;

use tracing::warn;

use tractor_common::command::{ActionKind, Command};
use tractor_common::config::{ConfigError, TractorConfig};
use tractor_common::error::ResetRejected;
use tractor_common::state::SafetyMode;
use tractor_common::telemetry::{Telemetry, TelemetryFrame, TelemetryRecord};

use crate::actuator::ActuatorSequencer;
use crate::estop::EstopSignal;
use crate::motion::MotionGovernor;
use crate::safety::SafetySupervisor;

// ─── Cycle Output ───────────────────────────────────────────────────

/// Final per-cycle setpoints for the actuator driver, each within its
/// actuator's configured throttle range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuatorSetpoints {
    pub left_drive: f64,
    pub right_drive: f64,
    pub cutting: f64,
    pub loader: f64,
}

/// Everything one cycle produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput {
    /// Setpoints for the actuator-driver collaborator.
    pub setpoints: ActuatorSetpoints,
    /// Aggregated record for the telemetry transport.
    pub record: TelemetryRecord,
    /// Speed implied by the drive setpoints [km/h], for simulation feeds.
    pub speed_estimate_kph: f64,
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycles: u64,
    /// Commands refused by the sequencer (blocked or busy).
    pub commands_rejected: u64,
    /// Estop edges consumed from the signal latch.
    pub estop_trips: u64,
}

// ─── Supervisor ─────────────────────────────────────────────────────

/// Top-level orchestrator owning the safety supervisor, motion governor
/// and actuator sequencer.
#[derive(Debug)]
pub struct Supervisor {
    config: TractorConfig,
    safety: SafetySupervisor,
    motion: MotionGovernor,
    actuators: ActuatorSequencer,
    estop: EstopSignal,
    /// Last-known merged telemetry; fields absent from a frame retain
    /// their previous value here.
    last_known: Telemetry,
    /// Last commanded movement intent, re-scaled by the current derate
    /// every cycle so safety changes act without a fresh command.
    intent: (f64, f64),
    stats: CycleStats,
}

impl Supervisor {
    /// Construct the supervisor from a validated configuration.
    ///
    /// This is the only fatal path in the system: an invalid config
    /// aborts initialization before the control loop starts.
    pub fn new(config: TractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            safety: SafetySupervisor::new(config.safety),
            motion: MotionGovernor::new(&config),
            actuators: ActuatorSequencer::new(&config),
            estop: EstopSignal::new(),
            last_known: Telemetry::default(),
            intent: (0.0, 0.0),
            stats: CycleStats::default(),
            config,
        })
    }

    /// Handle for the input-pin collaborator to deliver estop edges.
    pub fn estop_handle(&self) -> EstopSignal {
        self.estop.clone()
    }

    /// Cycle counters.
    #[inline]
    pub const fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Read access to the safety supervisor.
    #[inline]
    pub const fn safety(&self) -> &SafetySupervisor {
        &self.safety
    }

    /// Operator-initiated reset of latched faults, checked against the
    /// last-known telemetry.
    pub fn reset(&mut self) -> Result<(), ResetRejected> {
        self.safety.reset(&self.last_known)
    }

    /// Run one control cycle.
    pub fn cycle(
        &mut self,
        frame: TelemetryFrame,
        command: Option<Command>,
        now: Instant,
    ) -> CycleOutput {
        // Pending estop edge is applied before anything else this cycle.
        if self.estop.take() {
            self.safety.trip_estop(now);
            self.stats.estop_trips += 1;
        }

        frame.merge_into(&mut self.last_known);
        let mode = self.safety.evaluate(&self.last_known, now);
        let derate = self.safety.derate_factor();

        if let Some(command) = command {
            self.dispatch(command, mode, derate, now);
        }

        // Loader timing must advance every cycle, command or not.
        self.actuators.tick(now, mode, self.safety.derate_factor());

        let drive = self
            .motion
            .compute(self.intent.0, self.intent.1, self.safety.derate_factor());
        let (cutting, loader) = self.actuators.setpoints();

        let setpoints = ActuatorSetpoints {
            left_drive: self.config.motors.left_drive.clamp(drive.left),
            right_drive: self.config.motors.right_drive.clamp(drive.right),
            cutting,
            loader,
        };

        let record = TelemetryRecord {
            battery: self.last_known.battery_pct,
            speed: self.last_known.speed_kph,
            motor_temperature: self.last_known.motor_temperature_c,
            safety_mode: self.safety.mode(),
            cutting_status: self.actuators.cutting_state(),
            trailer_status: self.actuators.trailer_status(),
        };

        self.stats.cycles += 1;
        CycleOutput {
            setpoints,
            record,
            speed_estimate_kph: drive.speed_estimate_kph,
        }
    }

    fn dispatch(&mut self, command: Command, mode: SafetyMode, derate: f64, now: Instant) {
        let result = match command {
            Command::Movement { x, y } => {
                self.intent = (x, y);
                Ok(())
            }
            Command::Action { action } => match action {
                ActionKind::StartCutting => self.actuators.start_cutting(mode, derate),
                ActionKind::StopCutting => self.actuators.stop_cutting(mode),
                ActionKind::LoadTrailer => self.actuators.begin_load(now, mode),
                ActionKind::UnloadTrailer => self.actuators.begin_unload(now, mode),
            },
        };

        if let Err(e) = result {
            self.stats.commands_rejected += 1;
            warn!(?command, error = %e, "command rejected, cycle continues");
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
