//! Cutting motor and loader/trailer sequencing.
//!
//! The cutting motor is a plain on/off actuator whose throttle follows the
//! active derate factor. The loader runs timed load/unload sequences:
//! `Idle → TimedTransition{target, deadline}`, completed by `tick` once the
//! deadline passes. Emergency stop preempts a transition in flight —
//! throttle zero, back to `Idle` immediately, never waiting for the
//! deadline.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use tractor_common::config::{ActuatorLimits, TractorConfig};
use tractor_common::error::ActuatorError;
use tractor_common::state::{CuttingState, SafetyMode, TrailerStatus};

/// Loader sequencing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderSequence {
    /// Loader at rest, throttle zero.
    Idle,
    /// Timed transition toward a settled trailer status.
    TimedTransition {
        /// `Loaded` for a load, `Empty` for an unload.
        target: TrailerStatus,
        /// Moment the loader returns to rest.
        deadline: Instant,
    },
}

/// Sequences the cutting motor and the loader mechanism, gated by the
/// active safety mode.
#[derive(Debug, Clone)]
pub struct ActuatorSequencer {
    cutting_limits: ActuatorLimits,
    loader_limits: ActuatorLimits,
    load_duration: Duration,
    cutting: CuttingState,
    sequence: LoaderSequence,
    /// Last settled trailer status; in-flight status is derived from the
    /// active sequence target.
    trailer: TrailerStatus,
    cutting_throttle: f64,
    loader_throttle: f64,
}

impl ActuatorSequencer {
    /// Create a new sequencer with everything at rest.
    pub fn new(config: &TractorConfig) -> Self {
        Self {
            cutting_limits: config.motors.cutting,
            loader_limits: config.motors.loader,
            load_duration: Duration::from_secs_f64(config.loader.load_duration_s),
            cutting: CuttingState::Off,
            sequence: LoaderSequence::Idle,
            trailer: TrailerStatus::Empty,
            cutting_throttle: 0.0,
            loader_throttle: 0.0,
        }
    }

    /// Cutting motor state.
    #[inline]
    pub const fn cutting_state(&self) -> CuttingState {
        self.cutting
    }

    /// Current loader sequencing state.
    #[inline]
    pub const fn sequence(&self) -> LoaderSequence {
        self.sequence
    }

    /// Trailer status as reported in telemetry: the in-flight direction
    /// while a transition runs, the last settled status otherwise.
    pub fn trailer_status(&self) -> TrailerStatus {
        match self.sequence {
            LoaderSequence::TimedTransition {
                target: TrailerStatus::Loaded,
                ..
            } => TrailerStatus::Loading,
            LoaderSequence::TimedTransition { .. } => TrailerStatus::Unloading,
            LoaderSequence::Idle => self.trailer,
        }
    }

    /// Current (cutting, loader) throttles.
    #[inline]
    pub const fn setpoints(&self) -> (f64, f64) {
        (self.cutting_throttle, self.loader_throttle)
    }

    /// Start the cutting motor. Idempotent; refused while emergency-stopped.
    ///
    /// The commanded throttle follows the derate factor on every tick, so
    /// cutting degrades under low battery without being blocked by it.
    pub fn start_cutting(&mut self, mode: SafetyMode, derate: f64) -> Result<(), ActuatorError> {
        if mode.blocks_actuators() {
            return Err(ActuatorError::Blocked);
        }
        if self.cutting == CuttingState::Off {
            info!("cutting motor started");
        }
        self.cutting = CuttingState::On;
        self.cutting_throttle = self.cutting_limits.clamp(self.cutting_limits.max_speed * derate);
        Ok(())
    }

    /// Stop the cutting motor. Idempotent; refused while emergency-stopped.
    pub fn stop_cutting(&mut self, mode: SafetyMode) -> Result<(), ActuatorError> {
        if mode.blocks_actuators() {
            return Err(ActuatorError::Blocked);
        }
        if self.cutting == CuttingState::On {
            info!("cutting motor stopped");
        }
        self.cutting = CuttingState::Off;
        self.cutting_throttle = 0.0;
        Ok(())
    }

    /// Begin the timed load sequence.
    pub fn begin_load(&mut self, now: Instant, mode: SafetyMode) -> Result<(), ActuatorError> {
        self.begin_transition(now, mode, TrailerStatus::Loaded)
    }

    /// Begin the timed unload sequence.
    pub fn begin_unload(&mut self, now: Instant, mode: SafetyMode) -> Result<(), ActuatorError> {
        self.begin_transition(now, mode, TrailerStatus::Empty)
    }

    fn begin_transition(
        &mut self,
        now: Instant,
        mode: SafetyMode,
        target: TrailerStatus,
    ) -> Result<(), ActuatorError> {
        if mode.blocks_actuators() {
            return Err(ActuatorError::Blocked);
        }
        if matches!(self.sequence, LoaderSequence::TimedTransition { .. }) {
            return Err(ActuatorError::SequenceInProgress);
        }
        let deadline = now + self.load_duration;
        self.sequence = LoaderSequence::TimedTransition { target, deadline };
        info!(?target, duration_s = self.load_duration.as_secs_f64(), "loader sequence started");
        Ok(())
    }

    /// Advance loader timing and refresh throttles.
    ///
    /// Must run at least once per control cycle. Emergency stop aborts a
    /// transition in flight immediately; otherwise a transition completes
    /// once `now >= deadline`, applying the resting throttle of zero.
    pub fn tick(&mut self, now: Instant, mode: SafetyMode, derate: f64) {
        if mode.blocks_actuators() {
            if let LoaderSequence::TimedTransition { target, .. } = self.sequence {
                warn!(?target, "loader sequence aborted by emergency stop");
                self.sequence = LoaderSequence::Idle;
            }
            self.cutting_throttle = 0.0;
            self.loader_throttle = 0.0;
            return;
        }

        self.cutting_throttle = match self.cutting {
            CuttingState::On => self.cutting_limits.clamp(self.cutting_limits.max_speed * derate),
            CuttingState::Off => 0.0,
        };

        self.loader_throttle = match self.sequence {
            LoaderSequence::Idle => 0.0,
            LoaderSequence::TimedTransition { target, deadline } => {
                if now >= deadline {
                    self.sequence = LoaderSequence::Idle;
                    self.trailer = target;
                    info!(?target, "loader sequence complete");
                    0.0
                } else {
                    let base = match target {
                        TrailerStatus::Loaded => self.loader_limits.max_speed,
                        _ => self.loader_limits.min_speed,
                    };
                    self.loader_limits.clamp(base * derate)
                }
            }
        };
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
