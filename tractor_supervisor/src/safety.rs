//! Safety evaluation and the emergency/derate state machine.
//!
//! Priority order, first match wins, checked once per cadence tick:
//! 1. estop level (latching, bypasses the cadence gate, never debounced)
//! 2. over-temperature (latching, treated like a manual stop)
//! 3. low battery → derate 0.5 (auto-clearing)
//! 4. over-speed → proportional derate (auto-clearing)
//! 5. normal → derate 1.0
//!
//! Latching faults persist until an explicit [`SafetySupervisor::reset`],
//! which is rejected while the underlying condition is still physically
//! true. Transitions into and out of `EmergencyStopped` are logged once,
//! not every tick.

use std::time::Instant;

use tracing::{debug, info, warn};

use tractor_common::config::SafetyLimits;
use tractor_common::error::ResetRejected;
use tractor_common::state::{LatchedFaults, SafetyMode};
use tractor_common::telemetry::Telemetry;

/// Guard against division by a zero speed report.
const SPEED_EPSILON: f64 = 1e-6;

/// Evaluates telemetry against the configured safety limits and owns the
/// emergency/derate state machine.
#[derive(Debug, Clone)]
pub struct SafetySupervisor {
    limits: SafetyLimits,
    mode: SafetyMode,
    derate_factor: f64,
    faults: LatchedFaults,
    /// Cadence gate: time of the last full evaluation.
    last_check: Option<Instant>,
    /// Time of the last accepted estop edge, for bounce coalescing.
    last_trip: Option<Instant>,
}

impl SafetySupervisor {
    /// Create a new supervisor in `Normal` mode.
    pub fn new(limits: SafetyLimits) -> Self {
        Self {
            limits,
            mode: SafetyMode::Normal,
            derate_factor: 1.0,
            faults: LatchedFaults::empty(),
            last_check: None,
            last_trip: None,
        }
    }

    /// Current safety mode.
    #[inline]
    pub const fn mode(&self) -> SafetyMode {
        self.mode
    }

    /// Active multiplicative derate factor in [0, 1].
    #[inline]
    pub const fn derate_factor(&self) -> f64 {
        self.derate_factor
    }

    /// Currently latched faults.
    #[inline]
    pub const fn faults(&self) -> LatchedFaults {
        self.faults
    }

    /// Whether a latching fault is active.
    #[inline]
    pub const fn is_emergency_stopped(&self) -> bool {
        !self.faults.is_empty()
    }

    /// Apply an asynchronous estop edge immediately.
    ///
    /// This is the immediate-apply path distinct from the cadence-gated
    /// evaluation: an emergency signal is never held until the next
    /// scheduled check. Edges arriving within `estop_debounce_s` of the
    /// previous accepted edge are treated as switch bounce and coalesced.
    pub fn trip_estop(&mut self, now: Instant) {
        if self.faults.contains(LatchedFaults::ESTOP) {
            return; // already latched
        }
        if let Some(prev) = self.last_trip {
            let since = now.duration_since(prev).as_secs_f64();
            if since < self.limits.estop_debounce_s {
                debug!(since_s = since, "estop edge coalesced as switch bounce");
                return;
            }
        }
        self.last_trip = Some(now);
        self.latch(LatchedFaults::ESTOP, "emergency stop edge");
    }

    /// Evaluate one telemetry snapshot.
    ///
    /// Effective at most once per `check_interval_s`: calls arriving
    /// sooner return the previously computed mode unchanged. The
    /// estop-pressed check bypasses the gate.
    pub fn evaluate(&mut self, telemetry: &Telemetry, now: Instant) -> SafetyMode {
        // Rule 1: estop level, always evaluated regardless of cadence.
        // The sampled level is authoritative and never debounced — bounce
        // coalescing applies only to the asynchronous edge path.
        if telemetry.estop_pressed {
            self.last_trip = Some(now);
            self.latch(LatchedFaults::ESTOP, "emergency stop level");
            return self.mode;
        }

        // Cadence gate for everything below.
        if let Some(last) = self.last_check {
            if now.duration_since(last).as_secs_f64() < self.limits.check_interval_s {
                return self.mode;
            }
        }
        self.last_check = Some(now);

        // Rule 2: over-temperature latches exactly like a manual stop.
        if telemetry.motor_temperature_c > self.limits.max_temperature_c {
            self.latch(LatchedFaults::OVER_TEMP, "motor over-temperature");
        }

        // A latched fault pins the mode until reset, whatever the rest of
        // the telemetry says.
        if !self.faults.is_empty() {
            return self.mode;
        }

        // Rules 3-5: auto-clearing conditions.
        if telemetry.battery_pct < self.limits.min_battery_pct {
            self.set_mode(SafetyMode::LowBatteryDerate, 0.5);
        } else if telemetry.speed_kph > self.limits.max_speed_kph {
            let factor = (self.limits.max_speed_kph
                / telemetry.speed_kph.max(SPEED_EPSILON))
            .clamp(0.0, 1.0);
            self.set_mode(SafetyMode::SpeedLimited, factor);
        } else {
            self.set_mode(SafetyMode::Normal, 1.0);
        }

        self.mode
    }

    /// Operator-initiated reset of latched faults.
    ///
    /// Fails with [`ResetRejected`] while any latching condition is still
    /// physically true in the supplied telemetry; otherwise clears the
    /// latch and restores `Normal` / derate 1.0.
    pub fn reset(&mut self, telemetry: &Telemetry) -> Result<(), ResetRejected> {
        let mut still_active = LatchedFaults::empty();
        if telemetry.estop_pressed {
            still_active |= LatchedFaults::ESTOP;
        }
        if telemetry.motor_temperature_c > self.limits.max_temperature_c {
            still_active |= LatchedFaults::OVER_TEMP;
        }
        if !still_active.is_empty() {
            warn!(?still_active, "reset rejected: latching condition still active");
            return Err(ResetRejected {
                faults: still_active,
            });
        }

        self.faults = LatchedFaults::empty();
        self.set_mode(SafetyMode::Normal, 1.0);
        info!("safety system reset, returning to normal operation");
        Ok(())
    }

    /// Latch a fault and force `EmergencyStopped`.
    fn latch(&mut self, fault: LatchedFaults, reason: &'static str) {
        let newly = !self.faults.contains(fault);
        self.faults |= fault;
        if newly {
            warn!(reason, faults = ?self.faults, "EMERGENCY STOP engaged");
            self.set_mode(SafetyMode::EmergencyStopped, 0.0);
        }
    }

    /// Apply a mode/derate pair, logging emergency exits once.
    fn set_mode(&mut self, mode: SafetyMode, derate: f64) {
        if self.mode != mode {
            if self.mode == SafetyMode::EmergencyStopped {
                info!(to = ?mode, "leaving emergency stop");
            } else if mode != SafetyMode::EmergencyStopped {
                debug!(from = ?self.mode, to = ?mode, derate, "safety mode change");
            }
        }
        self.mode = mode;
        self.derate_factor = derate;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
