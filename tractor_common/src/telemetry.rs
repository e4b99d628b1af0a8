//! Telemetry snapshots and the per-cycle output record.
//!
//! The sensor collaborator delivers one [`TelemetryFrame`] per tick; a
//! field that failed to decode upstream arrives as `None` and the
//! supervisor retains the last-known value instead of treating the cycle
//! as erroneous. [`Telemetry`] is the merged full snapshot the safety
//! supervisor evaluates. [`TelemetryRecord`] is the aggregated record the
//! supervisor emits to the transport once per cycle.

use serde::{Deserialize, Serialize};

use crate::state::{CuttingState, SafetyMode, TrailerStatus};

// ─── Inbound ────────────────────────────────────────────────────────

/// Full telemetry snapshot consumed by one safety evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Battery charge [%], 0..=100.
    pub battery_pct: f64,
    /// Motor temperature [°C].
    pub motor_temperature_c: f64,
    /// Ground speed [km/h].
    pub speed_kph: f64,
    /// Emergency-stop input level as sampled this tick.
    pub estop_pressed: bool,
}

impl Default for Telemetry {
    fn default() -> Self {
        // Power-on values before the first sensor tick arrives.
        Self {
            battery_pct: 100.0,
            motor_temperature_c: 25.0,
            speed_kph: 0.0,
            estop_pressed: false,
        }
    }
}

/// Partial per-tick sensor frame. `None` = upstream decode failure; the
/// supervisor keeps the last-known value for that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub battery_pct: Option<f64>,
    pub motor_temperature_c: Option<f64>,
    pub speed_kph: Option<f64>,
    pub estop_pressed: Option<bool>,
}

impl TelemetryFrame {
    /// Build a frame with every field present.
    pub fn full(battery_pct: f64, motor_temperature_c: f64, speed_kph: f64, estop: bool) -> Self {
        Self {
            battery_pct: Some(battery_pct),
            motor_temperature_c: Some(motor_temperature_c),
            speed_kph: Some(speed_kph),
            estop_pressed: Some(estop),
        }
    }

    /// Merge this frame into a last-known snapshot.
    pub fn merge_into(&self, last: &mut Telemetry) {
        if let Some(v) = self.battery_pct {
            last.battery_pct = v;
        }
        if let Some(v) = self.motor_temperature_c {
            last.motor_temperature_c = v;
        }
        if let Some(v) = self.speed_kph {
            last.speed_kph = v;
        }
        if let Some(v) = self.estop_pressed {
            last.estop_pressed = v;
        }
    }
}

// ─── Outbound ───────────────────────────────────────────────────────

/// Aggregated per-cycle record emitted to the telemetry transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Battery charge [%].
    pub battery: f64,
    /// Ground speed [km/h] (last-known or estimated).
    pub speed: f64,
    /// Motor temperature [°C].
    pub motor_temperature: f64,
    /// Active safety mode.
    pub safety_mode: SafetyMode,
    /// Cutting motor state.
    pub cutting_status: CuttingState,
    /// Trailer mechanism status.
    pub trailer_status: TrailerStatus,
}

// ─── Tests ──────────────────────────────────────────────────────────
