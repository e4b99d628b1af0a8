//! Differential-drive command translation.
//!
//! Pure function of (movement intent, derate factor): no persistent state
//! beyond the configured speed scale. Joystick axes are clamped to [-1, 1]
//! before mixing; the derate factor is applied after mixing and clamping
//! so it always strictly reduces magnitude and can never re-expand a
//! clamped value.

use tractor_common::config::TractorConfig;

/// Per-side drive setpoints plus the resulting speed estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// Left drive throttle, normalized.
    pub left: f64,
    /// Right drive throttle, normalized.
    pub right: f64,
    /// Estimated ground speed [km/h] at these throttles.
    pub speed_estimate_kph: f64,
}

/// Converts operator movement intent into per-side drive setpoints.
#[derive(Debug, Clone)]
pub struct MotionGovernor {
    /// Speed scale: full throttle maps to this many km/h.
    max_speed_kph: f64,
}

impl MotionGovernor {
    pub fn new(config: &TractorConfig) -> Self {
        Self {
            max_speed_kph: config.safety.max_speed_kph,
        }
    }

    /// Mix joystick axes into left/right throttles.
    ///
    /// `left = clamp(y + x)`, `right = clamp(y - x)`, both scaled by
    /// `derate_factor` last. Out-of-range inputs are clamped, not
    /// rejected; the worst case result is all-zero.
    pub fn compute(&self, x: f64, y: f64, derate_factor: f64) -> DriveCommand {
        let x = x.clamp(-1.0, 1.0);
        let y = y.clamp(-1.0, 1.0);

        let left = (y + x).clamp(-1.0, 1.0) * derate_factor;
        let right = (y - x).clamp(-1.0, 1.0) * derate_factor;

        DriveCommand {
            left,
            right,
            speed_estimate_kph: left.abs().max(right.abs()) * self.max_speed_kph,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
