//! Configuration structures for the tractor supervisor.
//!
//! All config types use `serde::Deserialize` for TOML loading. The config
//! is loaded once at startup, validated, and immutable thereafter — safety
//! derating is expressed as a runtime factor, never by mutating limits.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Error Type ─────────────────────────────────────────────────────

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    IoError(String),

    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

// ─── Motor Limits ───────────────────────────────────────────────────

/// Normalized throttle range for a single actuator.
///
/// Asymmetric per actuator: the cutting motor is one-directional
/// (`min_speed = 0.0`), the drives and loader are bidirectional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActuatorLimits {
    /// Minimum commanded throttle (normalized, >= -1.0).
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,
    /// Maximum commanded throttle (normalized, <= 1.0).
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

fn default_min_speed() -> f64 {
    -1.0
}
fn default_max_speed() -> f64 {
    1.0
}

impl Default for ActuatorLimits {
    fn default() -> Self {
        Self {
            min_speed: -1.0,
            max_speed: 1.0,
        }
    }
}

impl ActuatorLimits {
    /// Clamp a commanded throttle into this actuator's range.
    #[inline]
    pub fn clamp(&self, throttle: f64) -> f64 {
        throttle.clamp(self.min_speed, self.max_speed)
    }
}

/// Per-actuator throttle limits for all four motors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotorLimits {
    /// Left drive motor.
    #[serde(default)]
    pub left_drive: ActuatorLimits,
    /// Right drive motor.
    #[serde(default)]
    pub right_drive: ActuatorLimits,
    /// Cutting motor (one-directional).
    #[serde(default = "default_cutting_limits")]
    pub cutting: ActuatorLimits,
    /// Loader motor (negative = unload direction).
    #[serde(default)]
    pub loader: ActuatorLimits,
}

fn default_cutting_limits() -> ActuatorLimits {
    ActuatorLimits {
        min_speed: 0.0,
        max_speed: 1.0,
    }
}

impl Default for MotorLimits {
    fn default() -> Self {
        Self {
            left_drive: ActuatorLimits::default(),
            right_drive: ActuatorLimits::default(),
            cutting: default_cutting_limits(),
            loader: ActuatorLimits::default(),
        }
    }
}

// ─── Safety Limits ──────────────────────────────────────────────────

/// Safety thresholds evaluated once per cadence tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum motor temperature [°C]. Exceeding latches an emergency stop.
    #[serde(default = "default_max_temperature")]
    pub max_temperature_c: f64,
    /// Minimum battery charge [%]. Below → half-speed derate.
    #[serde(default = "default_min_battery")]
    pub min_battery_pct: f64,
    /// Maximum ground speed [km/h]. Above → proportional derate.
    #[serde(default = "default_max_speed_kph")]
    pub max_speed_kph: f64,
    /// Minimum interval between full safety evaluations [s].
    #[serde(default = "default_check_interval")]
    pub check_interval_s: f64,
    /// Window within which duplicate estop edges are coalesced [s].
    #[serde(default = "default_estop_debounce")]
    pub estop_debounce_s: f64,
}

fn default_max_temperature() -> f64 {
    60.0
}
fn default_min_battery() -> f64 {
    20.0
}
fn default_max_speed_kph() -> f64 {
    10.0
}
fn default_check_interval() -> f64 {
    1.0
}
fn default_estop_debounce() -> f64 {
    0.3
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_temperature_c: 60.0,
            min_battery_pct: 20.0,
            max_speed_kph: 10.0,
            check_interval_s: 1.0,
            estop_debounce_s: 0.3,
        }
    }
}

// ─── Loader Config ──────────────────────────────────────────────────

/// Loader/trailer sequencing configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Duration of a load or unload sequence [s].
    #[serde(default = "default_load_duration")]
    pub load_duration_s: f64,
}

fn default_load_duration() -> f64 {
    2.0
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            load_duration_s: 2.0,
        }
    }
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level supervisor configuration.
///
/// Loaded from TOML at startup, immutable for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TractorConfig {
    /// Per-actuator throttle limits.
    #[serde(default)]
    pub motors: MotorLimits,
    /// Safety thresholds.
    #[serde(default)]
    pub safety: SafetyLimits,
    /// Loader sequencing parameters.
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl TractorConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, limits) in [
            ("left_drive", &self.motors.left_drive),
            ("right_drive", &self.motors.right_drive),
            ("cutting", &self.motors.cutting),
            ("loader", &self.motors.loader),
        ] {
            if !limits.min_speed.is_finite() || !limits.max_speed.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{name}: throttle range [{}, {}] must be finite",
                    limits.min_speed, limits.max_speed
                )));
            }
            if limits.min_speed > limits.max_speed {
                return Err(ConfigError::ValidationError(format!(
                    "{name}: min_speed {} > max_speed {}",
                    limits.min_speed, limits.max_speed
                )));
            }
            if limits.min_speed < -1.0 || limits.max_speed > 1.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name}: throttle range [{}, {}] outside [-1, 1]",
                    limits.min_speed, limits.max_speed
                )));
            }
        }

        // TOML accepts `nan`/`inf`; neither survives the threshold
        // comparisons below, so reject non-finite values up front.
        for (name, value) in [
            ("max_temperature_c", self.safety.max_temperature_c),
            ("min_battery_pct", self.safety.min_battery_pct),
            ("max_speed_kph", self.safety.max_speed_kph),
            ("check_interval_s", self.safety.check_interval_s),
            ("estop_debounce_s", self.safety.estop_debounce_s),
            ("load_duration_s", self.loader.load_duration_s),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.safety.max_temperature_c <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "max_temperature_c {} must be positive",
                self.safety.max_temperature_c
            )));
        }
        if !(0.0..=100.0).contains(&self.safety.min_battery_pct) {
            return Err(ConfigError::ValidationError(format!(
                "min_battery_pct {} out of range [0, 100]",
                self.safety.min_battery_pct
            )));
        }
        if self.safety.max_speed_kph <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "max_speed_kph {} must be positive",
                self.safety.max_speed_kph
            )));
        }
        if self.safety.check_interval_s <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "check_interval_s {} must be positive",
                self.safety.check_interval_s
            )));
        }
        if self.safety.estop_debounce_s < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "estop_debounce_s {} must not be negative",
                self.safety.estop_debounce_s
            )));
        }
        if self.loader.load_duration_s <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "load_duration_s {} must be positive",
                self.loader.load_duration_s
            )));
        }
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the supervisor configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<TractorConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
    load_config_from_str(&text)
}

/// Load config from a TOML string (used by tests and embedded defaults).
pub fn load_config_from_str(text: &str) -> Result<TractorConfig, ConfigError> {
    let config: TractorConfig =
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
