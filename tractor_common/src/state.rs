//! State enums for the supervisor core.
//!
//! All enums use `#[repr(u8)]` for compact layout and stable wire values in
//! the telemetry record. `LatchedFaults` tracks the safety conditions that
//! persist until an explicit operator reset.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ─── Safety Mode ────────────────────────────────────────────────────

/// Global safety mode owned by the safety supervisor.
///
/// `EmergencyStopped` is entered by the estop edge or an over-temperature
/// fault and exits only via an explicit external reset. `LowBatteryDerate`
/// and `SpeedLimited` clear automatically once the condition recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SafetyMode {
    /// All safety conditions satisfied, derate factor 1.0.
    Normal = 0,
    /// Battery below minimum — all setpoints halved.
    LowBatteryDerate = 1,
    /// Reported speed above limit — proportional derate.
    SpeedLimited = 2,
    /// Latching fault active — all setpoints forced to zero.
    EmergencyStopped = 3,
}

impl SafetyMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::LowBatteryDerate),
            2 => Some(Self::SpeedLimited),
            3 => Some(Self::EmergencyStopped),
            _ => None,
        }
    }

    /// Whether actuator commands must be refused in this mode.
    #[inline]
    pub const fn blocks_actuators(&self) -> bool {
        matches!(self, Self::EmergencyStopped)
    }
}

impl Default for SafetyMode {
    fn default() -> Self {
        Self::Normal
    }
}

// ─── Latched Faults ─────────────────────────────────────────────────

bitflags! {
    /// Latching safety faults.
    ///
    /// Any set bit forces `SafetyMode::EmergencyStopped` and survives
    /// telemetry recovery; only `SafetySupervisor::reset` clears them,
    /// and only while the underlying condition is physically false.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LatchedFaults: u8 {
        /// Emergency-stop button edge observed.
        const ESTOP     = 0x01;
        /// Motor temperature exceeded the configured maximum.
        const OVER_TEMP = 0x02;
    }
}

impl Default for LatchedFaults {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── Cutting Motor ──────────────────────────────────────────────────

/// Cutting motor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CuttingState {
    /// Cutting mechanism stopped.
    Off = 0,
    /// Cutting mechanism running.
    On = 1,
}

impl CuttingState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }
}

impl Default for CuttingState {
    fn default() -> Self {
        Self::Off
    }
}

// ─── Trailer ────────────────────────────────────────────────────────

/// Loader/trailer mechanism status as reported in telemetry.
///
/// `Loading` and `Unloading` are only visible while a timed transition is
/// in flight; the resting states are `Empty` and `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TrailerStatus {
    /// Trailer empty, loader at rest.
    Empty = 0,
    /// Load sequence in flight.
    Loading = 1,
    /// Trailer loaded, loader at rest.
    Loaded = 2,
    /// Unload sequence in flight.
    Unloading = 3,
}

impl TrailerStatus {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Loading),
            2 => Some(Self::Loaded),
            3 => Some(Self::Unloading),
            _ => None,
        }
    }

    /// Whether this is a resting (settled) status.
    #[inline]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Empty | Self::Loaded)
    }
}

impl Default for TrailerStatus {
    fn default() -> Self {
        Self::Empty
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
