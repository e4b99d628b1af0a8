//! Recoverable error types surfaced by the supervisor core.
//!
//! None of these abort a control cycle: rejections are logged and the
//! cycle proceeds with its remaining independent actions. The only fatal
//! condition in the system is invalid configuration at startup, covered by
//! [`crate::config::ConfigError`].

use thiserror::Error;

use crate::state::LatchedFaults;

/// Reset attempted while a latching fault condition is still physically
/// present. Surfaced to the operator; the latch stays set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reset rejected: latching fault still active ({faults:?})")]
pub struct ResetRejected {
    /// The faults whose underlying condition is still true.
    pub faults: LatchedFaults,
}

/// Actuator command rejection. Recoverable — logged, cycle continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActuatorError {
    /// Command refused because the supervisor is emergency-stopped.
    #[error("actuator blocked: emergency stop active")]
    Blocked,
    /// Loader command refused because a timed sequence is in flight.
    #[error("loader sequence already in progress")]
    SequenceInProgress,
}

// ─── Tests ──────────────────────────────────────────────────────────
