//! Operator command types.
//!
//! Commands arrive from the external transport already decoded into these
//! types; serde deserialization mirrors the transport JSON layout
//! (`{"type": "movement", "x": .., "y": ..}` and
//! `{"type": "action", "action": "start_cutting"}`). Unknown types or
//! action names fail deserialization and are dropped by the transport shim
//! before reaching the core.

use serde::{Deserialize, Serialize};

/// Actuator action requested by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Spin up the cutting motor.
    StartCutting,
    /// Stop the cutting motor.
    StopCutting,
    /// Begin the timed trailer load sequence.
    LoadTrailer,
    /// Begin the timed trailer unload sequence.
    UnloadTrailer,
}

/// Discriminated operator command.
///
/// At most one command is dispatched per control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Joystick-style movement intent. Axes nominally in [-1, 1] but not
    /// trusted — the motion governor clamps before use.
    Movement { x: f64, y: f64 },
    /// Actuator action request.
    Action { action: ActionKind },
}

// ─── Tests ──────────────────────────────────────────────────────────
