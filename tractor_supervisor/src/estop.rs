//! Emergency-stop edge signal.
//!
//! The input-pin collaborator delivers the estop edge from an interrupt
//! context. That context may only flip this atomic latch — all safety
//! state mutation happens synchronously inside the control loop that owns
//! the [`crate::safety::SafetySupervisor`]. Single producer, single
//! consumer: the loop drains the latch at the top of every cycle, before
//! the scheduled safety evaluation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to the shared estop latch.
#[derive(Debug, Clone, Default)]
pub struct EstopSignal {
    flag: Arc<AtomicBool>,
}

impl EstopSignal {
    /// Create a new unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an estop edge. Safe to call from any context; never blocks.
    #[inline]
    pub fn trip(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Consume a pending edge. Returns `true` at most once per edge.
    #[inline]
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }

    /// Peek without consuming.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
