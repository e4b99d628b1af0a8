//! # Tractor Supervisor Library
//!
//! Onboard control supervisor for an autonomous differential-drive field
//! tractor with a cutting implement and a loader/trailer mechanism. The
//! core is a reactive gate and sequencer: every actuator command is gated
//! against temperature, battery, speed and emergency-stop conditions
//! before a setpoint leaves the supervisor.
//!
//! ## Architecture
//!
//! 1. **SafetySupervisor** — cadence-gated safety evaluation, latching
//!    estop/over-temperature faults, multiplicative derate factor
//! 2. **MotionGovernor** — differential-drive mixing of joystick intent
//! 3. **ActuatorSequencer** — cutting on/off plus the loader's timed
//!    load/unload sequence, preempted by emergency stop
//! 4. **Supervisor** — per-cycle orchestrator producing actuator
//!    setpoints and one aggregated telemetry record
//!
//! ## Control Cycle
//!
//! One cycle = one telemetry tick, driven by an external periodic source.
//! The emergency-stop edge arrives through [`estop::EstopSignal`], an
//! atomic latch set from the input-pin context and consumed at the top of
//! the next cycle — the one path that bypasses the safety cadence gate.
//! All core operations are synchronous, non-blocking transformations over
//! in-memory state; no cycle allocates on the hot path.

pub mod actuator;
pub mod estop;
pub mod motion;
pub mod safety;
pub mod supervisor;
