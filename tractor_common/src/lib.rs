//! Tractor Common Library
//!
//! Shared leaf types for the tractor supervisor workspace: immutable
//! configuration, safety/actuator state enums, operator command types,
//! telemetry records, and the core error taxonomy.
//!
//! # Module Structure
//!
//! - [`config`] - TOML configuration loading and validation
//! - [`state`] - Safety mode, cutting and trailer state enums, latched faults
//! - [`command`] - Operator command types (movement / action)
//! - [`telemetry`] - Telemetry snapshots and the per-cycle output record
//! - [`error`] - Recoverable error types surfaced by the supervisor core

pub mod command;
pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
