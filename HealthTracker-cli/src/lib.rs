// HealthTracker CLI lib.rs
//
// Argument parsing and command execution for the `health-tracker` binary.
// Kept in a library so it can be tested without spawning a process.

pub mod commands;

pub use commands::{execute, run, Command, EntityKind, Invocation, USAGE};
