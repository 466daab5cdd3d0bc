//! Process exit codes.

pub const OK: i32 = 0;
/// A requested transition failed (validation, registry or transport).
pub const TRANSITION_FAILED: i32 = 1;
/// Setup problem: store, configuration or arguments.
pub const CONFIG_ERROR: i32 = 2;
