//! CLI command implementations for fpid.
//!
//! - `check`: process table and permission validation

pub mod check;

pub use check::command_check;
