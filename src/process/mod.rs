//! Process-matching engine.
//!
//! This module provides:
//! - `scanner`: PID entry discovery under the process root
//! - `query`: query string and match mode selection
//! - `resolver`: per-process identity resolution (exe link or cmdline)
//! - `matcher`: the match driver applying quiet/single-shot policy

pub mod matcher;
pub mod query;
pub mod resolver;
pub mod scanner;

// Re-export commonly used types
pub use matcher::{Matcher, Matches, RunError, ScanOptions, ScanOutcome, DEFAULT_PROC_ROOT};
pub use query::{MatchMode, Query};
pub use resolver::{
    bounded_entry_path, invocation_basename, resolve_exe, resolve_invocation_name, Skip,
    CMDLINE_READ_LIMIT, ENTRY_PATH_CAPACITY,
};
pub use scanner::{collect_proc_entries, ProcEntry, ProcScanner, ScanError};
