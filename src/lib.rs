//! fpid library
//!
//! Finds running processes by program name or executable path by walking the
//! process table exposed under `/proc`.
//!
//! A query containing `/` is compared against the target of each process's
//! `exe` link. Any other query is compared against the basename of argv[0]
//! as recorded in `cmdline`. Comparison is always exact.
//!
//! # Usage
//!
//! ```no_run
//! use fpid::{Matcher, Query, ScanOptions, DEFAULT_PROC_ROOT};
//!
//! let matcher = Matcher::new(DEFAULT_PROC_ROOT, Query::new("sshd"));
//!
//! // Lazily iterate over matching PIDs
//! for entry in matcher.matches()? {
//!     println!("{}", entry.name);
//! }
//!
//! // Or apply quiet/single-shot policy and write PIDs to a sink
//! let options = ScanOptions { quiet: false, single_shot: true };
//! let outcome = matcher.run(&options, &mut std::io::stdout())?;
//! println!("found: {}", outcome.found());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod process;

// Re-export main types for convenience
pub use process::{
    MatchMode, Matcher, ProcEntry, Query, RunError, ScanError, ScanOptions, ScanOutcome,
    DEFAULT_PROC_ROOT,
};
