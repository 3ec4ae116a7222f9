//! Match driver combining enumeration, identity resolution and comparison.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::process::query::{MatchMode, Query};
use crate::process::resolver::{resolve_exe, resolve_invocation_name, Skip};
use crate::process::scanner::{ProcEntry, ProcScanner, ScanError};

/// Default location of the process table.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Caller policy applied while draining matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Suppress per-match output.
    pub quiet: bool,
    /// Stop after the first match.
    pub single_shot: bool,
}

/// Result of a completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub matched: usize,
    pub skipped: usize,
    pub stopped_early: bool,
}

impl ScanOutcome {
    /// True iff at least one process matched.
    pub fn found(&self) -> bool {
        self.matched > 0
    }
}

/// Finds processes whose identity equals a query.
#[derive(Debug, Clone)]
pub struct Matcher {
    root: PathBuf,
    query: Query,
}

impl Matcher {
    pub fn new(root: impl Into<PathBuf>, query: Query) -> Self {
        Self {
            root: root.into(),
            query,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Resolves the identity compared for `entry` under the query's mode.
    pub fn identity(&self, entry: &ProcEntry) -> Result<Vec<u8>, Skip> {
        match self.query.mode() {
            MatchMode::Path => resolve_exe(&self.root, &entry.name),
            MatchMode::Name => resolve_invocation_name(&self.root, &entry.name),
        }
    }

    /// Lazily yields matching entries in directory order.
    pub fn matches(&self) -> Result<Matches<'_>, ScanError> {
        let scanner = ProcScanner::open(&self.root)?;
        Ok(Matches {
            matcher: self,
            scanner,
            skipped: 0,
        })
    }

    /// Runs a full scan, writing one PID per line to `out` unless quiet.
    ///
    /// Write failures on `out` abort the scan like a fatal error would.
    pub fn run<W: Write>(&self, options: &ScanOptions, out: &mut W) -> Result<ScanOutcome, RunError> {
        debug!(
            "Scanning {} for {} '{}'",
            self.root().display(),
            self.query().mode(),
            self.query()
        );

        let mut matches = self.matches()?;
        let mut outcome = ScanOutcome::default();

        for entry in matches.by_ref() {
            outcome.matched += 1;
            if !options.quiet {
                writeln!(out, "{}", entry.name)?;
            }
            if options.single_shot {
                outcome.stopped_early = true;
                break;
            }
        }
        outcome.skipped = matches.skipped();
        out.flush()?;

        debug!(
            "Scan finished: matched={} skipped={} stopped_early={}",
            outcome.matched, outcome.skipped, outcome.stopped_early
        );
        Ok(outcome)
    }
}

/// Errors from [`Matcher::run`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to write match: {0}")]
    Output(#[from] io::Error),
}

/// Iterator over the entries matching a [`Matcher`]'s query.
#[derive(Debug)]
pub struct Matches<'a> {
    matcher: &'a Matcher,
    scanner: ProcScanner,
    skipped: usize,
}

impl Matches<'_> {
    /// Number of candidates dropped because their identity could not be resolved.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Matches<'_> {
    type Item = ProcEntry;

    fn next(&mut self) -> Option<ProcEntry> {
        for entry in self.scanner.by_ref() {
            match self.matcher.identity(&entry) {
                Ok(identity) if self.matcher.query.matches(&identity) => return Some(entry),
                Ok(_) => {}
                Err(skip) => {
                    trace!("Skipping {}: {}", entry.name, skip);
                    self.skipped += 1;
                }
            }
        }
        None
    }
}
