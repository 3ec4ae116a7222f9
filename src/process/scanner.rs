//! Process scanning utilities for discovering PID entries in /proc.
//!
//! The scanner walks the process root exactly once, in whatever order the
//! directory listing provides, and yields every entry whose name starts
//! with a decimal digit.

use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Fatal scan errors. Per-process failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("open dir {} failed: {source}", .root.display())]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Process entry representing a digit-prefixed directory in the process root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcEntry {
    /// Directory name exactly as listed.
    pub name: String,
    /// Numeric PID, present only when the whole name is decimal digits.
    pub pid: Option<u32>,
}

impl ProcEntry {
    /// Builds an entry from a directory name, or `None` if the name does not
    /// start with a digit.
    pub fn from_name(name: &str) -> Option<Self> {
        if !name.as_bytes().first().is_some_and(u8::is_ascii_digit) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            pid: name.parse().ok(),
        })
    }
}

/// Lazy, single-pass iterator over the PID entries of a process root.
///
/// Owns the directory handle; dropping the scanner releases it, whether the
/// listing was exhausted or abandoned early.
#[derive(Debug)]
pub struct ProcScanner {
    entries: ReadDir,
}

impl ProcScanner {
    /// Opens the process root. This is the only fallible step of a scan.
    pub fn open(root: &Path) -> Result<Self, ScanError> {
        let entries = fs::read_dir(root).map_err(|source| ScanError::RootUnavailable {
            root: root.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }
}

impl Iterator for ProcScanner {
    type Item = ProcEntry;

    fn next(&mut self) -> Option<ProcEntry> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    trace!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let file_name = entry.file_name();
            let name = match file_name.to_str() {
                Some(v) => v,
                None => continue,
            };
            if let Some(proc_entry) = ProcEntry::from_name(name) {
                return Some(proc_entry);
            }
        }
        None
    }
}

/// Scans the process root for PID entries, stopping after `max` if given.
pub fn collect_proc_entries(root: &Path, max: Option<usize>) -> Result<Vec<ProcEntry>, ScanError> {
    let scanner = ProcScanner::open(root)?;
    Ok(match max {
        Some(maxp) => scanner.take(maxp).collect(),
        None => scanner.collect(),
    })
}
