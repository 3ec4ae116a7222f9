//! Query parsing: decides which identity a process is compared by.

use std::ffi::OsString;
use std::fmt;
use std::os::unix::ffi::OsStrExt;

/// Which identity of a process is compared against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Compare against the resolved `exe` link target.
    Path,
    /// Compare against the basename of argv[0] from `cmdline`.
    Name,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Path => write!(f, "path"),
            MatchMode::Name => write!(f, "name"),
        }
    }
}

/// Immutable search string plus its derived match mode.
///
/// Held as raw bytes; argv[0] and exe targets need not be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: OsString,
    mode: MatchMode,
}

impl Query {
    pub fn new(text: impl Into<OsString>) -> Self {
        let text = text.into();
        let mode = if text.as_bytes().contains(&b'/') {
            MatchMode::Path
        } else {
            MatchMode::Name
        };
        Self { text, mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Exact byte comparison: equal length and equal content.
    pub fn matches(&self, identity: &[u8]) -> bool {
        self.text.as_bytes() == identity
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.to_string_lossy())
    }
}
