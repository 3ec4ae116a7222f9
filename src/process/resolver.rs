//! Identity resolution for a single process entry.
//!
//! Two strategies are provided:
//! - `resolve_exe`: the target of `/proc/<pid>/exe`, i.e. the real binary
//! - `resolve_invocation_name`: the basename of argv[0] from `/proc/<pid>/cmdline`
//!
//! Any failure is reported as a [`Skip`]; callers treat it as "this process
//! does not exist" and move on.

use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Capacity for the per-process part `/<pid>/<leaf>` of a pseudo-file path.
///
/// Equals a 32 byte `/proc/<pid>/<leaf>\0` buffer, so PID names of up to 21
/// bytes fit for `exe` and up to 17 bytes for `cmdline`.
pub const ENTRY_PATH_CAPACITY: usize = 26;

/// Maximum number of bytes read from a `cmdline` record.
pub const CMDLINE_READ_LIMIT: u64 = 4095;

/// Why a candidate produced no identity.
#[derive(Debug, thiserror::Error)]
pub enum Skip {
    #[error("path for entry '{entry}' exceeds {max} bytes", max = ENTRY_PATH_CAPACITY)]
    PathTooLong { entry: String },

    #[error("cannot resolve {}: {source}", .path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("empty invocation record at {}", .path.display())]
    EmptyRecord { path: PathBuf },
}

/// Builds `<root>/<entry>/<leaf>`, refusing entries whose per-process suffix
/// would not fit [`ENTRY_PATH_CAPACITY`].
pub fn bounded_entry_path(root: &Path, entry: &str, leaf: &str) -> Result<PathBuf, Skip> {
    // '/' + entry + '/' + leaf
    let needed = 1 + entry.len() + 1 + leaf.len();
    if needed > ENTRY_PATH_CAPACITY {
        return Err(Skip::PathTooLong {
            entry: entry.to_string(),
        });
    }
    let mut path = root.join(entry);
    path.push(leaf);
    Ok(path)
}

/// Resolves the `exe` link of a process to the raw bytes of its target.
pub fn resolve_exe(root: &Path, entry: &str) -> Result<Vec<u8>, Skip> {
    let link = bounded_entry_path(root, entry, "exe")?;
    match fs::read_link(&link) {
        Ok(target) => Ok(target.as_os_str().as_bytes().to_vec()),
        Err(source) => Err(Skip::Unresolvable { path: link, source }),
    }
}

/// Reads the invocation record of a process and returns the basename of its
/// first token.
pub fn resolve_invocation_name(root: &Path, entry: &str) -> Result<Vec<u8>, Skip> {
    let path = bounded_entry_path(root, entry, "cmdline")?;
    let record = read_invocation_record(&path)?;
    if record.is_empty() {
        return Err(Skip::EmptyRecord { path });
    }
    Ok(invocation_basename(&record).to_vec())
}

/// Reads at most [`CMDLINE_READ_LIMIT`] bytes; the file is closed on return.
fn read_invocation_record(path: &Path) -> Result<Vec<u8>, Skip> {
    let unreadable = |source| Skip::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let mut buf = Vec::with_capacity(CMDLINE_READ_LIMIT as usize);
    file.take(CMDLINE_READ_LIMIT)
        .read_to_end(&mut buf)
        .map_err(unreadable)?;
    Ok(buf)
}

/// Basename of the first NUL-separated token of an invocation record.
///
/// The record need not end with a NUL. A token without `/` is returned whole.
pub fn invocation_basename(record: &[u8]) -> &[u8] {
    let first = record.split(|&b| b == 0).next().unwrap_or(record);
    match first.iter().rposition(|&b| b == b'/') {
        Some(slash) => &first[slash + 1..],
        None => first,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    // -------------------------------------------------------------------------
    // Tests for invocation_basename
    // -------------------------------------------------------------------------

    #[test]
    fn test_invocation_basename() {
        assert_eq!(invocation_basename(b"/usr/sbin/sshd\0-D\0"), b"sshd");
        assert_eq!(invocation_basename(b"nginx\0-g\0daemon off;\0"), b"nginx");
        assert_eq!(invocation_basename(b"./run.sh"), b"run.sh");
        assert_eq!(invocation_basename(b"bash"), b"bash");

        // Only the first token is considered
        assert_eq!(invocation_basename(b"python3\0/opt/app/main.py\0"), b"python3");

        // Trailing slash leaves an empty basename
        assert_eq!(invocation_basename(b"/usr/bin/\0"), b"");

        // Record starting with NUL has an empty first token
        assert_eq!(invocation_basename(b"\0foo\0"), b"");
    }

    #[test]
    fn test_invocation_basename_rewritten_title() {
        // Some daemons overwrite argv[0] with spaces instead of NULs
        assert_eq!(
            invocation_basename(b"postgres: checkpointer   "),
            b"postgres: checkpointer   "
        );
        assert_eq!(
            invocation_basename(b"sshd: /usr/sbin/sshd -D [listener]"),
            b"sshd -D [listener]"
        );
    }

    // -------------------------------------------------------------------------
    // Tests for bounded_entry_path
    // -------------------------------------------------------------------------

    #[test]
    fn test_bounded_entry_path_within_capacity() {
        let path = bounded_entry_path(Path::new("/proc"), "1234", "cmdline").unwrap();
        assert_eq!(path, PathBuf::from("/proc/1234/cmdline"));

        let longest_exe = "1".repeat(21);
        assert!(bounded_entry_path(Path::new("/proc"), &longest_exe, "exe").is_ok());

        let longest_cmdline = "1".repeat(17);
        assert!(bounded_entry_path(Path::new("/proc"), &longest_cmdline, "cmdline").is_ok());
    }

    #[test]
    fn test_bounded_entry_path_rejects_overflow() {
        let too_long_exe = "1".repeat(22);
        assert!(matches!(
            bounded_entry_path(Path::new("/proc"), &too_long_exe, "exe"),
            Err(Skip::PathTooLong { .. })
        ));

        let too_long_cmdline = "1".repeat(18);
        assert!(matches!(
            bounded_entry_path(Path::new("/proc"), &too_long_cmdline, "cmdline"),
            Err(Skip::PathTooLong { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Tests against a synthetic process root
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_exe() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("10")).unwrap();
        symlink("/usr/local/bin/foo", root.path().join("10/exe")).unwrap();

        assert_eq!(resolve_exe(root.path(), "10").unwrap(), b"/usr/local/bin/foo");
    }

    #[test]
    fn test_resolve_exe_missing_link() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("11")).unwrap();

        assert!(matches!(
            resolve_exe(root.path(), "11"),
            Err(Skip::Unresolvable { .. })
        ));
    }

    #[test]
    fn test_resolve_exe_not_a_symlink() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("12")).unwrap();
        fs::write(root.path().join("12/exe"), b"regular file").unwrap();

        assert!(matches!(
            resolve_exe(root.path(), "12"),
            Err(Skip::Unresolvable { .. })
        ));
    }

    #[test]
    fn test_resolve_invocation_name() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("20")).unwrap();
        fs::write(root.path().join("20/cmdline"), b"/usr/bin/myalias\0--flag\0").unwrap();

        assert_eq!(
            resolve_invocation_name(root.path(), "20").unwrap(),
            b"myalias"
        );
    }

    #[test]
    fn test_resolve_invocation_name_empty_record() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("21")).unwrap();
        fs::write(root.path().join("21/cmdline"), b"").unwrap();

        assert!(matches!(
            resolve_invocation_name(root.path(), "21"),
            Err(Skip::EmptyRecord { .. })
        ));
    }

    #[test]
    fn test_resolve_invocation_name_missing_record() {
        let root = tempfile::tempdir().unwrap();

        assert!(matches!(
            resolve_invocation_name(root.path(), "22"),
            Err(Skip::Unreadable { .. })
        ));
    }

    #[test]
    fn test_resolve_invocation_name_truncates_long_record() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("23")).unwrap();
        let long_arg0 = "a".repeat(5000);
        fs::write(root.path().join("23/cmdline"), format!("{long_arg0}\0x\0")).unwrap();

        let name = resolve_invocation_name(root.path(), "23").unwrap();
        assert_eq!(name.len(), CMDLINE_READ_LIMIT as usize);
    }
}
