//! System check implementation.
//!
//! Validates configuration, process table access and permissions.

use std::path::Path;

use fpid::process::{collect_proc_entries, resolve_exe, resolve_invocation_name, Skip};
use nix::unistd::{geteuid, getpid};
use tracing::debug;

use crate::config::{validate_effective_config, Config};

/// Runs all checks and prints a report. Returns true if every hard check passed.
pub fn command_check(config: &Config) -> bool {
    println!("🔍 fpid - System Check");
    println!("======================");

    let mut all_ok = true;
    let root = config.proc_root();

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    // Check process root
    println!("\n📁 Checking {}...", root.display());
    match collect_proc_entries(&root, None) {
        Ok(entries) if entries.is_empty() => {
            println!("   ❌ No process entries found in {}", root.display());
            all_ok = false;
        }
        Ok(entries) => {
            println!("   ✅ {} process entries listed", entries.len());

            let exe_ok = entries
                .iter()
                .filter(|e| resolve_exe(&root, &e.name).is_ok())
                .count();
            let cmdline_ok = entries
                .iter()
                .filter(|e| resolve_invocation_name(&root, &e.name).is_ok())
                .count();
            println!(
                "   ℹ️  exe links resolvable for {}/{} processes (path queries)",
                exe_ok,
                entries.len()
            );
            println!(
                "   ℹ️  cmdline readable for {}/{} processes (name queries)",
                cmdline_ok,
                entries.len()
            );
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    // Check own entry, only meaningful when scanning the local process table
    println!("\n🪪 Checking own process entry...");
    let own_pid = getpid().to_string();
    if root.join(&own_pid).exists() {
        if !check_own_entry(&root, &own_pid) {
            all_ok = false;
        }
    } else {
        println!(
            "   ℹ️  PID {} not present in {} - skipped",
            own_pid,
            root.display()
        );
    }

    // Check privileges
    println!("\n👤 Checking privileges...");
    if geteuid().is_root() {
        println!("   ✅ Running as root (uid=0)");
    } else {
        println!("   ⚠️  Not running as root - exe links of other users' processes");
        println!("      are usually unreadable and will be skipped by path queries");
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
    } else {
        println!("   ❌ Some checks failed - please review the report");
    }
    all_ok
}

fn check_own_entry(root: &Path, pid: &str) -> bool {
    let mut ok = true;

    match resolve_exe(root, pid) {
        Ok(exe) => println!("   ✅ exe resolves to {}", String::from_utf8_lossy(&exe)),
        Err(e) => {
            report_skip("exe", &e);
            ok = false;
        }
    }

    match resolve_invocation_name(root, pid) {
        Ok(name) => println!("   ✅ invoked as '{}'", String::from_utf8_lossy(&name)),
        Err(e) => {
            report_skip("cmdline", &e);
            ok = false;
        }
    }

    ok
}

fn report_skip(what: &str, skip: &Skip) {
    debug!("Own {} check failed: {:?}", what, skip);
    println!("   ❌ {}: {}", what, skip);
}
