//! Tunables and directory layout
//!
//! Everything here is plain data with defaults; nothing is read from disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Launcher that confines app commands
pub const LAUNCHER: &str = "/usr/bin/ubuntu-core-launcher";
/// Per-version app data lives under here
pub const SNAP_DATA_DIR: &str = "/var/apps";
/// Per-user app data for services (which run as root)
pub const SNAP_USER_DATA_DIR: &str = "/root/apps";
/// GL libraries exposed to apps
pub const GL_LIBRARY_DIR: &str = "/var/lib/snapd/lib/gl";
/// Target every generated unit is wanted by
pub const SERVICE_TARGET: &str = "multi-user.target";
/// Target reached once frameworks are ready
pub const FRAMEWORKS_TARGET: &str = "snapd.frameworks.target";

/// Polling cadence used while waiting for a unit to stop
///
/// The first `fast_attempts` polls are spaced by `fast_delay`. After that the
/// caller is told we are waiting, and polling continues every
/// `slow_interval` until the stop timeout runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    pub fast_attempts: u32,
    pub fast_delay: Duration,
    pub slow_interval: Duration,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            fast_attempts: 4,
            fast_delay: Duration::from_millis(250),
            slow_interval: Duration::from_millis(250),
        }
    }
}

impl StopPolicy {
    /// Defaults, overridden by `SVCCTL_STOP_ATTEMPTS`, `SVCCTL_STOP_DELAY`
    /// and `SVCCTL_STOP_INTERVAL` when set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut policy = Self::default();

        if let Some(raw) = lookup("SVCCTL_STOP_ATTEMPTS") {
            match raw.trim().parse() {
                Ok(n) => policy.fast_attempts = n,
                Err(_) => log::warn!("Ignoring SVCCTL_STOP_ATTEMPTS={:?}: not a number", raw),
            }
        }
        if let Some(raw) = lookup("SVCCTL_STOP_DELAY") {
            match parse_duration(&raw) {
                Some(d) => policy.fast_delay = d,
                None => log::warn!("Ignoring SVCCTL_STOP_DELAY={:?}: not a duration", raw),
            }
        }
        if let Some(raw) = lookup("SVCCTL_STOP_INTERVAL") {
            match parse_duration(&raw) {
                Some(d) => policy.slow_interval = d,
                None => log::warn!("Ignoring SVCCTL_STOP_INTERVAL={:?}: not a duration", raw),
            }
        }

        policy
    }
}

/// Filesystem layout, optionally relocated under an alternate root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// An empty root means the live system
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory generated unit files are written to
    pub fn services_dir(&self) -> PathBuf {
        if self.root.as_os_str().is_empty() {
            PathBuf::from("/etc/systemd/system")
        } else {
            self.root.join("etc/systemd/system")
        }
    }
}

/// Parse duration from systemd format (e.g., "5s", "100ms", "1min")
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();

    if let Some(n) = s.strip_suffix("ms") {
        n.parse().ok().map(Duration::from_millis)
    } else if let Some(n) = s.strip_suffix("min") {
        n.parse::<u64>().ok()?.checked_mul(60).map(Duration::from_secs)
    } else if let Some(n) = s.strip_suffix("sec").or_else(|| s.strip_suffix('s')) {
        n.parse().ok().map(Duration::from_secs)
    } else if let Some(n) = s.strip_suffix('h') {
        n.parse::<u64>().ok()?.checked_mul(3600).map(Duration::from_secs)
    } else {
        // Bare number = seconds
        s.parse().ok().map(Duration::from_secs)
    }
}
