//! Service manager control
//!
//! Starts, stops, restarts, kills, enables and disables units by driving
//! `systemctl`, and waits for stops to actually finish.
//!
//! All authoritative state lives in systemd. A [`Manager`] holds only its
//! collaborators and tuning, and re-queries systemd on every call.

mod exec;
mod notify;
mod state;
pub mod stop;

pub use exec::{CommandExecutor, Journalctl, LogQuery, Systemctl};
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use state::{active_state, is_still_stopping, ActiveState, ServiceStatus, STATUS_PROPERTIES};
pub use stop::{StopMachine, StopPhase, Step};

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use nix::sys::signal::Signal;

use crate::config::{Paths, StopPolicy};
use crate::journal::{self, LogEntry};
use crate::units::{self, MountDescription};

/// Controller bound to an optional alternate root and a progress notifier
pub struct Manager {
    root: String,
    paths: Paths,
    executor: Box<dyn CommandExecutor>,
    log_query: Box<dyn LogQuery>,
    notifier: Box<dyn Notifier>,
    stop_policy: StopPolicy,
}

impl Manager {
    /// Manager for the live system (empty `root`) or an image mounted at
    /// `root`, using the real `systemctl` and `journalctl`
    pub fn new(root: &str, notifier: impl Notifier + 'static) -> Self {
        Self {
            root: root.to_string(),
            paths: Paths::new(root),
            executor: Box::new(Systemctl),
            log_query: Box::new(Journalctl::default()),
            notifier: Box::new(notifier),
            stop_policy: StopPolicy::default(),
        }
    }

    pub fn with_executor(mut self, executor: impl CommandExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    pub fn with_log_query(mut self, log_query: impl LogQuery + 'static) -> Self {
        self.log_query = Box::new(log_query);
        self
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    fn systemctl(&self, args: &[&str]) -> Result<Vec<u8>, SystemdError> {
        log::debug!("systemctl {}", args.join(" "));
        self.executor.run(args)
    }

    /// `--root <root>` prefix for install operations
    fn root_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if !self.root.is_empty() {
            full.push("--root");
            full.push(self.root.as_str());
        }
        full.extend_from_slice(args);
        full
    }

    /// Make systemd re-read unit files
    pub fn daemon_reload(&self) -> Result<(), SystemdError> {
        self.systemctl(&["daemon-reload"])?;
        Ok(())
    }

    pub fn start(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl(&["start", name])?;
        log::info!("Started {}", name);
        Ok(())
    }

    /// Deliver `signal` (e.g. "HUP") to the unit's processes
    pub fn kill(&self, name: &str, signal: &str) -> Result<(), SystemdError> {
        self.systemctl(&["kill", name, "-s", signal])?;
        Ok(())
    }

    pub fn enable(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl(&self.root_args(&["enable", name]))?;
        log::info!("Enabled {}", name);
        Ok(())
    }

    pub fn disable(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl(&self.root_args(&["disable", name]))?;
        log::info!("Disabled {}", name);
        Ok(())
    }

    /// Stop a unit and wait until systemd no longer reports it as active or
    /// deactivating
    ///
    /// The fast polls always run; `timeout` bounds the slow phase that
    /// follows. Status query failures end the wait with that error.
    pub fn stop(&self, name: &str, timeout: Duration) -> Result<(), SystemdError> {
        let mut machine = StopMachine::new(self.stop_policy, timeout);

        self.systemctl(&["stop", name])?;
        let issued = Instant::now();
        machine.stop_issued();

        let property = "--property=ActiveState";
        loop {
            let output = self.systemctl(&["show", property, name])?;
            let observed = active_state(&output);
            log::debug!("{} ActiveState={:?}", name, observed);

            match machine.observe(&observed, issued.elapsed()) {
                Step::Converged => {
                    log::info!("Stopped {}", name);
                    return Ok(());
                }
                Step::TimedOut => {
                    log::warn!("{} still {} after {:?}", name, observed, timeout);
                    return Err(SystemdError::Timeout {
                        service: name.to_string(),
                        waited: timeout,
                    });
                }
                Step::Poll { after, notify } => {
                    if notify {
                        self.notifier.notify(&format!("Waiting for {} to stop.", name));
                    }
                    std::thread::sleep(after);
                }
            }
        }
    }

    /// Stop, then start. Either step's error is returned as is; a failed
    /// stop does not attempt the start.
    pub fn restart(&self, name: &str, timeout: Duration) -> Result<(), SystemdError> {
        self.stop(name, timeout)?;
        self.start(name)
    }

    /// Full status snapshot
    pub fn service_status(&self, name: &str) -> Result<ServiceStatus, SystemdError> {
        let property = format!("--property={}", STATUS_PROPERTIES);
        let output = self.systemctl(&["show", property.as_str(), name])?;
        Ok(ServiceStatus::parse(name, &output))
    }

    /// One-line status: `"<UnitFileState>; <LoadState>; <ActiveState> (<SubState>)"`
    pub fn status(&self, name: &str) -> Result<String, SystemdError> {
        Ok(self.service_status(name)?.summary())
    }

    /// Recent journal entries for the given units, in the order received
    pub fn logs(&self, services: &[&str]) -> Result<Vec<LogEntry>, SystemdError> {
        let raw = self.log_query.query(services)?;
        journal::decode_entries(&raw).map_err(|(line, source)| SystemdError::Decode { line, source })
    }

    /// Path of the unit file generated for mount point `r#where`
    pub fn mount_unit_path(&self, r#where: &str, ext: &str) -> PathBuf {
        units::mount_unit_path(&self.paths.services_dir(), r#where, ext)
    }

    /// Write the mount unit for a package image and return its file name
    pub fn write_mount_unit_file(&self, name: &str, what: &str, r#where: &str) -> Result<String, SystemdError> {
        let mount = MountDescription::new(name, what, r#where);
        let unit_name = mount.unit_name();
        let dir = self.paths.services_dir();

        std::fs::create_dir_all(&dir)?;
        write_unit(&dir.join(&unit_name), &units::mount_unit(&mount))?;

        log::info!("Wrote {} for {}", unit_name, name);
        Ok(unit_name)
    }
}

fn write_unit(path: &Path, content: &str) -> Result<(), SystemdError> {
    log::debug!("Writing {}", path.display());
    std::fs::write(path, content)?;
    Ok(())
}

/// Accept "HUP", "SIGHUP" or "hup"
pub fn parse_signal(s: &str) -> Result<Signal, SystemdError> {
    let upper = s.trim().to_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{}", upper)
    };
    Signal::from_str(&full).map_err(|_| SystemdError::UnknownSignal(s.to_string()))
}

/// The name `systemctl kill -s` expects, e.g. "HUP"
pub fn signal_name(signal: Signal) -> &'static str {
    let name = signal.as_str();
    name.strip_prefix("SIG").unwrap_or(name)
}

#[derive(Debug, thiserror::Error)]
pub enum SystemdError {
    #[error("{} failed with exit status {exit_code}: {}", .cmd.join(" "), String::from_utf8_lossy(.output).trim_end())]
    Command {
        cmd: Vec<String>,
        exit_code: i32,
        output: Vec<u8>,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed journal output on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} did not stop within {waited:?}")]
    Timeout { service: String, waited: Duration },

    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SystemdError {
    /// The stop deadline passed; distinct from any command failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// A systemctl/journalctl invocation failed or produced unusable output
    pub fn is_command_error(&self) -> bool {
        matches!(self, Self::Command { .. } | Self::Spawn { .. } | Self::Decode { .. })
    }
}
