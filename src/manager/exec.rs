//! Running the systemd command line tools
//!
//! The manager only ever talks to systemd through these two traits, so tests
//! can substitute recording fakes.

use std::process::Command;
use std::sync::Arc;

use super::SystemdError;

/// Runs `systemctl` with the given arguments and returns its stdout
pub trait CommandExecutor {
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, SystemdError>;
}

/// Fetches raw `journalctl -o json` output for the given units
pub trait LogQuery {
    fn query(&self, services: &[&str]) -> Result<Vec<u8>, SystemdError>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, SystemdError> {
        (**self).run(args)
    }
}

impl<T: LogQuery + ?Sized> LogQuery for Arc<T> {
    fn query(&self, services: &[&str]) -> Result<Vec<u8>, SystemdError> {
        (**self).query(services)
    }
}

/// The real `systemctl`
#[derive(Debug, Clone, Default)]
pub struct Systemctl;

impl CommandExecutor for Systemctl {
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, SystemdError> {
        run_tool("systemctl", args)
    }
}

/// The real `journalctl`
#[derive(Debug, Clone)]
pub struct Journalctl {
    /// How many trailing entries to fetch
    pub lines: u32,
}

impl Default for Journalctl {
    fn default() -> Self {
        Self { lines: 10 }
    }
}

impl Journalctl {
    pub fn args(&self, services: &[&str]) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "json".to_string(),
            "--no-pager".to_string(),
            "-n".to_string(),
            self.lines.to_string(),
        ];
        for svc in services {
            args.push("-u".to_string());
            args.push(svc.to_string());
        }
        args
    }
}

impl LogQuery for Journalctl {
    fn query(&self, services: &[&str]) -> Result<Vec<u8>, SystemdError> {
        let args = self.args(services);
        log::debug!("journalctl {}", args.join(" "));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_tool("journalctl", &args)
    }
}

/// Run a tool to completion; non-zero exit becomes [`SystemdError::Command`]
/// carrying stdout and stderr
fn run_tool(program: &str, args: &[&str]) -> Result<Vec<u8>, SystemdError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| SystemdError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(output.stdout);
    }

    let mut captured = output.stdout;
    captured.extend_from_slice(&output.stderr);

    let mut cmd = vec![program.to_string()];
    cmd.extend(args.iter().map(|a| a.to_string()));

    Err(SystemdError::Command {
        cmd,
        exit_code: output.status.code().unwrap_or(-1),
        output: captured,
    })
}
