mod commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "svcctl")]
#[command(about = "Control systemd services and generate their unit files")]
struct Args {
    /// Operate on the image mounted at this root (enable/disable, unit files)
    #[arg(long, global = true, default_value = "")]
    root: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a service
    Start {
        /// Service name (e.g., "docker.service")
        name: String,
    },

    /// Stop a service and wait for it to go down
    Stop {
        /// Service name
        name: String,
        /// How long to wait after the initial checks (e.g. "30s", "2min")
        #[arg(long, default_value = "30s", value_parser = parse_timeout)]
        timeout: Duration,
    },

    /// Stop, then start a service
    Restart {
        /// Service name
        name: String,
        /// How long to wait for the stop (e.g. "30s", "2min")
        #[arg(long, default_value = "30s", value_parser = parse_timeout)]
        timeout: Duration,
    },

    /// Send a signal to a service's processes
    Kill {
        /// Service name
        name: String,
        /// Signal name (HUP, SIGTERM, usr1, ...)
        #[arg(short = 's', long, default_value = "TERM")]
        signal: String,
    },

    /// Enable a service to start at boot
    Enable {
        /// Service name
        name: String,
    },

    /// Disable a service from starting at boot
    Disable {
        /// Service name
        name: String,
    },

    /// Show service status
    Status {
        /// Service name
        name: String,
    },

    /// Show recent journal entries
    Logs {
        /// Service names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Reload unit files from disk (like systemctl daemon-reload)
    DaemonReload,

    /// Print the unit file for a JSON service description
    RenderService {
        /// Path to the description
        path: PathBuf,
    },

    /// Write a mount unit for a package image
    WriteMount {
        /// Package name
        name: String,
        /// Image to mount
        what: String,
        /// Mount point
        mount_point: String,
    },
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    svcctl::config::parse_duration(s).ok_or_else(|| format!("invalid duration: {}", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse();
    let root = args.root.as_str();

    match args.command {
        Command::Start { name } => {
            commands::start(root, &name)?;
        }
        Command::Stop { name, timeout } => {
            commands::stop(root, &name, timeout)?;
        }
        Command::Restart { name, timeout } => {
            commands::restart(root, &name, timeout)?;
        }
        Command::Kill { name, signal } => {
            commands::kill(root, &name, &signal)?;
        }
        Command::Enable { name } => {
            commands::enable(root, &name)?;
        }
        Command::Disable { name } => {
            commands::disable(root, &name)?;
        }
        Command::Status { name } => {
            commands::status(root, &name)?;
        }
        Command::Logs { names } => {
            commands::logs(root, &names)?;
        }
        Command::DaemonReload => {
            commands::daemon_reload(root)?;
        }
        Command::RenderService { path } => {
            commands::render_service(&path)?;
        }
        Command::WriteMount { name, what, mount_point } => {
            commands::write_mount(root, &name, &what, &mount_point)?;
        }
    }

    Ok(())
}
