//! svcctl - control layer over systemd
//!
//! A Rust library that:
//! - Starts, stops, restarts, kills, enables and disables units via `systemctl`
//! - Waits for stops to converge under a deadline
//! - Renders service and mount unit files for packaged apps
//! - Decodes journal output into displayable entries
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Manager                       │
//! ├─────────────────────────────────────────────────┤
//! │  Stop machine  │  Status parser │  Journal      │
//! ├─────────────────────────────────────────────────┤
//! │  CommandExecutor │ LogQuery │ Notifier          │
//! └─────────────────────────────────────────────────┘
//!
//!   units::render  (pure, no I/O)
//! ```

pub mod arch;
pub mod config;
pub mod journal;
pub mod manager;
pub mod units;

pub use config::{Paths, StopPolicy};
pub use journal::LogEntry;
pub use manager::{Manager, ServiceStatus, SystemdError};
pub use units::{MountDescription, RestartCondition, ServiceDescription, ServiceType};
