//! Unit descriptions and unit file rendering
//!
//! Turns declarative service and mount descriptions into the text systemd
//! reads from its unit directory.

mod mount;
pub mod render;
mod service;

pub use mount::{mount_unit_path, unit_name_from_path, MountDescription};
pub use render::{mount_unit, service_unit};
pub use service::*;
