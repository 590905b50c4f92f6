//! Mount units for package images
//!
//! The unit name must correspond to the mount point path with slashes
//! replaced by dashes (e.g., /apps/hello/1.1 → apps-hello-1.1.mount).
//! Dashes already in the path are kept as is, so the name cannot be mapped
//! back to a unique mount point; read `Where=` from the unit instead.

use std::path::{Path, PathBuf};

/// A package image to be mounted at boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountDescription {
    /// Package the image belongs to (used in the description)
    pub name: String,
    /// What= - the backing image
    pub what: String,
    /// Where= - mount point path
    pub r#where: String,
}

impl MountDescription {
    pub fn new(name: &str, what: &str, r#where: &str) -> Self {
        Self {
            name: name.to_string(),
            what: what.to_string(),
            r#where: r#where.to_string(),
        }
    }

    /// File name of the generated unit
    pub fn unit_name(&self) -> String {
        unit_name_from_path(&self.r#where, "mount")
    }
}

/// Get the unit name from a path
/// e.g., ("/apps/hello/1.1", "mount") → "apps-hello-1.1.mount"
pub fn unit_name_from_path(path: &str, ext: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("-.{}", ext)
    } else {
        format!("{}.{}", path.replace('/', "-"), ext)
    }
}

/// Full path of the unit file for `path` inside `services_dir`
pub fn mount_unit_path(services_dir: &Path, path: &str, ext: &str) -> PathBuf {
    services_dir.join(unit_name_from_path(path, ext))
}
