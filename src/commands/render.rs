//! Generate unit files

use std::path::Path;

use svcctl::units::{self, ServiceDescription};

/// Print the unit for a JSON service description
pub fn render_service(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let desc: ServiceDescription = serde_json::from_str(&content)?;

    log::debug!("Rendering {} from {}", desc.unit_file_name(), path.display());
    print!("{}", units::service_unit(&desc));

    Ok(())
}

pub fn write_mount(root: &str, name: &str, what: &str, mount_point: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manager = super::manager(root);
    let unit_name = manager.write_mount_unit_file(name, what, mount_point)?;
    println!("{}", manager.paths().services_dir().join(unit_name).display());
    Ok(())
}
