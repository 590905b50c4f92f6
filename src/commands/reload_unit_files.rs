//! Reload unit files from disk
//!
//! Equivalent to systemd's daemon-reload.

pub fn daemon_reload(root: &str) -> Result<(), Box<dyn std::error::Error>> {
    super::manager(root).daemon_reload()?;
    println!("Unit files reloaded");
    Ok(())
}
