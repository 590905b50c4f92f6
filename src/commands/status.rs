//! Show service status

use svcctl::manager::ActiveState;

pub fn status(root: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let status = super::manager(root).service_status(name)?;

    let status_symbol = match ActiveState::parse(&status.active_state) {
        Some(ActiveState::Active) => "●",
        Some(ActiveState::Inactive) => "○",
        Some(ActiveState::Failed) => "×",
        _ => "◐",
    };

    println!("{} {}", status_symbol, status.service_file_name);
    println!("     Loaded: {} ({})", status.load_state, status.unit_file_state);
    println!("     Active: {} ({})", status.active_state, status.sub_state);

    Ok(())
}
