//! Stop, restart or signal a service

use std::time::Duration;

use svcctl::manager::{parse_signal, signal_name};

pub fn stop(root: &str, name: &str, timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    match super::manager(root).stop(name, timeout) {
        Ok(()) => println!("● {} - stopped", name),
        Err(e) if e.is_timeout() => {
            // systemd keeps working on the stop after we give up
            eprintln!("{} is still stopping; check again with: svcctl status {}", name, name);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn restart(root: &str, name: &str, timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    super::manager(root).restart(name, timeout)?;
    println!("● {} - restarted", name);
    Ok(())
}

pub fn kill(root: &str, name: &str, signal: &str) -> Result<(), Box<dyn std::error::Error>> {
    let signal = parse_signal(signal)?;
    super::manager(root).kill(name, signal_name(signal))?;
    Ok(())
}
