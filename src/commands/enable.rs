//! Enable or disable a service at boot

pub fn enable(root: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    super::manager(root).enable(name)?;
    Ok(())
}

pub fn disable(root: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    super::manager(root).disable(name)?;
    Ok(())
}
