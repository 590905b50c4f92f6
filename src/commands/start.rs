//! Start a service

pub fn start(root: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    super::manager(root).start(name)?;
    println!("● {} - started", name);
    Ok(())
}
