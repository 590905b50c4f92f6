//! Show recent journal entries

pub fn logs(root: &str, names: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    for entry in super::manager(root).logs(&names)? {
        println!("{}", entry);
    }

    Ok(())
}
