//! Target architecture naming
//!
//! Unit files carry the Debian/Ubuntu spelling of the architecture
//! (`amd64`, `armhf`, ...) rather than the Rust target name.

/// Map a Rust target architecture name to its Ubuntu equivalent
pub fn ubuntu_arch_from_rust(arch: &str) -> &str {
    match arch {
        "x86" => "i386",
        "x86_64" => "amd64",
        "arm" => "armhf",
        "aarch64" => "arm64",
        "powerpc" => "powerpc",
        "powerpc64" => {
            if cfg!(target_endian = "little") {
                "ppc64el"
            } else {
                "ppc64"
            }
        }
        "s390x" => "s390x",
        "riscv64" => "riscv64",
        other => other,
    }
}

/// Architecture of the running build, Ubuntu spelling
pub fn ubuntu_architecture() -> &'static str {
    ubuntu_arch_from_rust(std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_arches() {
        assert_eq!(ubuntu_arch_from_rust("x86_64"), "amd64");
        assert_eq!(ubuntu_arch_from_rust("x86"), "i386");
        assert_eq!(ubuntu_arch_from_rust("arm"), "armhf");
        assert_eq!(ubuntu_arch_from_rust("aarch64"), "arm64");
        assert_eq!(ubuntu_arch_from_rust("s390x"), "s390x");
    }

    #[test]
    fn test_unknown_arch_passes_through() {
        assert_eq!(ubuntu_arch_from_rust("mips"), "mips");
    }

    #[test]
    fn test_current_arch_not_empty() {
        assert!(!ubuntu_architecture().is_empty());
    }
}
