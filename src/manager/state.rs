//! Unit state as reported by `systemctl show`
//!
//! ```text
//!   active ──stop──▶ deactivating ──▶ inactive
//!                         │
//!                         └────────▶ failed
//! ```
//!
//! Only `active` and `deactivating` count as "still stopping"; anything else
//! the manager reports (including values we do not know) ends a stop wait.

/// Properties requested for a full status query
pub const STATUS_PROPERTIES: &str = "Id,LoadState,ActiveState,SubState,UnitFileState";

/// High-level unit state (systemd's ActiveState)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveState {
    Inactive,
    Activating,
    Active,
    Reloading,
    Deactivating,
    Failed,
    Maintenance,
}

impl ActiveState {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inactive" => Some(Self::Inactive),
            "activating" => Some(Self::Activating),
            "active" => Some(Self::Active),
            "reloading" => Some(Self::Reloading),
            "deactivating" => Some(Self::Deactivating),
            "failed" => Some(Self::Failed),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Reloading => "reloading",
            Self::Deactivating => "deactivating",
            Self::Failed => "failed",
            Self::Maintenance => "maintenance",
        }
    }
}

/// Whether a reported ActiveState means a stop is still in progress
pub fn is_still_stopping(active_state: &str) -> bool {
    matches!(
        ActiveState::parse(active_state),
        Some(ActiveState::Active | ActiveState::Deactivating)
    )
}

/// Snapshot of a unit's state; stale as soon as it is returned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceStatus {
    /// The name the status was queried for
    pub service_file_name: String,
    /// `Id=` as systemd reported it
    pub id: String,
    pub load_state: String,
    pub active_state: String,
    pub sub_state: String,
    pub unit_file_state: String,
}

impl ServiceStatus {
    /// Parse `Key=Value` lines; unknown keys are ignored, missing ones stay empty
    pub fn parse(name: &str, output: &[u8]) -> Self {
        let mut status = Self {
            service_file_name: name.to_string(),
            ..Self::default()
        };

        for (key, value) in properties(output) {
            match key {
                "Id" => status.id = value.to_string(),
                "LoadState" => status.load_state = value.to_string(),
                "ActiveState" => status.active_state = value.to_string(),
                "SubState" => status.sub_state = value.to_string(),
                "UnitFileState" => status.unit_file_state = value.to_string(),
                _ => {}
            }
        }

        status
    }

    /// `"<UnitFileState>; <LoadState>; <ActiveState> (<SubState>)"`
    pub fn summary(&self) -> String {
        format!(
            "{}; {}; {} ({})",
            self.unit_file_state, self.load_state, self.active_state, self.sub_state
        )
    }
}

/// Value of `ActiveState=` in `systemctl show` output, empty if absent
pub fn active_state(output: &[u8]) -> String {
    properties(output)
        .find(|(key, _)| *key == "ActiveState")
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

fn properties(output: &[u8]) -> impl Iterator<Item = (&str, &str)> {
    output
        .split(|b| *b == b'\n')
        .filter_map(|line| std::str::from_utf8(line).ok())
        .filter_map(|line| line.trim_end_matches('\r').split_once('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_OUTPUT: &[u8] =
        b"Id=Thing\nLoadState=LoadState\nActiveState=ActiveState\nSubState=SubState\nUnitFileState=UnitFileState\n";

    #[test]
    fn test_parse_status() {
        let status = ServiceStatus::parse("foo", SHOW_OUTPUT);
        assert_eq!(
            status,
            ServiceStatus {
                service_file_name: "foo".into(),
                id: "Thing".into(),
                load_state: "LoadState".into(),
                active_state: "ActiveState".into(),
                sub_state: "SubState".into(),
                unit_file_state: "UnitFileState".into(),
            }
        );
    }

    #[test]
    fn test_summary() {
        let status = ServiceStatus::parse(
            "foo",
            b"Id=Thing\nLoadState=L\nActiveState=A\nSubState=S\nUnitFileState=U\n",
        );
        assert_eq!(status.summary(), "U; L; A (S)");
    }

    #[test]
    fn test_parse_ignores_unknown_and_defaults_missing() {
        let status = ServiceStatus::parse("foo", b"MainPID=42\nActiveState=active\nnonsense\n");
        assert_eq!(status.active_state, "active");
        assert!(status.load_state.is_empty());
        assert!(status.unit_file_state.is_empty());
        assert_eq!(status.summary(), "; ; active ()");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let status = ServiceStatus::parse("foo", b"SubState=a=b\n");
        assert_eq!(status.sub_state, "a=b");
    }

    #[test]
    fn test_active_state() {
        assert_eq!(active_state(b"ActiveState=inactive\n"), "inactive");
        assert_eq!(active_state(b""), "");
        assert_eq!(active_state(b"SubState=dead\n"), "");
    }

    #[test]
    fn test_still_stopping() {
        assert!(is_still_stopping("active"));
        assert!(is_still_stopping("deactivating"));
        assert!(!is_still_stopping("inactive"));
        assert!(!is_still_stopping("failed"));
        assert!(!is_still_stopping("whatever"));
        assert!(!is_still_stopping(""));
    }

    #[test]
    fn test_active_state_as_str() {
        for s in ["inactive", "activating", "active", "reloading", "deactivating", "failed", "maintenance"] {
            assert_eq!(ActiveState::parse(s).unwrap().as_str(), s);
        }
        assert_eq!(ActiveState::parse("bogus"), None);
    }
}
