//! Typed descriptions of the services we generate unit files for

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Service type determines startup notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    #[default]
    Simple,   // Ready immediately after exec
    Forking,  // Ready when main process exits
    Oneshot,  // Run once, no main process
    Dbus,     // Ready when D-Bus name acquired
    Notify,   // Ready on sd_notify READY=1
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Forking => "forking",
            Self::Oneshot => "oneshot",
            Self::Dbus => "dbus",
            Self::Notify => "notify",
        }
    }
}

/// When systemd should restart a service (`Restart=`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RestartCondition {
    #[default]
    Never,
    Always,
    OnSuccess,
    OnFailure,
    OnAbnormal,
    OnAbort,
    OnWatchdog,
}

/// The one canonical spelling of every condition, in both directions
const RESTART_TABLE: [(RestartCondition, &str); 7] = [
    (RestartCondition::Never, "no"),
    (RestartCondition::Always, "always"),
    (RestartCondition::OnSuccess, "on-success"),
    (RestartCondition::OnFailure, "on-failure"),
    (RestartCondition::OnAbnormal, "on-abnormal"),
    (RestartCondition::OnAbort, "on-abort"),
    (RestartCondition::OnWatchdog, "on-watchdog"),
];

impl RestartCondition {
    /// Every condition, in table order
    pub fn all() -> impl Iterator<Item = RestartCondition> {
        RESTART_TABLE.iter().map(|(cond, _)| *cond)
    }

    pub fn as_str(&self) -> &'static str {
        RESTART_TABLE
            .iter()
            .find(|(cond, _)| cond == self)
            .map(|(_, name)| *name)
            .unwrap_or("no")
    }
}

impl fmt::Display for RestartCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown restart condition {0:?}")]
pub struct UnknownRestartCondition(pub String);

impl FromStr for RestartCondition {
    type Err = UnknownRestartCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RESTART_TABLE
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(cond, _)| *cond)
            .ok_or_else(|| UnknownRestartCondition(s.to_string()))
    }
}

impl TryFrom<String> for RestartCondition {
    type Error = UnknownRestartCondition;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RestartCondition> for String {
    fn from(cond: RestartCondition) -> Self {
        cond.as_str().to_string()
    }
}

/// Everything needed to render the unit file for one app service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDescription {
    pub snap_name: String,
    pub app_name: String,
    pub version: String,
    pub revision: u64,
    pub description: String,
    /// Where the package is installed, e.g. /apps/app/1.0
    pub snap_path: String,
    /// Commands, relative to `snap_path`
    pub start: String,
    pub stop: String,
    pub post_stop: String,
    #[serde(with = "seconds")]
    pub stop_timeout: Duration,
    /// Sandbox profile the launcher applies
    pub aa_profile: String,
    /// Identifier handed to the launcher for device access
    pub udev_app_name: String,
    pub bus_name: Option<String>,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub restart: RestartCondition,
}

impl ServiceDescription {
    /// `<snap>_<app>_<version>.service`
    pub fn unit_file_name(&self) -> String {
        format!("{}_{}_{}.service", self.snap_name, self.app_name, self.version)
    }
}

/// Stop timeouts are written as (fractional) seconds in JSON descriptions
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
