//! Unit file generation
//!
//! Output is consumed verbatim by systemd, so the layout is fixed: every
//! optional directive keeps its line and renders empty when unset.

use super::{MountDescription, ServiceDescription};
use crate::arch;
use crate::config::{FRAMEWORKS_TARGET, GL_LIBRARY_DIR, LAUNCHER, SERVICE_TARGET, SNAP_DATA_DIR, SNAP_USER_DATA_DIR};

/// Render the `.service` unit for an app
pub fn service_unit(desc: &ServiceDescription) -> String {
    let data_dir = format!("{}/{}/{}", SNAP_DATA_DIR, desc.snap_name, desc.version);

    let exec_stop = optional_line("ExecStop", !desc.stop.is_empty(), || launch(desc, &desc.stop));
    let exec_stop_post = optional_line("ExecStopPost", !desc.post_stop.is_empty(), || {
        launch(desc, &desc.post_stop)
    });
    let timeout_stop = optional_line("TimeoutStopSec", !desc.stop_timeout.is_zero(), || {
        desc.stop_timeout.as_secs_f64().to_string()
    });
    let bus_name = match desc.bus_name.as_deref() {
        Some(name) if !name.is_empty() => format!("BusName={}", name),
        _ => String::new(),
    };

    format!(
        "[Unit]
Description={description}
After={frameworks}
Requires={frameworks}
X-Snappy=yes

[Service]
ExecStart={start}
Restart={restart}
WorkingDirectory={data_dir}
Environment={environment}
{exec_stop}
{exec_stop_post}
{timeout_stop}
Type={service_type}
{bus_name}

{install}",
        description = desc.description,
        frameworks = FRAMEWORKS_TARGET,
        start = launch(desc, &desc.start),
        restart = desc.restart,
        environment = environment(desc, &data_dir),
        service_type = desc.service_type.as_str(),
        install = install_section(),
    )
}

/// Render the `.mount` unit for a package image
pub fn mount_unit(mount: &MountDescription) -> String {
    format!(
        "[Unit]
Description=Squashfs mount unit for {}

[Mount]
What={}
Where={}

{}",
        mount.name,
        mount.what,
        mount.r#where,
        install_section()
    )
}

fn install_section() -> String {
    format!("[Install]\nWantedBy={}\n", SERVICE_TARGET)
}

/// `Key=value`, or an empty string so the line stays in place
fn optional_line(key: &str, present: bool, value: impl FnOnce() -> String) -> String {
    if present {
        format!("{}={}", key, value())
    } else {
        String::new()
    }
}

/// Wrap an app command in the confinement launcher
fn launch(desc: &ServiceDescription, command: &str) -> String {
    format!(
        "{} {} {} {}",
        LAUNCHER,
        desc.udev_app_name,
        desc.aa_profile,
        join_path(&desc.snap_path, command)
    )
}

/// Join two path fragments, skipping empty ones, and clean the result
/// lexically: repeated and trailing slashes and `.` segments are dropped,
/// `..` removes the segment before it.
fn join_path(base: &str, rest: &str) -> String {
    let joined = match (base.is_empty(), rest.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => rest.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, rest),
    };

    let rooted = joined.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let cleaned = segments.join("/");
    match (rooted, cleaned.is_empty()) {
        (true, _) => format!("/{}", cleaned),
        (false, true) => ".".to_string(),
        (false, false) => cleaned,
    }
}

/// Space separated, double quoted `KEY=value` pairs
fn environment(desc: &ServiceDescription, data_dir: &str) -> String {
    let revision = desc.revision.to_string();
    let shared_data = format!("{}/{}/shared", SNAP_DATA_DIR, desc.snap_name);
    let library_path = format!("{}:", GL_LIBRARY_DIR);
    let user_data = format!("{}/{}/{}", SNAP_USER_DATA_DIR, desc.snap_name, desc.version);
    let user_shared = format!("{}/{}/shared", SNAP_USER_DATA_DIR, desc.snap_name);

    let vars: [(&str, &str); 10] = [
        ("SNAP", desc.snap_path.as_str()),
        ("SNAP_DATA", data_dir),
        ("SNAP_SHARED_DATA", shared_data.as_str()),
        ("SNAP_NAME", desc.snap_name.as_str()),
        ("SNAP_VERSION", desc.version.as_str()),
        ("SNAP_REVISION", revision.as_str()),
        ("SNAP_ARCH", arch::ubuntu_architecture()),
        ("SNAP_LIBRARY_PATH", library_path.as_str()),
        ("SNAP_USER_DATA", user_data.as_str()),
        ("SNAP_USER_SHARED_DATA", user_shared.as_str()),
    ];

    vars.iter()
        .map(|(key, value)| format!("\"{}={}\"", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{RestartCondition, ServiceType};
    use std::time::Duration;

    fn expected_service(type_lines: &str) -> String {
        format!(
            r#"[Unit]
Description=descr
After=snapd.frameworks.target
Requires=snapd.frameworks.target
X-Snappy=yes

[Service]
ExecStart=/usr/bin/ubuntu-core-launcher app aa-profile /apps/app/1.0/bin/start
Restart=on-failure
WorkingDirectory=/var/apps/app/1.0
Environment="SNAP=/apps/app/1.0" "SNAP_DATA=/var/apps/app/1.0" "SNAP_SHARED_DATA=/var/apps/app/shared" "SNAP_NAME=app" "SNAP_VERSION=1.0" "SNAP_REVISION=44" "SNAP_ARCH={}" "SNAP_LIBRARY_PATH=/var/lib/snapd/lib/gl:" "SNAP_USER_DATA=/root/apps/app/1.0" "SNAP_USER_SHARED_DATA=/root/apps/app/shared"
ExecStop=/usr/bin/ubuntu-core-launcher app aa-profile /apps/app/1.0/bin/stop
ExecStopPost=/usr/bin/ubuntu-core-launcher app aa-profile /apps/app/1.0/bin/stop --post
TimeoutStopSec=10
{}

[Install]
WantedBy=multi-user.target
"#,
            arch::ubuntu_architecture(),
            type_lines
        )
    }

    fn app_description() -> ServiceDescription {
        ServiceDescription {
            snap_name: "app".into(),
            app_name: "service".into(),
            version: "1.0".into(),
            revision: 44,
            description: "descr".into(),
            snap_path: "/apps/app/1.0".into(),
            start: "bin/start".into(),
            stop: "bin/stop".into(),
            post_stop: "bin/stop --post".into(),
            stop_timeout: Duration::from_secs(10),
            aa_profile: "aa-profile".into(),
            udev_app_name: "app".into(),
            restart: RestartCondition::OnFailure,
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_service() {
        let desc = ServiceDescription {
            service_type: ServiceType::Simple,
            ..app_description()
        };
        assert_eq!(service_unit(&desc), expected_service("Type=simple\n"));
    }

    #[test]
    fn test_dbus_service() {
        let desc = ServiceDescription {
            service_type: ServiceType::Dbus,
            bus_name: Some("foo.bar.baz".into()),
            ..app_description()
        };
        assert_eq!(service_unit(&desc), expected_service("Type=dbus\nBusName=foo.bar.baz"));
    }

    #[test]
    fn test_other_types_follow_pattern() {
        let desc = ServiceDescription {
            service_type: ServiceType::Oneshot,
            ..app_description()
        };
        assert_eq!(service_unit(&desc), expected_service("Type=oneshot\n"));
    }

    #[test]
    fn test_restart_line_for_every_condition() {
        for cond in RestartCondition::all() {
            let desc = ServiceDescription {
                snap_name: "app".into(),
                restart: cond,
                ..Default::default()
            };
            let unit = service_unit(&desc);
            let line = format!("Restart={}", cond);
            assert!(unit.lines().any(|l| l == line), "missing {line}");
        }
    }

    #[test]
    fn test_fractional_stop_timeout() {
        let desc = ServiceDescription {
            stop_timeout: Duration::from_millis(1500),
            ..app_description()
        };
        assert!(service_unit(&desc).lines().any(|l| l == "TimeoutStopSec=1.5"));
    }

    #[test]
    fn test_optional_lines_stay_empty() {
        let desc = ServiceDescription {
            stop: String::new(),
            post_stop: String::new(),
            stop_timeout: Duration::ZERO,
            ..app_description()
        };
        let unit = service_unit(&desc);
        assert!(!unit.contains("ExecStop"));
        assert!(!unit.contains("TimeoutStopSec"));
        assert!(unit.contains("shared\"\n\n\n\nType=simple\n\n\n[Install]"));
    }

    #[test]
    fn test_launch_joins_paths() {
        let desc = ServiceDescription {
            snap_path: String::new(),
            ..app_description()
        };
        assert_eq!(
            launch(&desc, "bin/start"),
            "/usr/bin/ubuntu-core-launcher app aa-profile bin/start"
        );

        let desc = app_description();
        assert_eq!(
            launch(&desc, ""),
            "/usr/bin/ubuntu-core-launcher app aa-profile /apps/app/1.0"
        );
        assert_eq!(
            launch(&desc, "./bin//start"),
            "/usr/bin/ubuntu-core-launcher app aa-profile /apps/app/1.0/bin/start"
        );
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/apps/app/1.0/", "bin/start"), "/apps/app/1.0/bin/start");
        assert_eq!(join_path("", "bin/start"), "bin/start");
        assert_eq!(join_path("/apps/app/1.0", ""), "/apps/app/1.0");
        assert_eq!(join_path("/apps/app", "../other/bin"), "/apps/other/bin");
        assert_eq!(join_path("/", "../bin"), "/bin");
        assert_eq!(join_path("", "../bin"), "../bin");
        assert_eq!(join_path("", ""), "");
    }

    #[test]
    fn test_mount_unit() {
        let mount = MountDescription::new("foo", "/var/lib/snappy/snaps/foo_1.0.snap", "/apps/foo/1.0");
        assert_eq!(
            mount_unit(&mount),
            "[Unit]
Description=Squashfs mount unit for foo

[Mount]
What=/var/lib/snappy/snaps/foo_1.0.snap
Where=/apps/foo/1.0

[Install]
WantedBy=multi-user.target
"
        );
    }
}
