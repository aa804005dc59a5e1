//! Local inventory: the containers this tool manages on the local engine,
//! grouped into application aggregates.
//!
//! Only containers that follow the `local-<app>-<index>` naming convention
//! *and* whose cpu-share and memory limits agree on one size bucket belong
//! to the inventory; everything else on the engine is somebody else's.
//! The inventory is rebuilt from scratch on every call — there is no cache
//! to go stale — and a single failing inspection aborts the whole build.

use crate::engine::{ContainerEngine, PortBinding};
use crate::error::Result;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Name prefix marking a container as managed by this tool.
pub const LOCAL_NAME_PREFIX: &str = "local-";

const LOCAL_NAME_PATTERN: &str = r"^local-([a-zA-Z0-9_\-]+)-([0-9]+)$";

/// Fixed size buckets. A container must match one bucket on *both* its
/// cpu-share and memory values to count as managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerSize {
    XS,
    S,
    M,
    L,
    XL,
}

impl ContainerSize {
    pub const ALL: [ContainerSize; 5] = [
        ContainerSize::XS,
        ContainerSize::S,
        ContainerSize::M,
        ContainerSize::L,
        ContainerSize::XL,
    ];

    pub fn cpu_shares(self) -> i64 {
        match self {
            ContainerSize::XS => 256,
            ContainerSize::S => 512,
            ContainerSize::M => 1024,
            ContainerSize::L => 2048,
            ContainerSize::XL => 4096,
        }
    }

    pub fn memory_bytes(self) -> i64 {
        match self {
            ContainerSize::XS => 268_435_456,
            ContainerSize::S => 536_870_912,
            ContainerSize::M => 1_073_741_824,
            ContainerSize::L => 2_147_483_648,
            ContainerSize::XL => 4_294_967_286,
        }
    }

    pub fn from_cpu_shares(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.cpu_shares() == value)
    }

    pub fn from_memory(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.memory_bytes() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerSize::XS => "XS",
            ContainerSize::S => "S",
            ContainerSize::M => "M",
            ContainerSize::L => "L",
            ContainerSize::XL => "XL",
        }
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContainerSize {
    type Err = crate::error::FleetctlError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                crate::error::FleetctlError::BadParameter(format!(
                    "unknown container size '{}', expected one of XS, S, M, L, XL",
                    value
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerStatus {
    Running,
    Stopped,
    #[serde(rename = "Stopped with errors")]
    StoppedWithErrors,
}

impl ContainerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerStatus::Running => "Running",
            ContainerStatus::Stopped => "Stopped",
            ContainerStatus::StoppedWithErrors => "Stopped with errors",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplicationStatus {
    Running,
    #[serde(rename = "Partly running")]
    PartlyRunning,
    Stopped,
    #[serde(rename = "Stopped with errors")]
    StoppedWithErrors,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Running => "Running",
            ApplicationStatus::PartlyRunning => "Partly running",
            ApplicationStatus::Stopped => "Stopped",
            ApplicationStatus::StoppedWithErrors => "Stopped with errors",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalContainer {
    pub app_name: String,
    pub name: String,
    /// Engine-assigned id, used as the container's uuid for resolution.
    pub id: String,
    pub status: ContainerStatus,
    pub image: String,
    pub run_command: String,
    pub entrypoint: String,
    pub size: ContainerSize,
    pub exit_code: i64,
    pub env: Vec<String>,
    pub ports: String,
    pub deployed: DateTime<Utc>,
}

/// Computed grouping of local containers by application name. Never
/// persisted; exists only for the lifetime of one inventory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalApplication {
    pub name: String,
    pub status: ApplicationStatus,
    pub image: String,
    pub size: ContainerSize,
    pub deployed: DateTime<Utc>,
    pub containers: Vec<LocalContainer>,
}

/// Build the inventory from the engine's current state.
pub fn build(engine: &dyn ContainerEngine) -> Result<BTreeMap<String, LocalApplication>> {
    build_at(engine, Utc::now())
}

/// Same as [`build`] with the invocation instant pinned, so tests can hold
/// "now" fixed.
pub fn build_at(
    engine: &dyn ContainerEngine,
    now: DateTime<Utc>,
) -> Result<BTreeMap<String, LocalApplication>> {
    let ids = engine.list_container_ids()?;
    let mut apps: BTreeMap<String, LocalApplication> = BTreeMap::new();

    for id in ids {
        let details = engine.inspect(&id)?;

        let Some(app_name) = app_name_from_container_name(&details.name) else {
            continue;
        };
        let by_cpu = details.cpu_shares.and_then(ContainerSize::from_cpu_shares);
        let by_memory = details.memory.and_then(ContainerSize::from_memory);
        let size = match (by_cpu, by_memory) {
            (Some(a), Some(b)) if a == b => a,
            // cpu and memory disagree, or either is off the table: not ours
            _ => continue,
        };

        let status = if details.running {
            ContainerStatus::Running
        } else if details.exit_code != 0 {
            ContainerStatus::StoppedWithErrors
        } else {
            ContainerStatus::Stopped
        };

        let container = LocalContainer {
            app_name: app_name.clone(),
            name: details.name.clone(),
            id: details.id.clone(),
            status,
            image: details.image.clone(),
            run_command: details.command.join(" "),
            entrypoint: details.entrypoint.join(" "),
            size,
            exit_code: details.exit_code,
            env: details.env.clone(),
            ports: published_ports_display(&details.port_bindings),
            deployed: details.created,
        };

        let app = apps.entry(app_name.clone()).or_insert_with(|| LocalApplication {
            name: app_name.clone(),
            status: ApplicationStatus::Stopped,
            image: container.image.clone(),
            size: container.size,
            // capped at the invocation instant, min'ed below
            deployed: now,
            containers: Vec::new(),
        });
        if container.deployed < app.deployed {
            app.deployed = container.deployed;
        }
        app.containers.push(container);
    }

    for app in apps.values_mut() {
        app.status = aggregate_status(&app.containers);
    }
    Ok(apps)
}

/// Parse `local-<app>-<index>` into the application name; `None` means the
/// container does not belong to this tool.
pub fn app_name_from_container_name(name: &str) -> Option<String> {
    let caps = Regex::new(LOCAL_NAME_PATTERN).ok()?.captures(name)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Engine-side name of member `index` of application `app`.
pub fn local_container_name(app: &str, index: usize) -> String {
    format!("{}{}-{}", LOCAL_NAME_PREFIX, app, index)
}

/// First unused application name derived from `desired`.
pub fn unique_app_name(inventory: &BTreeMap<String, LocalApplication>, desired: &str) -> String {
    if !inventory.contains_key(desired) {
        return desired.to_string();
    }
    let mut i = 1;
    loop {
        let candidate = format!("{}-{}", desired, i);
        if !inventory.contains_key(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

fn aggregate_status(containers: &[LocalContainer]) -> ApplicationStatus {
    let running = containers
        .iter()
        .filter(|c| c.status == ContainerStatus::Running)
        .count();
    let stopped = containers
        .iter()
        .filter(|c| c.status == ContainerStatus::Stopped)
        .count();
    let errored = containers
        .iter()
        .filter(|c| c.status == ContainerStatus::StoppedWithErrors)
        .count();

    if running > 0 {
        if stopped == 0 && errored == 0 {
            ApplicationStatus::Running
        } else {
            ApplicationStatus::PartlyRunning
        }
    } else if stopped == 0 && errored > 0 {
        ApplicationStatus::StoppedWithErrors
    } else {
        ApplicationStatus::Stopped
    }
}

fn published_ports_display(bindings: &BTreeMap<String, Vec<PortBinding>>) -> String {
    let mut parts = Vec::new();
    for (port, entries) in bindings {
        for binding in entries {
            parts.push(format!("{}:{}->{}", binding.host_ip, binding.host_port, port));
        }
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn container(status: ContainerStatus) -> LocalContainer {
        LocalContainer {
            app_name: "web".to_string(),
            name: "local-web-1".to_string(),
            id: "deadbeef".to_string(),
            status,
            image: "acme/hello-world:latest".to_string(),
            run_command: String::new(),
            entrypoint: String::new(),
            size: ContainerSize::XS,
            exit_code: 0,
            env: Vec::new(),
            ports: String::new(),
            deployed: Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_size_table() {
        assert_eq!(ContainerSize::from_cpu_shares(256), Some(ContainerSize::XS));
        assert_eq!(
            ContainerSize::from_memory(268_435_456),
            Some(ContainerSize::XS)
        );
        assert_eq!(ContainerSize::from_cpu_shares(4096), Some(ContainerSize::XL));
        assert_eq!(
            ContainerSize::from_memory(4_294_967_286),
            Some(ContainerSize::XL)
        );
        assert_eq!(ContainerSize::from_cpu_shares(300), None);
        assert_eq!(ContainerSize::from_memory(0), None);
    }

    #[test]
    fn test_size_from_str() {
        assert_eq!("xs".parse::<ContainerSize>().unwrap(), ContainerSize::XS);
        assert_eq!("L".parse::<ContainerSize>().unwrap(), ContainerSize::L);
        assert!("XXL".parse::<ContainerSize>().is_err());
    }

    #[test]
    fn test_app_name_parsing() {
        assert_eq!(
            app_name_from_container_name("local-web-1"),
            Some("web".to_string())
        );
        assert_eq!(
            app_name_from_container_name("local-my-app-2-10"),
            Some("my-app-2".to_string())
        );
        assert_eq!(app_name_from_container_name("local-web"), None);
        assert_eq!(app_name_from_container_name("web-1"), None);
        assert_eq!(app_name_from_container_name("registryproxy"), None);
    }

    #[test]
    fn test_aggregate_status_majority_rule() {
        use ContainerStatus::*;

        let all_running = vec![container(Running), container(Running)];
        assert_eq!(aggregate_status(&all_running), ApplicationStatus::Running);

        let mixed = vec![container(Running), container(Stopped)];
        assert_eq!(aggregate_status(&mixed), ApplicationStatus::PartlyRunning);

        let errored = vec![container(StoppedWithErrors), container(StoppedWithErrors)];
        assert_eq!(
            aggregate_status(&errored),
            ApplicationStatus::StoppedWithErrors
        );

        let stopped_and_errored = vec![container(Stopped), container(StoppedWithErrors)];
        assert_eq!(
            aggregate_status(&stopped_and_errored),
            ApplicationStatus::Stopped
        );

        let running_and_errored = vec![container(Running), container(StoppedWithErrors)];
        assert_eq!(
            aggregate_status(&running_and_errored),
            ApplicationStatus::PartlyRunning
        );
    }

    #[test]
    fn test_published_ports_display() {
        let mut bindings = BTreeMap::new();
        bindings.insert(
            "80/tcp".to_string(),
            vec![PortBinding {
                host_ip: "0.0.0.0".to_string(),
                host_port: "32768".to_string(),
            }],
        );
        bindings.insert(
            "53/udp".to_string(),
            vec![PortBinding {
                host_ip: "127.0.0.1".to_string(),
                host_port: "5353".to_string(),
            }],
        );
        assert_eq!(
            published_ports_display(&bindings),
            "127.0.0.1:5353->53/udp, 0.0.0.0:32768->80/tcp"
        );
        assert_eq!(published_ports_display(&BTreeMap::new()), "");
    }

    #[test]
    fn test_unique_app_name() {
        let mut inventory = BTreeMap::new();
        assert_eq!(unique_app_name(&inventory, "web"), "web");

        let app = LocalApplication {
            name: "web".to_string(),
            status: ApplicationStatus::Running,
            image: "acme/hello-world:latest".to_string(),
            size: ContainerSize::XS,
            deployed: Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap(),
            containers: Vec::new(),
        };
        inventory.insert("web".to_string(), app.clone());
        assert_eq!(unique_app_name(&inventory, "web"), "web-1");

        inventory.insert("web-1".to_string(), app);
        assert_eq!(unique_app_name(&inventory, "web"), "web-2");
    }

    #[test]
    fn test_local_container_name() {
        assert_eq!(local_container_name("web", 1), "local-web-1");
        assert_eq!(local_container_name("my-app", 12), "local-my-app-12");
    }
}
