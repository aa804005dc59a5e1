//! Shared test helpers: a scripted container engine.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fleetctl::engine::{ContainerDetails, ContainerEngine, CreateContainerOptions, PortBinding};
use fleetctl::error::{FleetctlError, Result};
use std::collections::BTreeMap;

/// In-memory engine that serves a fixed set of inspection records.
#[derive(Default)]
pub struct FakeEngine {
    containers: Vec<ContainerDetails>,
    /// Ids returned by the listing that inspection then fails on.
    phantom_ids: Vec<String>,
    unreachable: bool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, details: ContainerDetails) -> Self {
        self.containers.push(details);
        self
    }

    /// Add an id that lists fine but fails inspection.
    pub fn with_phantom_id(mut self, id: &str) -> Self {
        self.phantom_ids.push(id.to_string());
        self
    }
}

impl ContainerEngine for FakeEngine {
    fn list_container_ids(&self) -> Result<Vec<String>> {
        if self.unreachable {
            return Err(FleetctlError::EngineUnavailable(
                "cannot reach the Docker daemon (is it running?)".to_string(),
            ));
        }
        let mut ids: Vec<String> = self.containers.iter().map(|c| c.id.clone()).collect();
        ids.extend(self.phantom_ids.iter().cloned());
        Ok(ids)
    }

    fn inspect(&self, id: &str) -> Result<ContainerDetails> {
        self.containers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| FleetctlError::Engine(format!("no such container: {}", id)))
    }

    fn start(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn stop(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn kill(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn pull(&self, _image: &str) -> Result<()> {
        Ok(())
    }

    fn create(&self, options: &CreateContainerOptions) -> Result<String> {
        Ok(format!("created-{}", options.name))
    }

    fn logs(&self, id: &str) -> Result<String> {
        Ok(format!("logs of {}\n", id))
    }
}

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap()
}

/// An inspection record that passes the managed-container checks.
pub fn managed_container(
    name: &str,
    id: &str,
    cpu_shares: i64,
    memory: i64,
    running: bool,
    exit_code: i64,
) -> ContainerDetails {
    ContainerDetails {
        id: id.to_string(),
        name: name.to_string(),
        image: "acme/hello-world:latest".to_string(),
        command: vec!["run.sh".to_string()],
        entrypoint: Vec::new(),
        env: vec!["GREETING=hello".to_string()],
        cpu_shares: Some(cpu_shares),
        memory: Some(memory),
        running,
        exit_code,
        created: fixed_instant() - chrono::Duration::hours(2),
        port_bindings: BTreeMap::new(),
    }
}

pub fn with_port_binding(mut details: ContainerDetails, port: &str, host_port: &str) -> ContainerDetails {
    details.port_bindings.insert(
        port.to_string(),
        vec![PortBinding {
            host_ip: "0.0.0.0".to_string(),
            host_port: host_port.to_string(),
        }],
    );
    details
}
