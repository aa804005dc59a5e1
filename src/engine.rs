//! Local container engine capability.
//!
//! fleetctl drives the engine through the `docker` CLI: every call shells
//! out and, where the CLI prints JSON, parses it with serde. The trait keeps
//! the inventory builder and the local resolver testable against a scripted
//! engine.

use crate::error::{FleetctlError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// What resolution and inventory building need from the engine, plus the
/// lifecycle calls the local command handlers use.
pub trait ContainerEngine: Send + Sync {
    /// Ids of all containers, running or not.
    fn list_container_ids(&self) -> Result<Vec<String>>;
    fn inspect(&self, id: &str) -> Result<ContainerDetails>;
    fn start(&self, id: &str) -> Result<()>;
    fn stop(&self, id: &str) -> Result<()>;
    fn kill(&self, id: &str) -> Result<()>;
    fn remove(&self, id: &str) -> Result<()>;
    fn pull(&self, image: &str) -> Result<()>;
    fn create(&self, options: &CreateContainerOptions) -> Result<String>;
    fn logs(&self, id: &str) -> Result<String>;
}

/// Flattened `docker inspect` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerDetails {
    pub id: String,
    /// Engine-assigned name without the leading slash.
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub entrypoint: Vec<String>,
    pub env: Vec<String>,
    pub cpu_shares: Option<i64>,
    pub memory: Option<i64>,
    pub running: bool,
    pub exit_code: i64,
    pub created: DateTime<Utc>,
    pub port_bindings: BTreeMap<String, Vec<PortBinding>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortBinding {
    pub host_ip: String,
    pub host_port: String,
}

#[derive(Debug, Clone, Default)]
pub struct CreateContainerOptions {
    pub name: String,
    /// Full image reference, `image:tag`.
    pub image: String,
    pub run_command: Option<String>,
    pub entrypoint: Option<String>,
    pub cpu_shares: i64,
    pub memory: i64,
    pub env: Vec<String>,
    pub expose: Vec<u16>,
    /// Values passed straight to `-p`.
    pub publish: Vec<String>,
    /// `name:alias` pairs for legacy container links.
    pub links: Vec<String>,
}

pub struct DockerEngine {
    binary: PathBuf,
}

impl DockerEngine {
    /// Locate the docker binary and verify the daemon answers.
    pub fn connect(binary: Option<&Path>) -> Result<Self> {
        let binary = match binary {
            Some(path) => path.to_path_buf(),
            None => which::which("docker").map_err(|_| {
                FleetctlError::EngineUnavailable("docker binary not found in PATH".to_string())
            })?,
        };
        let engine = Self { binary };
        engine
            .run(&["version", "--format", "{{.Server.Version}}"])
            .map_err(|_| {
                FleetctlError::EngineUnavailable(
                    "cannot reach the Docker daemon (is it running?)".to_string(),
                )
            })?;
        Ok(engine)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        debug!("docker {}", args.join(" "));
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(FleetctlError::Io)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FleetctlError::Engine(format!(
                "docker {} failed: {}",
                args.first().copied().unwrap_or(""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_owned(&self, args: &[String]) -> Result<String> {
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&refs)
    }
}

impl ContainerEngine for DockerEngine {
    fn list_container_ids(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["ps", "-a", "-q", "--no-trunc"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn inspect(&self, id: &str) -> Result<ContainerDetails> {
        let stdout = self.run(&["inspect", id])?;
        let records: Vec<InspectRecord> = serde_json::from_str(&stdout)?;
        records
            .into_iter()
            .next()
            .map(InspectRecord::into_details)
            .ok_or_else(|| FleetctlError::Engine(format!("no such container: {}", id)))
    }

    fn start(&self, id: &str) -> Result<()> {
        self.run(&["start", id]).map(|_| ())
    }

    fn stop(&self, id: &str) -> Result<()> {
        self.run(&["stop", id]).map(|_| ())
    }

    fn kill(&self, id: &str) -> Result<()> {
        self.run(&["kill", id]).map(|_| ())
    }

    fn remove(&self, id: &str) -> Result<()> {
        // A running container refuses a plain rm; kill it and retry.
        if self.run(&["rm", id]).is_ok() {
            return Ok(());
        }
        self.run(&["kill", id])?;
        self.run(&["rm", id])?;
        Ok(())
    }

    fn pull(&self, image: &str) -> Result<()> {
        self.run(&["pull", image]).map(|_| ())
    }

    fn create(&self, options: &CreateContainerOptions) -> Result<String> {
        let mut args: Vec<String> = vec![
            "create".to_string(),
            "--name".to_string(),
            options.name.clone(),
            "--cpu-shares".to_string(),
            options.cpu_shares.to_string(),
            "--memory".to_string(),
            options.memory.to_string(),
        ];
        for env in &options.env {
            args.push("-e".to_string());
            args.push(env.clone());
        }
        for port in &options.expose {
            args.push("--expose".to_string());
            args.push(port.to_string());
        }
        for publish in &options.publish {
            args.push("-p".to_string());
            args.push(publish.clone());
        }
        for link in &options.links {
            args.push("--link".to_string());
            args.push(link.clone());
        }
        if let Some(entrypoint) = &options.entrypoint {
            args.push("--entrypoint".to_string());
            args.push(entrypoint.clone());
        }
        args.push(options.image.clone());
        if let Some(command) = &options.run_command {
            args.extend(command.split_whitespace().map(String::from));
        }
        let stdout = self.run_owned(&args)?;
        Ok(stdout.trim().to_string())
    }

    fn logs(&self, id: &str) -> Result<String> {
        self.run(&["logs", id])
    }
}

#[derive(Debug, Deserialize)]
struct InspectRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Created")]
    created: DateTime<Utc>,
    #[serde(rename = "Config")]
    config: InspectConfig,
    #[serde(rename = "State")]
    state: InspectState,
    #[serde(rename = "HostConfig")]
    host_config: InspectHostConfig,
}

#[derive(Debug, Deserialize)]
struct InspectConfig {
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Cmd")]
    cmd: Option<Vec<String>>,
    #[serde(rename = "Entrypoint")]
    entrypoint: Option<Vec<String>>,
    #[serde(rename = "Env")]
    env: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct InspectState {
    #[serde(rename = "Running")]
    running: bool,
    #[serde(rename = "ExitCode")]
    exit_code: i64,
}

#[derive(Debug, Deserialize)]
struct InspectHostConfig {
    #[serde(rename = "CpuShares")]
    cpu_shares: Option<i64>,
    #[serde(rename = "Memory")]
    memory: Option<i64>,
    #[serde(rename = "PortBindings")]
    port_bindings: Option<BTreeMap<String, Option<Vec<InspectPortBinding>>>>,
}

#[derive(Debug, Deserialize)]
struct InspectPortBinding {
    #[serde(rename = "HostIp")]
    host_ip: Option<String>,
    #[serde(rename = "HostPort")]
    host_port: Option<String>,
}

impl InspectRecord {
    fn into_details(self) -> ContainerDetails {
        let mut port_bindings = BTreeMap::new();
        if let Some(bindings) = self.host_config.port_bindings {
            for (port, entries) in bindings {
                let entries = entries
                    .unwrap_or_default()
                    .into_iter()
                    .map(|b| PortBinding {
                        host_ip: b.host_ip.unwrap_or_default(),
                        host_port: b.host_port.unwrap_or_default(),
                    })
                    .collect();
                port_bindings.insert(port, entries);
            }
        }
        ContainerDetails {
            id: self.id,
            name: self.name.trim_start_matches('/').to_string(),
            image: self.config.image,
            command: self.config.cmd.unwrap_or_default(),
            entrypoint: self.config.entrypoint.unwrap_or_default(),
            env: self.config.env.unwrap_or_default(),
            cpu_shares: self.host_config.cpu_shares,
            memory: self.host_config.memory,
            running: self.state.running,
            exit_code: self.state.exit_code,
            created: self.created,
            port_bindings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_record_parsing() {
        let raw = r#"[{
            "Id": "deadbeef",
            "Name": "/local-web-1",
            "Created": "2026-05-04T12:00:00.000000000Z",
            "Config": {
                "Image": "acme/hello-world:latest",
                "Cmd": ["run.sh"],
                "Entrypoint": null,
                "Env": ["PATH=/usr/bin"]
            },
            "State": {"Running": false, "ExitCode": 137},
            "HostConfig": {
                "CpuShares": 256,
                "Memory": 268435456,
                "PortBindings": {
                    "80/tcp": [{"HostIp": "0.0.0.0", "HostPort": "32768"}]
                }
            }
        }]"#;
        let records: Vec<InspectRecord> = serde_json::from_str(raw).unwrap();
        let details = records.into_iter().next().unwrap().into_details();
        assert_eq!(details.name, "local-web-1");
        assert_eq!(details.cpu_shares, Some(256));
        assert!(!details.running);
        assert_eq!(details.exit_code, 137);
        assert_eq!(details.entrypoint, Vec::<String>::new());
        let bindings = &details.port_bindings["80/tcp"];
        assert_eq!(bindings[0].host_port, "32768");
    }

    #[test]
    fn test_inspect_record_null_bindings() {
        let raw = r#"[{
            "Id": "cafe",
            "Name": "/local-db-1",
            "Created": "2026-05-04T12:00:00Z",
            "Config": {"Image": "acme/db", "Cmd": null, "Entrypoint": null, "Env": null},
            "State": {"Running": true, "ExitCode": 0},
            "HostConfig": {"CpuShares": 512, "Memory": 536870912, "PortBindings": null}
        }]"#;
        let records: Vec<InspectRecord> = serde_json::from_str(raw).unwrap();
        let details = records.into_iter().next().unwrap().into_details();
        assert!(details.running);
        assert!(details.port_bindings.is_empty());
    }
}
