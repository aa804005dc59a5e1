//! Resource records fetched from the platform API.
//!
//! Records are plain serde structs; unknown payload fields are ignored so
//! the client stays tolerant of server-side additions. Types that users can
//! refer to by identifier implement [`Remote`], which is what the resolvers
//! in `crate::resolve` are generic over.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed domain categories of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Service,
    Container,
    Node,
    NodeCluster,
    Stack,
    Volume,
    VolumeGroup,
    Image,
    Trigger,
}

impl ResourceKind {
    /// URL path segment under `/api/v1/`.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Service => "service",
            ResourceKind::Container => "container",
            ResourceKind::Node => "node",
            ResourceKind::NodeCluster => "nodecluster",
            ResourceKind::Stack => "stack",
            ResourceKind::Volume => "volume",
            ResourceKind::VolumeGroup => "volumegroup",
            ResourceKind::Image => "image",
            ResourceKind::Trigger => "trigger",
        }
    }

    /// Human label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Service => "service",
            ResourceKind::Container => "container",
            ResourceKind::Node => "node",
            ResourceKind::NodeCluster => "node cluster",
            ResourceKind::Stack => "stack",
            ResourceKind::Volume => "volume",
            ResourceKind::VolumeGroup => "volume group",
            ResourceKind::Image => "image",
            ResourceKind::Trigger => "trigger",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record the platform API can fetch, list, create, save and delete.
pub trait Record: DeserializeOwned + Send + 'static {
    const KIND: ResourceKind;
}

/// A record that can be resolved from a user-supplied identifier.
pub trait Remote: Record {
    /// Query-string field used for exact name matches.
    const NAME_FILTER: &'static str;

    fn uuid(&self) -> &str;
    fn display_name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub target_num_containers: u32,
    #[serde(default)]
    pub current_num_containers: u32,
    #[serde(default)]
    pub run_command: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub cpu_shares: Option<i64>,
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default)]
    pub container_ports: Vec<ServicePort>,
    #[serde(default)]
    pub container_envvars: Vec<ServiceEnvVar>,
    #[serde(default)]
    pub linked_to_service: Vec<ServiceLink>,
    #[serde(default)]
    pub autorestart: Option<String>,
    #[serde(default)]
    pub autodestroy: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub sequential_deployment: bool,
    #[serde(default)]
    pub deployed_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_dns: Option<String>,
}

impl Record for Service {
    const KIND: ResourceKind = ResourceKind::Service;
}

impl Remote for Service {
    const NAME_FILTER: &'static str = "name";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub run_command: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub container_ports: Vec<ServicePort>,
    #[serde(default)]
    pub exit_code: Option<i64>,
    #[serde(default)]
    pub deployed_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_dns: Option<String>,
    /// Resource URI of the owning service.
    #[serde(default)]
    pub service: Option<String>,
}

impl Record for Container {
    const KIND: ResourceKind = ResourceKind::Container;
}

impl Remote for Container {
    const NAME_FILTER: &'static str = "name";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub uuid: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub external_fqdn: Option<String>,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub node_cluster: Option<String>,
    #[serde(default)]
    pub docker_version: Option<String>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deployed_datetime: Option<DateTime<Utc>>,
}

impl Record for Node {
    const KIND: ResourceKind = ResourceKind::Node;
}

impl Remote for Node {
    // Nodes have no free-form name; the FQDN is the closest thing.
    const NAME_FILTER: &'static str = "external_fqdn";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        self.external_fqdn.as_deref().unwrap_or(&self.uuid)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCluster {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub target_num_nodes: u32,
    #[serde(default)]
    pub current_num_nodes: u32,
    #[serde(default)]
    pub deployed_datetime: Option<DateTime<Utc>>,
}

impl Record for NodeCluster {
    const KIND: ResourceKind = ResourceKind::NodeCluster;
}

impl Remote for NodeCluster {
    const NAME_FILTER: &'static str = "name";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub deployed_datetime: Option<DateTime<Utc>>,
}

impl Record for Stack {
    const KIND: ResourceKind = ResourceKind::Stack;
}

impl Remote for Stack {
    const NAME_FILTER: &'static str = "name";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub volume_group: Option<String>,
}

impl Record for Volume {
    const KIND: ResourceKind = ResourceKind::Volume;
}

impl Remote for Volume {
    const NAME_FILTER: &'static str = "name";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeGroup {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub volumes: Vec<String>,
}

impl Record for VolumeGroup {
    const KIND: ResourceKind = ResourceKind::VolumeGroup;
}

impl Remote for VolumeGroup {
    const NAME_FILTER: &'static str = "name";

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Registry image. Addressed by name, not uuid, so it is a [`Record`] only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub in_use: bool,
}

impl Record for Image {
    const KIND: ResourceKind = ResourceKind::Image;
}

/// Redeploy trigger, nested under a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub url: String,
}

impl Record for Trigger {
    const KIND: ResourceKind = ResourceKind::Trigger;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    #[serde(default)]
    pub protocol: String,
    pub inner_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_port: Option<u16>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEnvVar {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub to_service: String,
}

/// Payload for creating a service.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NewService {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_num_containers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_ports: Vec<ServicePort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_envvars: Vec<ServiceEnvVar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_to_service: Vec<ServiceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorestart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autodestroy: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequential_deployment: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Payload for creating a node cluster.
#[derive(Debug, Clone, Serialize)]
pub struct NewNodeCluster {
    pub name: String,
    pub provider: String,
    pub region: String,
    pub node_type: String,
    pub target_num_nodes: u32,
}

/// Payload for creating a trigger under a service.
#[derive(Debug, Clone, Serialize)]
pub struct NewTrigger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub operation: String,
}
