//! Stack file loading.
//!
//! A stack file is a YAML mapping of service name to definition:
//!
//! ```yaml
//! web:
//!   image: acme/hello-world
//!   target_num_containers: 2
//!   ports:
//!     - "80/tcp"
//!   environment:
//!     - GREETING=hello
//!   links:
//!     - db
//! db:
//!   image: acme/postgres:16
//! ```

use crate::error::Result;
use crate::remote::types::{ServiceEnvVar, ServicePort};
use crate::validation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct StackServiceDef {
    pub image: String,
    #[serde(default)]
    pub target_num_containers: Option<u32>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub autorestart: Option<String>,
    #[serde(default)]
    pub autodestroy: Option<String>,
}

/// One service entry in the create-stack payload.
#[derive(Debug, Clone, Serialize)]
pub struct StackServicePayload {
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_num_containers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_ports: Vec<ServicePort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_envvars: Vec<ServiceEnvVar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_to_service: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorestart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autodestroy: Option<String>,
}

/// Payload for creating a stack.
#[derive(Debug, Clone, Serialize)]
pub struct NewStack {
    pub name: String,
    pub services: Vec<StackServicePayload>,
}

pub fn load(path: &Path, name: &str) -> Result<NewStack> {
    let content = std::fs::read_to_string(path)?;
    parse(&content, name)
}

pub fn parse(content: &str, name: &str) -> Result<NewStack> {
    let defs: BTreeMap<String, StackServiceDef> = serde_yaml::from_str(content)?;
    let mut services = Vec::with_capacity(defs.len());
    for (service_name, def) in defs {
        validation::parse_image_name(&def.image)?;
        services.push(StackServicePayload {
            name: service_name,
            image: def.image,
            target_num_containers: def.target_num_containers,
            run_command: def.command,
            entrypoint: def.entrypoint,
            container_ports: validation::parse_published_ports(&def.ports)?,
            container_envvars: validation::parse_envvars(&def.environment)?,
            linked_to_service: def.links,
            roles: def.roles,
            autorestart: def.autorestart,
            autodestroy: def.autodestroy,
        });
    }
    Ok(NewStack {
        name: name.to_string(),
        services,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
web:
  image: acme/hello-world
  target_num_containers: 2
  ports:
    - "80/tcp"
  environment:
    - GREETING=hello
  links:
    - db
db:
  image: acme/postgres:16
"#;

    #[test]
    fn test_parse_stackfile() {
        let stack = parse(SAMPLE, "demo").unwrap();
        assert_eq!(stack.name, "demo");
        assert_eq!(stack.services.len(), 2);

        // BTreeMap ordering: db before web
        assert_eq!(stack.services[0].name, "db");
        assert_eq!(stack.services[0].image, "acme/postgres:16");

        let web = &stack.services[1];
        assert_eq!(web.name, "web");
        assert_eq!(web.target_num_containers, Some(2));
        assert_eq!(web.container_ports[0].inner_port, 80);
        assert_eq!(web.container_envvars[0].key, "GREETING");
        assert_eq!(web.linked_to_service, vec!["db".to_string()]);
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        let bad = "web:\n  image: acme/hello-world\n  ports:\n    - \"80\"\n";
        assert!(parse(bad, "demo").is_err());
    }

    #[test]
    fn test_parse_rejects_unparseable_yaml() {
        assert!(parse("not: [valid", "demo").is_err());
    }
}
