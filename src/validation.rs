//! Input validation utilities.
//!
//! Structured arguments are rejected with `BadParameter` before any
//! resolution or API traffic happens.

use crate::error::{FleetctlError, Result};
use crate::remote::types::{ServiceEnvVar, ServicePort};
use regex::{Captures, Regex};

const EXPOSED_PORT_PATTERN: &str = r"^([0-9]{1,5})/(tcp|udp)$";
const PUBLISHED_PORT_PATTERN: &str = r"^(?:([0-9]{1,5}):)?([0-9]{1,5})/(tcp|udp)$";
const ENVVAR_PATTERN: &str = r"^[a-zA-Z_]+[a-zA-Z0-9_]*=[^?!=]+$";
const IMAGE_NAME_PATTERN: &str = r"^(?P<full_name>((?P<registry_host>[a-z0-9\.\-]+\.[a-z0-9\.\-]+)/)?(?P<name_without_host>((?P<namespace>[a-z0-9\.\-]+)/)?(?P<short_name>[a-z0-9\.\-_]+)))(:(?P<tag>[a-z0-9\.\-]+))?$";

fn captures<'t>(pattern: &str, text: &'t str) -> Option<Captures<'t>> {
    Regex::new(pattern).ok()?.captures(text)
}

fn parse_port_number(text: &str, argument: &str) -> Result<u16> {
    text.parse::<u16>().map_err(|_| {
        FleetctlError::BadParameter(format!(
            "port number in '{}' is out of range (1-65535)",
            argument
        ))
    })
}

/// Parse one exposed-port argument, `80/tcp`.
pub fn parse_exposed_port(value: &str) -> Result<ServicePort> {
    let Some(caps) = captures(EXPOSED_PORT_PATTERN, value) else {
        return Err(FleetctlError::BadParameter(format!(
            "port argument '{}' does not match 'port/protocol', example: 80/tcp",
            value
        )));
    };
    Ok(ServicePort {
        protocol: caps[2].to_string(),
        inner_port: parse_port_number(&caps[1], value)?,
        outer_port: None,
        published: false,
    })
}

pub fn parse_exposed_ports(values: &[String]) -> Result<Vec<ServicePort>> {
    values.iter().map(|v| parse_exposed_port(v)).collect()
}

/// Parse one published-port argument, `80/tcp` or `8080:80/tcp`.
pub fn parse_published_port(value: &str) -> Result<ServicePort> {
    let Some(caps) = captures(PUBLISHED_PORT_PATTERN, value) else {
        return Err(FleetctlError::BadParameter(format!(
            "port argument '{}' does not match '[host:]port/protocol', example: 80/tcp",
            value
        )));
    };
    let outer_port = match caps.get(1) {
        Some(outer) => Some(parse_port_number(outer.as_str(), value)?),
        None => None,
    };
    Ok(ServicePort {
        protocol: caps[3].to_string(),
        inner_port: parse_port_number(&caps[2], value)?,
        outer_port,
        published: true,
    })
}

pub fn parse_published_ports(values: &[String]) -> Result<Vec<ServicePort>> {
    values.iter().map(|v| parse_published_port(v)).collect()
}

/// Published ports win over exposed ones on the same inner port.
pub fn merge_ports(published: Vec<ServicePort>, exposed: Vec<ServicePort>) -> Vec<ServicePort> {
    let mut ports = published;
    for port in exposed {
        if !ports.iter().any(|p| p.inner_port == port.inner_port) {
            ports.push(port);
        }
    }
    ports
}

/// Parse one `KEY=VALUE` environment variable argument.
pub fn parse_envvar(value: &str) -> Result<ServiceEnvVar> {
    if captures(ENVVAR_PATTERN, value).is_none() {
        return Err(FleetctlError::BadParameter(format!(
            "environment variable argument '{}' does not match 'KEY=VALUE', example: ENVVAR=foo",
            value
        )));
    }
    // the pattern guarantees one '='
    let (key, val) = value.split_once('=').unwrap_or((value, ""));
    Ok(ServiceEnvVar {
        key: key.to_string(),
        value: val.to_string(),
    })
}

pub fn parse_envvars(values: &[String]) -> Result<Vec<ServiceEnvVar>> {
    values.iter().map(|v| parse_envvar(v)).collect()
}

/// Components of a parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    pub full_name: String,
    pub registry_host: Option<String>,
    pub namespace: Option<String>,
    pub short_name: String,
    pub tag: Option<String>,
}

impl ImageName {
    /// Reference with an explicit tag, defaulting to `latest`.
    pub fn with_tag(&self) -> String {
        format!(
            "{}:{}",
            self.full_name,
            self.tag.as_deref().unwrap_or("latest")
        )
    }
}

/// Parse `[registry/][namespace/]name[:tag]`.
pub fn parse_image_name(value: &str) -> Result<ImageName> {
    let Some(caps) = captures(IMAGE_NAME_PATTERN, value) else {
        return Err(FleetctlError::BadParameter(format!(
            "invalid image name '{}'",
            value
        )));
    };
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
    Ok(ImageName {
        full_name: group("full_name").unwrap_or_default(),
        registry_host: group("registry_host"),
        namespace: group("namespace"),
        short_name: group("short_name").unwrap_or_default(),
        tag: group("tag"),
    })
}
