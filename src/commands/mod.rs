//! CLI command handlers, one module per domain.
//!
//! Every handler follows the same shape: validate structured input, resolve
//! identifiers, act, print. Multi-identifier commands accumulate failures
//! through [`crate::exit_codes::Batch`] so one bad identifier does not
//! abort the rest.

pub mod apps;
pub mod cluster;
pub mod container;
pub mod image;
pub mod local;
pub mod login;
pub mod node;
pub mod service;
pub mod stack;
pub mod tag;
pub mod trigger;
pub mod volume;

use crate::config::Config;
use crate::engine::{ContainerEngine, DockerEngine};
use crate::error::{ConfigError, Result};
use crate::remote::client::PlatformClient;
use std::sync::Arc;

/// Client for commands that only make sense with an account.
pub(crate) fn platform_client(config: &Config) -> Result<PlatformClient> {
    let session = config.require_session()?;
    PlatformClient::new(&session)
}

/// Client for the dual-source commands, which degrade to local-only when no
/// account is configured.
pub(crate) fn platform_client_opt(config: &Config) -> Result<Option<PlatformClient>> {
    match config.session() {
        Some(session) => Ok(Some(PlatformClient::new(&session)?)),
        None => Ok(None),
    }
}

pub(crate) fn container_engine(config: &Config) -> Result<Arc<dyn ContainerEngine>> {
    let engine = DockerEngine::connect(config.local.docker_binary.as_deref())?;
    Ok(Arc::new(engine))
}

pub(crate) fn require_client(client: &Option<PlatformClient>) -> Result<&PlatformClient> {
    client
        .as_ref()
        .ok_or_else(|| ConfigError::MissingCredentials.into())
}
