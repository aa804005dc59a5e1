//! Identifier resolution.
//!
//! Three resolvers share one uniqueness contract: an identifier must match
//! exactly one candidate across every source consulted, otherwise the user
//! gets a precise "not found" or "use the long uuid" answer.
//!
//! - [`resolve_remote`] looks one resource kind up on the platform,
//!   branching on the identifier classification: full UUIDs are fetched by
//!   id, everything else goes through the name and uuid-prefix searches.
//! - [`resolve_local`] searches a freshly built local inventory for an
//!   application or container match.
//! - [`resolve_app_or_container`] fans out remote-service, remote-container
//!   and local lookups concurrently, joins all three, and merges them.
//! - [`resolve_taggable`] tries service, node cluster and node in that
//!   fixed priority order.
//!
//! Outcomes travel as [`Resolution`] values between resolvers (merge mode)
//! and only become errors at a strict entry point. Transport and engine
//! failures are errors everywhere; they never collapse into `NotFound`.

use crate::engine::ContainerEngine;
use crate::error::{FleetctlError, Result};
use crate::identifier::{classify, IdentifierKind};
use crate::inventory::{self, LocalApplication, LocalContainer};
use crate::remote::client::PlatformClient;
use crate::remote::types::{Container, Node, NodeCluster, Remote, ResourceKind, Service};
use std::sync::Arc;
use tracing::debug;

/// Outcome of one lookup in merge mode.
#[derive(Debug, Clone)]
pub enum Resolution<T> {
    NotFound,
    NonUnique,
    Resolved(T),
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Strict mode: absence and ambiguity become errors.
    pub fn into_strict(self, kind: &str, identifier: &str) -> Result<T> {
        match self {
            Resolution::Resolved(value) => Ok(value),
            Resolution::NotFound => Err(FleetctlError::not_found(kind, identifier)),
            Resolution::NonUnique => Err(FleetctlError::non_unique(kind, identifier)),
        }
    }
}

/// Resolve `identifier` against one remote resource kind.
///
/// A full UUID is fetched by id; a miss there is final (`NotFound`), never
/// ambiguity, regardless of what a name search would have said. Any other
/// identifier is searched by exact name, then by uuid prefix if the name
/// search came back empty.
pub async fn resolve_remote<R: Remote>(
    client: &PlatformClient,
    identifier: &str,
) -> Result<Resolution<R>> {
    if classify(identifier) == IdentifierKind::FullUuid4 {
        return Ok(match client.fetch::<R>(identifier).await? {
            Some(record) => Resolution::Resolved(record),
            None => Resolution::NotFound,
        });
    }

    let mut matches = client.list::<R>(&[(R::NAME_FILTER, identifier)]).await?;
    if matches.is_empty() {
        matches = client.list::<R>(&[("uuid__startswith", identifier)]).await?;
    }
    Ok(match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(matches.swap_remove(0)),
        _ => Resolution::NonUnique,
    })
}

/// Strict single-kind remote resolution.
pub async fn resolve_remote_strict<R: Remote>(
    client: &PlatformClient,
    identifier: &str,
) -> Result<R> {
    resolve_remote::<R>(client, identifier)
        .await?
        .into_strict(R::KIND.label(), identifier)
}

/// A local inventory match, either a whole application or one container.
#[derive(Debug, Clone)]
pub enum LocalMatch {
    Application(LocalApplication),
    Container(LocalContainer),
}

impl LocalMatch {
    pub fn is_application(&self) -> bool {
        matches!(self, LocalMatch::Application(_))
    }

    /// The handle commands print: the application name or the container id.
    pub fn reference(&self) -> &str {
        match self {
            LocalMatch::Application(app) => &app.name,
            LocalMatch::Container(container) => &container.id,
        }
    }
}

/// Resolve `identifier` against a freshly built local inventory.
///
/// An identifier equal to an application name is an application match; one
/// equal to a container's name or a prefix of its id is a container match.
/// Matching more than once in either category, or once in *both*, is
/// ambiguous — a container sharing its name with an application must not
/// silently win.
pub fn resolve_local(
    engine: &dyn ContainerEngine,
    identifier: &str,
) -> Result<Resolution<LocalMatch>> {
    let apps = inventory::build(engine)?;

    let mut app_matches: Vec<&LocalApplication> = Vec::new();
    let mut container_matches: Vec<&LocalContainer> = Vec::new();
    for app in apps.values() {
        if app.name == identifier {
            app_matches.push(app);
        }
        for container in &app.containers {
            if container.id.starts_with(identifier) || container.name == identifier {
                container_matches.push(container);
            }
        }
    }
    debug!(
        "local lookup '{}': {} application(s), {} container(s)",
        identifier,
        app_matches.len(),
        container_matches.len()
    );

    Ok(match (app_matches.len(), container_matches.len()) {
        (0, 0) => Resolution::NotFound,
        (1, 0) => Resolution::Resolved(LocalMatch::Application(app_matches[0].clone())),
        (0, 1) => Resolution::Resolved(LocalMatch::Container(container_matches[0].clone())),
        _ => Resolution::NonUnique,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Remote,
    Local,
}

/// A dual-source resolution with its provenance.
#[derive(Debug, Clone)]
pub enum Resolved {
    RemoteService(Service),
    RemoteContainer(Container),
    Local(LocalMatch),
}

impl Resolved {
    pub fn provenance(&self) -> Provenance {
        match self {
            Resolved::RemoteService(_) | Resolved::RemoteContainer(_) => Provenance::Remote,
            Resolved::Local(_) => Provenance::Local,
        }
    }

    pub fn is_application(&self) -> bool {
        match self {
            Resolved::RemoteService(_) => true,
            Resolved::RemoteContainer(_) => false,
            Resolved::Local(local) => local.is_application(),
        }
    }

    /// The handle commands print for this object.
    pub fn reference(&self) -> &str {
        match self {
            Resolved::RemoteService(service) => &service.uuid,
            Resolved::RemoteContainer(container) => &container.uuid,
            Resolved::Local(local) => local.reference(),
        }
    }
}

const APP_OR_CONTAINER: &str = "application or container";

/// Resolve an identifier that may denote a remote service, a remote
/// container, or a local application/container.
///
/// The three lookups are independent and read-only; the two remote queries
/// run concurrently on the runtime while the local lookup runs on a
/// blocking worker. All three must complete before any merging happens —
/// this is a fan-out/fan-in barrier, not a race. With no session
/// configured the remote channels report clean misses without issuing
/// requests, which is the local-only fallback mode.
pub async fn resolve_app_or_container(
    client: Option<&PlatformClient>,
    engine: Arc<dyn ContainerEngine>,
    identifier: &str,
) -> Result<Resolved> {
    let local_task = {
        let engine = Arc::clone(&engine);
        let identifier = identifier.to_string();
        tokio::task::spawn_blocking(move || resolve_local(engine.as_ref(), &identifier))
    };

    let (service_outcome, container_outcome) = match client {
        Some(client) => tokio::join!(
            resolve_remote::<Service>(client, identifier),
            resolve_remote::<Container>(client, identifier),
        ),
        None => (Ok(Resolution::NotFound), Ok(Resolution::NotFound)),
    };
    let local_outcome = local_task
        .await
        .map_err(|e| FleetctlError::Engine(format!("local lookup task failed: {}", e)))?;

    // All three channels have joined; only now do errors propagate and
    // results merge.
    let service = service_outcome?;
    let container = container_outcome?;
    let local = local_outcome?;

    let resolved_count = usize::from(service.is_resolved())
        + usize::from(container.is_resolved())
        + usize::from(local.is_resolved());
    let ambiguous = matches!(service, Resolution::NonUnique)
        || matches!(container, Resolution::NonUnique)
        || matches!(local, Resolution::NonUnique);

    if ambiguous || resolved_count > 1 {
        return Err(FleetctlError::non_unique(APP_OR_CONTAINER, identifier));
    }
    match (service, container, local) {
        (Resolution::Resolved(service), _, _) => Ok(Resolved::RemoteService(service)),
        (_, Resolution::Resolved(container), _) => Ok(Resolved::RemoteContainer(container)),
        (_, _, Resolution::Resolved(local)) => Ok(Resolved::Local(local)),
        _ => Err(FleetctlError::not_found(APP_OR_CONTAINER, identifier)),
    }
}

/// A resource that tags can be attached to.
#[derive(Debug, Clone)]
pub enum Taggable {
    Service(Service),
    NodeCluster(NodeCluster),
    Node(Node),
}

impl Taggable {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Taggable::Service(_) => ResourceKind::Service,
            Taggable::NodeCluster(_) => ResourceKind::NodeCluster,
            Taggable::Node(_) => ResourceKind::Node,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            Taggable::Service(s) => &s.uuid,
            Taggable::NodeCluster(c) => &c.uuid,
            Taggable::Node(n) => &n.uuid,
        }
    }
}

/// Resolve an identifier that may denote a service, node cluster or node.
///
/// Kinds are tried in that fixed priority order; the first non-miss
/// outcome wins. Later kinds are not queried once an earlier one resolves
/// or turns out ambiguous.
pub async fn resolve_taggable(client: &PlatformClient, identifier: &str) -> Result<Taggable> {
    match resolve_remote::<Service>(client, identifier).await? {
        Resolution::Resolved(service) => return Ok(Taggable::Service(service)),
        Resolution::NonUnique => {
            return Err(FleetctlError::non_unique(
                ResourceKind::Service.label(),
                identifier,
            ))
        }
        Resolution::NotFound => {}
    }
    match resolve_remote::<NodeCluster>(client, identifier).await? {
        Resolution::Resolved(cluster) => return Ok(Taggable::NodeCluster(cluster)),
        Resolution::NonUnique => {
            return Err(FleetctlError::non_unique(
                ResourceKind::NodeCluster.label(),
                identifier,
            ))
        }
        Resolution::NotFound => {}
    }
    match resolve_remote::<Node>(client, identifier).await? {
        Resolution::Resolved(node) => return Ok(Taggable::Node(node)),
        Resolution::NonUnique => {
            return Err(FleetctlError::non_unique(
                ResourceKind::Node.label(),
                identifier,
            ))
        }
        Resolution::NotFound => {}
    }
    Err(FleetctlError::not_found(
        "service, node cluster or node",
        identifier,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ContainerDetails, CreateContainerOptions};

    struct EmptyEngine;

    impl ContainerEngine for EmptyEngine {
        fn list_container_ids(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
        fn inspect(&self, id: &str) -> Result<ContainerDetails> {
            Err(FleetctlError::Engine(format!("no such container: {}", id)))
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
        fn create(&self, _options: &CreateContainerOptions) -> Result<String> {
            Ok(String::new())
        }
        fn logs(&self, _id: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_reconciler_without_session_or_local_matches() {
        let engine: Arc<EmptyEngine> = Arc::new(EmptyEngine);
        let outcome = tokio_test::block_on(resolve_app_or_container(None, engine, "ghost"));
        match outcome {
            Err(FleetctlError::NotFound { kind, identifier }) => {
                assert_eq!(kind, APP_OR_CONTAINER);
                assert_eq!(identifier, "ghost");
            }
            other => panic!("expected NotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_resolution_into_strict() {
        let resolved: Resolution<i32> = Resolution::Resolved(7);
        assert_eq!(resolved.into_strict("service", "web").unwrap(), 7);

        let missing: Resolution<i32> = Resolution::NotFound;
        match missing.into_strict("service", "web") {
            Err(FleetctlError::NotFound { kind, identifier }) => {
                assert_eq!(kind, "service");
                assert_eq!(identifier, "web");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }

        let ambiguous: Resolution<i32> = Resolution::NonUnique;
        assert!(matches!(
            ambiguous.into_strict("service", "web"),
            Err(FleetctlError::NonUnique { .. })
        ));
    }

    #[test]
    fn test_local_match_reference() {
        let container = LocalContainer {
            app_name: "web".to_string(),
            name: "local-web-1".to_string(),
            id: "deadbeef".to_string(),
            status: crate::inventory::ContainerStatus::Running,
            image: "acme/hello-world:latest".to_string(),
            run_command: String::new(),
            entrypoint: String::new(),
            size: crate::inventory::ContainerSize::XS,
            exit_code: 0,
            env: Vec::new(),
            ports: String::new(),
            deployed: chrono::Utc::now(),
        };
        let matched = LocalMatch::Container(container);
        assert!(!matched.is_application());
        assert_eq!(matched.reference(), "deadbeef");
    }
}
