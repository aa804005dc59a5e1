//! Top-level application commands.
//!
//! These are the dual-source verbs: the identifier may denote a remote
//! service, a remote container, or a local application/container, and the
//! reconciler decides which. `ps` merges the remote and local listings the
//! same way. With no account configured everything degrades to local-only.

use crate::config::Config;
use crate::engine::ContainerEngine;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::inventory;
use crate::remote::client::PlatformClient;
use crate::remote::types::{Container, Service};
use crate::resolve::{resolve_app_or_container, Resolved};
use crate::validation;
use comfy_table::Cell;
use std::sync::Arc;
use tracing::warn;

use super::local::{self, LocalRunOptions};
use super::service::ServiceOptions;

/// Merged listing of remote services and local applications.
pub async fn ps(config: &Config, quiet: bool) -> Result<()> {
    let client = super::platform_client_opt(config)?;

    let services = match &client {
        Some(client) => client.list::<Service>(&[]).await?,
        None => Vec::new(),
    };

    // A missing engine only kills the listing when there is no remote side
    // to show either.
    let local_apps = match super::container_engine(config) {
        Ok(engine) => inventory::build(engine.as_ref())?,
        Err(e) if client.is_some() => {
            warn!("{}", e);
            Default::default()
        }
        Err(e) => return Err(e),
    };

    if quiet {
        for service in &services {
            println!("{}", service.uuid);
        }
        for app in local_apps.values() {
            println!("{}", app.name);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&[
        "NAME",
        "UUID",
        "STATUS",
        "#CONTAINERS",
        "IMAGE",
        "DEPLOYED",
        "SOURCE",
    ]);
    for service in &services {
        table.add_row(vec![
            Cell::new(&service.name),
            Cell::new(format::short_uuid(&service.uuid)),
            Cell::new(format::state_glyph(&service.state)),
            Cell::new(service.current_num_containers),
            Cell::new(&service.image_name),
            Cell::new(format::humanize_since(service.deployed_datetime)),
            Cell::new("remote"),
        ]);
    }
    for app in local_apps.values() {
        table.add_row(vec![
            Cell::new(&app.name),
            Cell::new(""),
            Cell::new(format::state_glyph(app.status.as_str())),
            Cell::new(app.containers.len()),
            Cell::new(&app.image),
            Cell::new(format::humanize_since(Some(app.deployed))),
            Cell::new("local"),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Deploy an application: remotely when an account is configured (unless
/// `--local` forces the engine), locally otherwise.
pub async fn run(
    config: &Config,
    image: String,
    options: ServiceOptions,
    force_local: bool,
    size: Option<String>,
) -> Result<()> {
    if force_local || config.session().is_none() {
        return run_local(config, image, options, size);
    }

    let client = super::platform_client(config)?;
    let payload = options.into_payload(image)?;
    let service: Service = client.create(&payload).await?;
    client.action::<Service>(&service.uuid, "start").await?;
    println!("{}", service.uuid);
    Ok(())
}

fn run_local(
    config: &Config,
    image: String,
    options: ServiceOptions,
    size: Option<String>,
) -> Result<()> {
    let parsed_image = validation::parse_image_name(&image)?;
    let published = validation::parse_published_ports(&options.publish)?;
    let exposed = validation::parse_exposed_ports(&options.expose)?;
    let envvars = validation::parse_envvars(&options.env)?;

    let size = match size {
        Some(value) => value.parse::<inventory::ContainerSize>()?,
        None => inventory::ContainerSize::XS,
    };
    let name = options
        .name
        .unwrap_or_else(|| parsed_image.short_name.clone());

    let run_options = LocalRunOptions {
        name,
        image: parsed_image.full_name.clone(),
        tag: parsed_image.tag.unwrap_or_else(|| "latest".to_string()),
        size,
        target_num_containers: options.target_num_containers.unwrap_or(1) as usize,
        run_command: options.run_command,
        entrypoint: options.entrypoint,
        env: envvars
            .iter()
            .map(|e| format!("{}={}", e.key, e.value))
            .collect(),
        expose: exposed.iter().map(|p| p.inner_port).collect(),
        publish: published
            .iter()
            .map(|p| match p.outer_port {
                Some(outer) => format!("{}:{}/{}", outer, p.inner_port, p.protocol),
                None => format!("{}/{}", p.inner_port, p.protocol),
            })
            .collect(),
    };

    let engine = super::container_engine(config)?;
    let app_name = local::run_app(engine.as_ref(), &run_options)?;
    println!("{}", app_name);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum Verb {
    Start,
    Stop,
    Terminate,
    Logs,
    Inspect,
}

/// Run one dual-source verb over a batch of identifiers.
pub async fn dispatch(config: &Config, verb: Verb, identifiers: Vec<String>) -> Result<()> {
    let client = super::platform_client_opt(config)?;
    let engine = super::container_engine(config)?;

    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(dispatch_one(&client, Arc::clone(&engine), verb, identifier).await);
    }
    batch.finish()
}

async fn dispatch_one(
    client: &Option<PlatformClient>,
    engine: Arc<dyn ContainerEngine>,
    verb: Verb,
    identifier: &str,
) -> Result<()> {
    let resolved =
        resolve_app_or_container(client.as_ref(), Arc::clone(&engine), identifier).await?;
    match resolved {
        Resolved::RemoteService(service) => {
            let client = super::require_client(client)?;
            remote_verb::<Service>(client, verb, &service.uuid, &service).await
        }
        Resolved::RemoteContainer(container) => {
            let client = super::require_client(client)?;
            remote_verb::<Container>(client, verb, &container.uuid, &container).await
        }
        Resolved::Local(target) => {
            let handle = match verb {
                Verb::Start => local::start(engine.as_ref(), &target)?,
                Verb::Stop => local::stop(engine.as_ref(), &target)?,
                Verb::Terminate => local::terminate(engine.as_ref(), &target)?,
                Verb::Logs => {
                    print!("{}", local::logs(engine.as_ref(), &target)?);
                    return Ok(());
                }
                Verb::Inspect => return local::inspect(&target),
            };
            println!("{}", handle);
            Ok(())
        }
    }
}

async fn remote_verb<R>(
    client: &PlatformClient,
    verb: Verb,
    uuid: &str,
    record: &R,
) -> Result<()>
where
    R: crate::remote::types::Record + serde::Serialize,
{
    match verb {
        Verb::Start => {
            client.action::<R>(uuid, "start").await?;
        }
        Verb::Stop => {
            client.action::<R>(uuid, "stop").await?;
        }
        Verb::Terminate => {
            client.delete::<R>(uuid).await?;
        }
        Verb::Logs => {
            print!("{}", client.logs::<R>(uuid).await?);
            return Ok(());
        }
        Verb::Inspect => return format::print_json(record),
    }
    println!("{}", uuid);
    Ok(())
}
