//! Operations on local applications and containers.
//!
//! These act on [`LocalMatch`] values produced by the local or dual-source
//! resolvers, and implement the local deployment path used when no remote
//! account is configured.

use crate::engine::{ContainerEngine, CreateContainerOptions};
use crate::error::Result;
use crate::format;
use crate::inventory::{self, ContainerSize};
use crate::resolve::LocalMatch;
use console::style;
use tracing::info;

/// Start every member of an application, or one container.
/// Returns the handle to print.
pub fn start(engine: &dyn ContainerEngine, target: &LocalMatch) -> Result<String> {
    match target {
        LocalMatch::Application(app) => {
            for container in &app.containers {
                engine.start(&container.id)?;
            }
            Ok(app.name.clone())
        }
        LocalMatch::Container(container) => {
            engine.start(&container.id)?;
            Ok(container.id.clone())
        }
    }
}

pub fn stop(engine: &dyn ContainerEngine, target: &LocalMatch) -> Result<String> {
    match target {
        LocalMatch::Application(app) => {
            for container in &app.containers {
                engine.stop(&container.id)?;
            }
            Ok(app.name.clone())
        }
        LocalMatch::Container(container) => {
            engine.stop(&container.id)?;
            Ok(container.id.clone())
        }
    }
}

pub fn terminate(engine: &dyn ContainerEngine, target: &LocalMatch) -> Result<String> {
    match target {
        LocalMatch::Application(app) => {
            for container in &app.containers {
                engine.remove(&container.id)?;
            }
            Ok(app.name.clone())
        }
        LocalMatch::Container(container) => {
            engine.remove(&container.id)?;
            Ok(container.id.clone())
        }
    }
}

pub fn logs(engine: &dyn ContainerEngine, target: &LocalMatch) -> Result<String> {
    match target {
        LocalMatch::Application(app) => {
            let mut output = String::new();
            for container in &app.containers {
                let header = format!("======> {} <======", container.name);
                output.push_str(&format!(
                    "{}\n{}\n\n",
                    style(header).cyan(),
                    engine.logs(&container.id)?
                ));
            }
            Ok(output)
        }
        LocalMatch::Container(container) => engine.logs(&container.id),
    }
}

pub fn inspect(target: &LocalMatch) -> Result<()> {
    match target {
        LocalMatch::Application(app) => format::print_json(app),
        LocalMatch::Container(container) => format::print_json(container),
    }
}

#[derive(Debug, Clone)]
pub struct LocalRunOptions {
    pub name: String,
    /// Image reference without tag.
    pub image: String,
    pub tag: String,
    pub size: ContainerSize,
    pub target_num_containers: usize,
    pub run_command: Option<String>,
    pub entrypoint: Option<String>,
    pub env: Vec<String>,
    pub expose: Vec<u16>,
    pub publish: Vec<String>,
}

/// Deploy an application on the local engine: pull the image, then create
/// and start `target_num_containers` members under the naming convention,
/// linking each member to the ones created before it.
pub fn run_app(engine: &dyn ContainerEngine, options: &LocalRunOptions) -> Result<String> {
    let inventory = inventory::build(engine)?;
    let app_name = inventory::unique_app_name(&inventory, &options.name);
    let image = format!("{}:{}", options.image, options.tag);

    info!("pulling {}", image);
    engine.pull(&image)?;

    let mut deployed: Vec<String> = Vec::new();
    for index in 1..=options.target_num_containers {
        let container_name = inventory::local_container_name(&app_name, index);
        let create = CreateContainerOptions {
            name: container_name.clone(),
            image: image.clone(),
            run_command: options.run_command.clone(),
            entrypoint: options.entrypoint.clone(),
            cpu_shares: options.size.cpu_shares(),
            memory: options.size.memory_bytes(),
            env: options.env.clone(),
            expose: options.expose.clone(),
            publish: options.publish.clone(),
            links: deployed.iter().map(|n| format!("{}:{}", n, n)).collect(),
        };
        let id = engine.create(&create)?;
        engine.start(&id)?;
        info!("started {} ({})", container_name, format::short_uuid(&id));
        deployed.push(container_name);
    }
    Ok(app_name)
}
