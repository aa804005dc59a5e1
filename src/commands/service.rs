//! Service commands.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::{NewService, Service, ServiceLink, Tag};
use crate::resolve::resolve_remote_strict;
use crate::validation;
use clap::{Args, Subcommand};
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum ServiceCommands {
    /// List services
    Ps {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
        /// Filter by state
        #[arg(long)]
        status: Option<String>,
    },
    /// Show details of one or more services
    Inspect { identifiers: Vec<String> },
    /// Fetch logs of one or more services
    Logs { identifiers: Vec<String> },
    /// Create a new service without deploying it
    Create {
        image: String,
        #[command(flatten)]
        options: ServiceOptions,
    },
    /// Create and deploy a new service
    Run {
        image: String,
        #[command(flatten)]
        options: ServiceOptions,
    },
    /// Change the number of containers of one or more services
    Scale {
        identifiers: Vec<String>,
        #[arg(short, long)]
        target_num_containers: u32,
    },
    /// Change properties of one or more services (takes effect on redeploy)
    Set {
        identifiers: Vec<String>,
        #[command(flatten)]
        options: ServiceOptions,
    },
    /// Start one or more stopped services
    Start { identifiers: Vec<String> },
    /// Stop one or more running services
    Stop { identifiers: Vec<String> },
    /// Terminate one or more services
    Terminate { identifiers: Vec<String> },
    /// Redeploy one or more services with their current image
    Redeploy { identifiers: Vec<String> },
}

#[derive(Args, Clone, Default)]
pub struct ServiceOptions {
    /// Service name (defaults to the image short name)
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub cpu_shares: Option<i64>,
    /// Memory limit in bytes
    #[arg(long)]
    pub memory: Option<i64>,
    #[arg(short = 't', long)]
    pub target_num_containers: Option<u32>,
    #[arg(long)]
    pub run_command: Option<String>,
    #[arg(long)]
    pub entrypoint: Option<String>,
    /// Publish a port, '[host:]port/protocol'
    #[arg(short, long = "publish")]
    pub publish: Vec<String>,
    /// Expose a port, 'port/protocol'
    #[arg(long = "expose")]
    pub expose: Vec<String>,
    /// Environment variable, 'KEY=VALUE'
    #[arg(short, long = "env")]
    pub env: Vec<String>,
    /// Link to another service by name or uuid
    #[arg(long = "link")]
    pub link: Vec<String>,
    /// Tag to attach
    #[arg(long = "tag")]
    pub tag: Vec<String>,
    #[arg(long)]
    pub autorestart: Option<String>,
    #[arg(long)]
    pub autodestroy: Option<String>,
    /// Deployment role
    #[arg(long = "role")]
    pub role: Vec<String>,
    /// Deploy containers one at a time
    #[arg(long)]
    pub sequential: bool,
}

impl ServiceOptions {
    /// Validate structured input and assemble the create payload.
    pub fn into_payload(self, image: String) -> Result<NewService> {
        let published = validation::parse_published_ports(&self.publish)?;
        let exposed = validation::parse_exposed_ports(&self.expose)?;
        let envvars = validation::parse_envvars(&self.env)?;
        validation::parse_image_name(&image)?;

        Ok(NewService {
            image,
            name: self.name,
            target_num_containers: self.target_num_containers,
            run_command: self.run_command,
            entrypoint: self.entrypoint,
            cpu_shares: self.cpu_shares,
            memory: self.memory,
            container_ports: validation::merge_ports(published, exposed),
            container_envvars: envvars,
            linked_to_service: self
                .link
                .into_iter()
                .map(|name| ServiceLink {
                    name: Some(name.clone()),
                    to_service: name,
                })
                .collect(),
            autorestart: self.autorestart,
            autodestroy: self.autodestroy,
            roles: self.role,
            sequential_deployment: if self.sequential { Some(true) } else { None },
            tags: self.tag.into_iter().map(|name| Tag { name }).collect(),
        })
    }
}

pub async fn handle_command(cmd: ServiceCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        ServiceCommands::Ps { quiet, status } => ps(&client, quiet, status).await,
        ServiceCommands::Inspect { identifiers } => inspect(&client, identifiers).await,
        ServiceCommands::Logs { identifiers } => logs(&client, identifiers).await,
        ServiceCommands::Create { image, options } => create(&client, image, options, false).await,
        ServiceCommands::Run { image, options } => create(&client, image, options, true).await,
        ServiceCommands::Scale {
            identifiers,
            target_num_containers,
        } => scale(&client, identifiers, target_num_containers).await,
        ServiceCommands::Set {
            identifiers,
            options,
        } => set(&client, identifiers, options).await,
        ServiceCommands::Start { identifiers } => action(&client, identifiers, "start").await,
        ServiceCommands::Stop { identifiers } => action(&client, identifiers, "stop").await,
        ServiceCommands::Redeploy { identifiers } => action(&client, identifiers, "redeploy").await,
        ServiceCommands::Terminate { identifiers } => terminate(&client, identifiers).await,
    }
}

async fn ps(client: &PlatformClient, quiet: bool, status: Option<String>) -> Result<()> {
    let mut filters: Vec<(&str, &str)> = Vec::new();
    if let Some(state) = &status {
        filters.push(("state", state.as_str()));
    }
    let services = client.list::<Service>(&filters).await?;

    if quiet {
        for service in &services {
            println!("{}", service.uuid);
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
    ]);
    for service in &services {
        table.add_row(vec![
            Cell::new(&service.name),
            Cell::new(format::short_uuid(&service.uuid)),
            format::state_cell(&service.state),
            Cell::new(service.current_num_containers),
            Cell::new(&service.image_name),
            Cell::new(format::humanize_since(service.deployed_datetime)),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn inspect(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(inspect_one(client, identifier).await);
    }
    batch.finish()
}

async fn inspect_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    format::print_json(&service)
}

async fn logs(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(logs_one(client, identifier).await);
    }
    batch.finish()
}

async fn logs_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    print!("{}", client.logs::<Service>(&service.uuid).await?);
    Ok(())
}

async fn create(
    client: &PlatformClient,
    image: String,
    options: ServiceOptions,
    deploy: bool,
) -> Result<()> {
    let payload = options.into_payload(image)?;
    let service: Service = client.create(&payload).await?;
    if deploy {
        client.action::<Service>(&service.uuid, "start").await?;
    }
    println!("{}", service.uuid);
    Ok(())
}

async fn scale(client: &PlatformClient, identifiers: Vec<String>, target: u32) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(scale_one(client, identifier, target).await);
    }
    batch.finish()
}

async fn scale_one(client: &PlatformClient, identifier: &str, target: u32) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    let patch = serde_json::json!({ "target_num_containers": target });
    client.save::<Service, _>(&service.uuid, &patch).await?;
    client.action::<Service>(&service.uuid, "scale").await?;
    println!("{}", service.uuid);
    Ok(())
}

async fn set(
    client: &PlatformClient,
    identifiers: Vec<String>,
    options: ServiceOptions,
) -> Result<()> {
    let patch = set_patch(&options)?;
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(set_one(client, identifier, &patch).await);
    }
    batch.finish()
}

/// Only explicitly provided options go into the patch.
fn set_patch(options: &ServiceOptions) -> Result<serde_json::Value> {
    let mut patch = serde_json::Map::new();
    if let Some(cpu_shares) = options.cpu_shares {
        patch.insert("cpu_shares".to_string(), cpu_shares.into());
    }
    if let Some(memory) = options.memory {
        patch.insert("memory".to_string(), memory.into());
    }
    if let Some(target) = options.target_num_containers {
        patch.insert("target_num_containers".to_string(), target.into());
    }
    if let Some(run_command) = &options.run_command {
        patch.insert("run_command".to_string(), run_command.clone().into());
    }
    if let Some(entrypoint) = &options.entrypoint {
        patch.insert("entrypoint".to_string(), entrypoint.clone().into());
    }
    if let Some(autorestart) = &options.autorestart {
        patch.insert("autorestart".to_string(), autorestart.clone().into());
    }
    if let Some(autodestroy) = &options.autodestroy {
        patch.insert("autodestroy".to_string(), autodestroy.clone().into());
    }
    if !options.publish.is_empty() || !options.expose.is_empty() {
        let published = validation::parse_published_ports(&options.publish)?;
        let exposed = validation::parse_exposed_ports(&options.expose)?;
        let ports = validation::merge_ports(published, exposed);
        patch.insert("container_ports".to_string(), serde_json::to_value(ports)?);
    }
    if !options.env.is_empty() {
        let envvars = validation::parse_envvars(&options.env)?;
        patch.insert(
            "container_envvars".to_string(),
            serde_json::to_value(envvars)?,
        );
    }
    if !options.role.is_empty() {
        patch.insert("roles".to_string(), serde_json::to_value(&options.role)?);
    }
    Ok(serde_json::Value::Object(patch))
}

async fn set_one(
    client: &PlatformClient,
    identifier: &str,
    patch: &serde_json::Value,
) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    client.save::<Service, _>(&service.uuid, patch).await?;
    println!("{}", service.uuid);
    Ok(())
}

async fn action(client: &PlatformClient, identifiers: Vec<String>, action: &str) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(action_one(client, identifier, action).await);
    }
    batch.finish()
}

async fn action_one(client: &PlatformClient, identifier: &str, action: &str) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    client.action::<Service>(&service.uuid, action).await?;
    println!("{}", service.uuid);
    Ok(())
}

async fn terminate(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(terminate_one(client, identifier).await);
    }
    batch.finish()
}

async fn terminate_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    client.delete::<Service>(&service.uuid).await?;
    println!("{}", service.uuid);
    Ok(())
}
