//! Container commands (remote containers; local ones go through the
//! top-level dual-source verbs).

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::{Container, Service};
use crate::resolve::resolve_remote_strict;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum ContainerCommands {
    /// List containers
    Ps {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
        /// Filter by state
        #[arg(long)]
        status: Option<String>,
        /// Only containers of this service
        #[arg(long)]
        service: Option<String>,
    },
    /// Show details of one or more containers
    Inspect { identifiers: Vec<String> },
    /// Fetch logs of one or more containers
    Logs { identifiers: Vec<String> },
    /// Start one or more stopped containers
    Start { identifiers: Vec<String> },
    /// Stop one or more running containers
    Stop { identifiers: Vec<String> },
    /// Terminate one or more containers
    Terminate { identifiers: Vec<String> },
    /// Redeploy one or more containers with their current image
    Redeploy { identifiers: Vec<String> },
}

pub async fn handle_command(cmd: ContainerCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        ContainerCommands::Ps {
            quiet,
            status,
            service,
        } => ps(&client, quiet, status, service).await,
        ContainerCommands::Inspect { identifiers } => inspect(&client, identifiers).await,
        ContainerCommands::Logs { identifiers } => logs(&client, identifiers).await,
        ContainerCommands::Start { identifiers } => action(&client, identifiers, "start").await,
        ContainerCommands::Stop { identifiers } => action(&client, identifiers, "stop").await,
        ContainerCommands::Redeploy { identifiers } => {
            action(&client, identifiers, "redeploy").await
        }
        ContainerCommands::Terminate { identifiers } => terminate(&client, identifiers).await,
    }
}

async fn ps(
    client: &PlatformClient,
    quiet: bool,
    status: Option<String>,
    service: Option<String>,
) -> Result<()> {
    // The service filter resolves first so a bad identifier fails loudly
    // instead of returning an empty listing.
    let service_uuid = match &service {
        Some(identifier) => Some(
            resolve_remote_strict::<Service>(client, identifier)
                .await?
                .uuid,
        ),
        None => None,
    };

    let mut filters: Vec<(&str, &str)> = Vec::new();
    if let Some(state) = &status {
        filters.push(("state", state.as_str()));
    }
    if let Some(uuid) = &service_uuid {
        filters.push(("service", uuid.as_str()));
    }
    let containers = client.list::<Container>(&filters).await?;

    if quiet {
        for container in &containers {
            println!("{}", container.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&[
        "NAME",
        "UUID",
        "STATUS",
        "IMAGE",
        "RUN COMMAND",
        "EXIT CODE",
        "DEPLOYED",
        "PORTS",
    ]);
    for container in &containers {
        let ports = container
            .container_ports
            .iter()
            .map(|p| match p.outer_port {
                Some(outer) => format!("{}->{}/{}", outer, p.inner_port, p.protocol),
                None => format!("{}/{}", p.inner_port, p.protocol),
            })
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&container.name),
            Cell::new(format::short_uuid(&container.uuid)),
            format::state_cell(&container.state),
            Cell::new(&container.image_name),
            Cell::new(container.run_command.as_deref().unwrap_or("")),
            Cell::new(
                container
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(format::humanize_since(container.deployed_datetime)),
            Cell::new(ports),
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
    let container = resolve_remote_strict::<Container>(client, identifier).await?;
    format::print_json(&container)
}

async fn logs(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(logs_one(client, identifier).await);
    }
    batch.finish()
}

async fn logs_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let container = resolve_remote_strict::<Container>(client, identifier).await?;
    print!("{}", client.logs::<Container>(&container.uuid).await?);
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
    let container = resolve_remote_strict::<Container>(client, identifier).await?;
    client.action::<Container>(&container.uuid, action).await?;
    println!("{}", container.uuid);
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
    let container = resolve_remote_strict::<Container>(client, identifier).await?;
    client.delete::<Container>(&container.uuid).await?;
    println!("{}", container.uuid);
    Ok(())
}
