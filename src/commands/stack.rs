//! Stack commands.

use crate::config::Config;
use crate::error::{FleetctlError, Result};
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::Stack;
use crate::resolve::resolve_remote_strict;
use crate::stackfile;
use clap::Subcommand;
use comfy_table::Cell;
use std::path::PathBuf;

#[derive(Subcommand, Clone)]
pub enum StackCommands {
    /// List stacks
    Ls {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show details of one or more stacks
    Inspect { identifiers: Vec<String> },
    /// Create a new stack from a stack file without deploying it
    Create {
        /// Stack name (defaults to the current directory name)
        #[arg(long)]
        name: Option<String>,
        /// Stack file
        #[arg(short, long, default_value = "fleet.yml")]
        file: PathBuf,
    },
    /// Create and deploy a new stack from a stack file
    Up {
        /// Stack name (defaults to the current directory name)
        #[arg(long)]
        name: Option<String>,
        /// Stack file
        #[arg(short, long, default_value = "fleet.yml")]
        file: PathBuf,
    },
    /// Start one or more stacks
    Start { identifiers: Vec<String> },
    /// Stop one or more stacks
    Stop { identifiers: Vec<String> },
    /// Terminate one or more stacks
    Terminate { identifiers: Vec<String> },
    /// Redeploy one or more stacks
    Redeploy { identifiers: Vec<String> },
}

pub async fn handle_command(cmd: StackCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        StackCommands::Ls { quiet } => ls(&client, quiet).await,
        StackCommands::Inspect { identifiers } => inspect(&client, identifiers).await,
        StackCommands::Create { name, file } => create(&client, name, file, false).await,
        StackCommands::Up { name, file } => create(&client, name, file, true).await,
        StackCommands::Start { identifiers } => action(&client, identifiers, "start").await,
        StackCommands::Stop { identifiers } => action(&client, identifiers, "stop").await,
        StackCommands::Redeploy { identifiers } => action(&client, identifiers, "redeploy").await,
        StackCommands::Terminate { identifiers } => terminate(&client, identifiers).await,
    }
}

fn default_stack_name() -> Result<String> {
    let cwd = std::env::current_dir()?;
    cwd.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            FleetctlError::BadParameter(
                "cannot derive a stack name from the current directory, pass --name".to_string(),
            )
        })
}

async fn ls(client: &PlatformClient, quiet: bool) -> Result<()> {
    let stacks = client.list::<Stack>(&[]).await?;

    if quiet {
        for stack in &stacks {
            println!("{}", stack.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&["NAME", "UUID", "STATE", "#SERVICES", "DEPLOYED"]);
    for stack in &stacks {
        table.add_row(vec![
            Cell::new(&stack.name),
            Cell::new(format::short_uuid(&stack.uuid)),
            format::state_cell(&stack.state),
            Cell::new(stack.services.len()),
            Cell::new(format::humanize_since(stack.deployed_datetime)),
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
    let stack = resolve_remote_strict::<Stack>(client, identifier).await?;
    format::print_json(&stack)
}

async fn create(
    client: &PlatformClient,
    name: Option<String>,
    file: PathBuf,
    deploy: bool,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => default_stack_name()?,
    };
    let payload = stackfile::load(&file, &name)?;
    let stack: Stack = client.create(&payload).await?;
    if deploy {
        client.action::<Stack>(&stack.uuid, "start").await?;
    }
    println!("{}", stack.uuid);
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
    let stack = resolve_remote_strict::<Stack>(client, identifier).await?;
    client.action::<Stack>(&stack.uuid, action).await?;
    println!("{}", stack.uuid);
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
    let stack = resolve_remote_strict::<Stack>(client, identifier).await?;
    client.delete::<Stack>(&stack.uuid).await?;
    println!("{}", stack.uuid);
    Ok(())
}
