//! Node commands.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::Node;
use crate::resolve::resolve_remote_strict;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum NodeCommands {
    /// List nodes
    Ls {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show details of one or more nodes
    Inspect { identifiers: Vec<String> },
    /// Remove one or more nodes
    Rm { identifiers: Vec<String> },
    /// Upgrade the engine daemon of one or more nodes
    Upgrade { identifiers: Vec<String> },
}

pub async fn handle_command(cmd: NodeCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        NodeCommands::Ls { quiet } => ls(&client, quiet).await,
        NodeCommands::Inspect { identifiers } => inspect(&client, identifiers).await,
        NodeCommands::Rm { identifiers } => rm(&client, identifiers).await,
        NodeCommands::Upgrade { identifiers } => upgrade(&client, identifiers).await,
    }
}

async fn ls(client: &PlatformClient, quiet: bool) -> Result<()> {
    let nodes = client.list::<Node>(&[]).await?;

    if quiet {
        for node in &nodes {
            println!("{}", node.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&["UUID", "FQDN", "STATE", "IP", "REGION", "LAST SEEN"]);
    for node in &nodes {
        table.add_row(vec![
            Cell::new(format::short_uuid(&node.uuid)),
            Cell::new(node.external_fqdn.as_deref().unwrap_or("")),
            format::state_cell(&node.state),
            Cell::new(node.public_ip.as_deref().unwrap_or("")),
            Cell::new(node.region.as_deref().unwrap_or("")),
            Cell::new(format::humanize_since(node.last_seen)),
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
    let node = resolve_remote_strict::<Node>(client, identifier).await?;
    format::print_json(&node)
}

async fn rm(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(rm_one(client, identifier).await);
    }
    batch.finish()
}

async fn rm_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let node = resolve_remote_strict::<Node>(client, identifier).await?;
    client.delete::<Node>(&node.uuid).await?;
    println!("{}", node.uuid);
    Ok(())
}

async fn upgrade(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(upgrade_one(client, identifier).await);
    }
    batch.finish()
}

async fn upgrade_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let node = resolve_remote_strict::<Node>(client, identifier).await?;
    client.action::<Node>(&node.uuid, "upgrade").await?;
    println!("{}", node.uuid);
    Ok(())
}
