//! Volume and volume group commands.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::{Volume, VolumeGroup};
use crate::resolve::resolve_remote_strict;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum VolumeCommands {
    /// List volumes
    Ls {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show details of one or more volumes
    Inspect { identifiers: Vec<String> },
}

#[derive(Subcommand, Clone)]
pub enum VolumeGroupCommands {
    /// List volume groups
    Ls {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show details of one or more volume groups
    Inspect { identifiers: Vec<String> },
}

pub async fn handle_command(cmd: VolumeCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        VolumeCommands::Ls { quiet } => ls(&client, quiet).await,
        VolumeCommands::Inspect { identifiers } => inspect(&client, identifiers).await,
    }
}

pub async fn handle_group_command(cmd: VolumeGroupCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        VolumeGroupCommands::Ls { quiet } => group_ls(&client, quiet).await,
        VolumeGroupCommands::Inspect { identifiers } => group_inspect(&client, identifiers).await,
    }
}

async fn ls(client: &PlatformClient, quiet: bool) -> Result<()> {
    let volumes = client.list::<Volume>(&[]).await?;

    if quiet {
        for volume in &volumes {
            println!("{}", volume.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&["UUID", "STATE", "NODE", "GROUP"]);
    for volume in &volumes {
        table.add_row(vec![
            Cell::new(format::short_uuid(&volume.uuid)),
            format::state_cell(&volume.state),
            Cell::new(volume.node.as_deref().unwrap_or("")),
            Cell::new(volume.volume_group.as_deref().unwrap_or("")),
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
    let volume = resolve_remote_strict::<Volume>(client, identifier).await?;
    format::print_json(&volume)
}

async fn group_ls(client: &PlatformClient, quiet: bool) -> Result<()> {
    let groups = client.list::<VolumeGroup>(&[]).await?;

    if quiet {
        for group in &groups {
            println!("{}", group.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&["NAME", "UUID", "STATE", "#VOLUMES"]);
    for group in &groups {
        table.add_row(vec![
            Cell::new(&group.name),
            Cell::new(format::short_uuid(&group.uuid)),
            format::state_cell(&group.state),
            Cell::new(group.volumes.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn group_inspect(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(group_inspect_one(client, identifier).await);
    }
    batch.finish()
}

async fn group_inspect_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let group = resolve_remote_strict::<VolumeGroup>(client, identifier).await?;
    format::print_json(&group)
}
