//! Node cluster commands.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::{NewNodeCluster, NodeCluster};
use crate::resolve::resolve_remote_strict;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum ClusterCommands {
    /// List node clusters
    Ls {
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show details of one or more node clusters
    Inspect { identifiers: Vec<String> },
    /// Create and deploy a new node cluster
    Create {
        name: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        nodetype: String,
        #[arg(short, long, default_value_t = 1)]
        target_num_nodes: u32,
    },
    /// Terminate one or more node clusters
    Rm { identifiers: Vec<String> },
    /// Change the number of nodes of one or more clusters
    Scale {
        identifiers: Vec<String>,
        #[arg(short, long)]
        target_num_nodes: u32,
    },
    /// Upgrade the engine daemon of all nodes in one or more clusters
    Upgrade { identifiers: Vec<String> },
}

pub async fn handle_command(cmd: ClusterCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        ClusterCommands::Ls { quiet } => ls(&client, quiet).await,
        ClusterCommands::Inspect { identifiers } => inspect(&client, identifiers).await,
        ClusterCommands::Create {
            name,
            provider,
            region,
            nodetype,
            target_num_nodes,
        } => create(&client, name, provider, region, nodetype, target_num_nodes).await,
        ClusterCommands::Rm { identifiers } => rm(&client, identifiers).await,
        ClusterCommands::Scale {
            identifiers,
            target_num_nodes,
        } => scale(&client, identifiers, target_num_nodes).await,
        ClusterCommands::Upgrade { identifiers } => upgrade(&client, identifiers).await,
    }
}

async fn ls(client: &PlatformClient, quiet: bool) -> Result<()> {
    let clusters = client.list::<NodeCluster>(&[]).await?;

    if quiet {
        for cluster in &clusters {
            println!("{}", cluster.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&[
        "NAME",
        "UUID",
        "STATE",
        "PROVIDER",
        "REGION",
        "TYPE",
        "#NODES",
        "DEPLOYED",
    ]);
    for cluster in &clusters {
        table.add_row(vec![
            Cell::new(&cluster.name),
            Cell::new(format::short_uuid(&cluster.uuid)),
            format::state_cell(&cluster.state),
            Cell::new(cluster.provider.as_deref().unwrap_or("")),
            Cell::new(cluster.region.as_deref().unwrap_or("")),
            Cell::new(cluster.node_type.as_deref().unwrap_or("")),
            Cell::new(format!(
                "{}/{}",
                cluster.current_num_nodes, cluster.target_num_nodes
            )),
            Cell::new(format::humanize_since(cluster.deployed_datetime)),
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
    let cluster = resolve_remote_strict::<NodeCluster>(client, identifier).await?;
    format::print_json(&cluster)
}

async fn create(
    client: &PlatformClient,
    name: String,
    provider: String,
    region: String,
    nodetype: String,
    target_num_nodes: u32,
) -> Result<()> {
    let payload = NewNodeCluster {
        name,
        provider,
        region,
        node_type: nodetype,
        target_num_nodes,
    };
    let cluster: NodeCluster = client.create(&payload).await?;
    client.action::<NodeCluster>(&cluster.uuid, "deploy").await?;
    println!("{}", cluster.uuid);
    Ok(())
}

async fn rm(client: &PlatformClient, identifiers: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(rm_one(client, identifier).await);
    }
    batch.finish()
}

async fn rm_one(client: &PlatformClient, identifier: &str) -> Result<()> {
    let cluster = resolve_remote_strict::<NodeCluster>(client, identifier).await?;
    client.delete::<NodeCluster>(&cluster.uuid).await?;
    println!("{}", cluster.uuid);
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
    let cluster = resolve_remote_strict::<NodeCluster>(client, identifier).await?;
    let patch = serde_json::json!({ "target_num_nodes": target });
    client.save::<NodeCluster, _>(&cluster.uuid, &patch).await?;
    println!("{}", cluster.uuid);
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
    let cluster = resolve_remote_strict::<NodeCluster>(client, identifier).await?;
    client.action::<NodeCluster>(&cluster.uuid, "upgrade").await?;
    println!("{}", cluster.uuid);
    Ok(())
}
