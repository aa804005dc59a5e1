//! Tag commands.
//!
//! Tags attach to services, node clusters and nodes; the identifier is
//! resolved across those three kinds in fixed priority order.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::resolve::resolve_taggable;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum TagCommands {
    /// Attach tags to one or more services, node clusters or nodes
    Add {
        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "tag", required = true)]
        tags: Vec<String>,
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// List tags of one or more services, node clusters or nodes
    Ls {
        /// Print only the tag names
        #[arg(short, long)]
        quiet: bool,
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Remove tags from one or more services, node clusters or nodes
    Rm {
        /// Tag to remove (repeatable)
        #[arg(short = 't', long = "tag", required = true)]
        tags: Vec<String>,
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Replace all tags on one or more services, node clusters or nodes
    Set {
        /// Tag to set (repeatable)
        #[arg(short = 't', long = "tag", required = true)]
        tags: Vec<String>,
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
}

pub async fn handle_command(cmd: TagCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        TagCommands::Add { tags, identifiers } => add(&client, identifiers, tags).await,
        TagCommands::Ls { quiet, identifiers } => ls(&client, identifiers, quiet).await,
        TagCommands::Rm { tags, identifiers } => rm(&client, identifiers, tags).await,
        TagCommands::Set { tags, identifiers } => set(&client, identifiers, tags).await,
    }
}

async fn add(client: &PlatformClient, identifiers: Vec<String>, tags: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(add_one(client, identifier, &tags).await);
    }
    batch.finish()
}

async fn add_one(client: &PlatformClient, identifier: &str, tags: &[String]) -> Result<()> {
    let target = resolve_taggable(client, identifier).await?;
    client
        .add_tags(target.kind(), target.uuid(), tags)
        .await?;
    println!("{}", target.uuid());
    Ok(())
}

async fn ls(client: &PlatformClient, identifiers: Vec<String>, quiet: bool) -> Result<()> {
    let mut batch = Batch::new();
    let mut rows: Vec<(String, &'static str, String)> = Vec::new();
    for identifier in &identifiers {
        if let Some(row) = batch.record(ls_one(client, identifier).await) {
            rows.push(row);
        }
    }

    if quiet {
        for (_, _, tags) in &rows {
            println!("{}", tags);
        }
    } else {
        let mut table = format::plain_table(&["IDENTIFIER", "TYPE", "TAGS"]);
        for (identifier, kind, tags) in &rows {
            table.add_row(vec![Cell::new(identifier), Cell::new(kind), Cell::new(tags)]);
        }
        println!("{table}");
    }
    batch.finish()
}

async fn ls_one(
    client: &PlatformClient,
    identifier: &str,
) -> Result<(String, &'static str, String)> {
    let target = resolve_taggable(client, identifier).await?;
    let tags = client.list_tags(target.kind(), target.uuid()).await?;
    let names: Vec<String> = tags.into_iter().map(|t| t.name).collect();
    Ok((
        identifier.to_string(),
        target.kind().label(),
        names.join(" "),
    ))
}

async fn rm(client: &PlatformClient, identifiers: Vec<String>, tags: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(rm_one(client, identifier, &tags).await);
    }
    batch.finish()
}

async fn rm_one(client: &PlatformClient, identifier: &str, tags: &[String]) -> Result<()> {
    let target = resolve_taggable(client, identifier).await?;
    for tag in tags {
        client.remove_tag(target.kind(), target.uuid(), tag).await?;
    }
    println!("{}", target.uuid());
    Ok(())
}

async fn set(client: &PlatformClient, identifiers: Vec<String>, tags: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for identifier in &identifiers {
        batch.record(set_one(client, identifier, &tags).await);
    }
    batch.finish()
}

/// Replace the full tag set: drop everything current, then add the new ones.
async fn set_one(client: &PlatformClient, identifier: &str, tags: &[String]) -> Result<()> {
    let target = resolve_taggable(client, identifier).await?;
    let current = client.list_tags(target.kind(), target.uuid()).await?;
    for tag in current {
        client
            .remove_tag(target.kind(), target.uuid(), &tag.name)
            .await?;
    }
    client.add_tags(target.kind(), target.uuid(), tags).await?;
    println!("{}", target.uuid());
    Ok(())
}
