//! Image registry commands.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::Image;
use crate::validation;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum ImageCommands {
    /// List images available to this account
    Ls {
        /// Print only names
        #[arg(short, long)]
        quiet: bool,
    },
    /// Remove one or more images from the registry
    Rm {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

pub async fn handle_command(cmd: ImageCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        ImageCommands::Ls { quiet } => ls(&client, quiet).await,
        ImageCommands::Rm { names } => rm(&client, names).await,
    }
}

async fn ls(client: &PlatformClient, quiet: bool) -> Result<()> {
    let images = client.list::<Image>(&[]).await?;

    if quiet {
        for image in &images {
            println!("{}", image.name);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&["NAME", "IN USE", "DESCRIPTION"]);
    for image in &images {
        table.add_row(vec![
            Cell::new(&image.name),
            Cell::new(if image.in_use { "yes" } else { "no" }),
            Cell::new(&image.description),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn rm(client: &PlatformClient, names: Vec<String>) -> Result<()> {
    let mut batch = Batch::new();
    for name in &names {
        batch.record(rm_one(client, name).await);
    }
    batch.finish()
}

async fn rm_one(client: &PlatformClient, name: &str) -> Result<()> {
    validation::parse_image_name(name)?;
    client.delete::<Image>(name).await?;
    println!("{}", name);
    Ok(())
}
