//! Trigger commands. Triggers live under a service.

use crate::config::Config;
use crate::error::{FleetctlError, Result};
use crate::exit_codes::Batch;
use crate::format;
use crate::remote::client::PlatformClient;
use crate::remote::types::{NewTrigger, Service, Trigger};
use crate::resolve::resolve_remote_strict;
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Clone)]
pub enum TriggerCommands {
    /// Create a trigger on a service
    Create {
        /// Service identifier
        identifier: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "REDEPLOY")]
        operation: String,
    },
    /// List triggers of a service
    Ls {
        /// Service identifier
        identifier: String,
        /// Print only uuids
        #[arg(short, long)]
        quiet: bool,
    },
    /// Remove triggers from a service
    Rm {
        /// Service identifier
        identifier: String,
        /// Trigger uuids or names
        #[arg(required = true)]
        triggers: Vec<String>,
    },
}

pub async fn handle_command(cmd: TriggerCommands, config: &Config) -> Result<()> {
    let client = super::platform_client(config)?;
    match cmd {
        TriggerCommands::Create {
            identifier,
            name,
            operation,
        } => create(&client, &identifier, name, operation).await,
        TriggerCommands::Ls { identifier, quiet } => ls(&client, &identifier, quiet).await,
        TriggerCommands::Rm {
            identifier,
            triggers,
        } => rm(&client, &identifier, triggers).await,
    }
}

async fn create(
    client: &PlatformClient,
    identifier: &str,
    name: Option<String>,
    operation: String,
) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    let trigger = client
        .create_trigger(&service.uuid, &NewTrigger { name, operation })
        .await?;
    println!("{}", trigger.uuid);
    Ok(())
}

async fn ls(client: &PlatformClient, identifier: &str, quiet: bool) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    let triggers = client.list_triggers(&service.uuid).await?;

    if quiet {
        for trigger in &triggers {
            println!("{}", trigger.uuid);
        }
        return Ok(());
    }

    let mut table = format::plain_table(&["NAME", "UUID", "OPERATION", "URL"]);
    for trigger in &triggers {
        table.add_row(vec![
            Cell::new(&trigger.name),
            Cell::new(format::short_uuid(&trigger.uuid)),
            Cell::new(&trigger.operation),
            Cell::new(&trigger.url),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn rm(client: &PlatformClient, identifier: &str, triggers: Vec<String>) -> Result<()> {
    let service = resolve_remote_strict::<Service>(client, identifier).await?;
    let existing = client.list_triggers(&service.uuid).await?;

    let mut batch = Batch::new();
    for wanted in &triggers {
        batch.record(rm_one(client, &service.uuid, &existing, wanted).await);
    }
    batch.finish()
}

/// Match a trigger among the service's triggers by uuid prefix or name,
/// under the usual uniqueness rule.
async fn rm_one(
    client: &PlatformClient,
    service_uuid: &str,
    existing: &[Trigger],
    wanted: &str,
) -> Result<()> {
    let matches: Vec<&Trigger> = existing
        .iter()
        .filter(|t| t.uuid.starts_with(wanted) || t.name == wanted)
        .collect();
    let trigger = match matches.len() {
        0 => return Err(FleetctlError::not_found("trigger", wanted)),
        1 => matches[0],
        _ => return Err(FleetctlError::non_unique("trigger", wanted)),
    };
    client.delete_trigger(service_uuid, &trigger.uuid).await?;
    println!("{}", trigger.uuid);
    Ok(())
}
