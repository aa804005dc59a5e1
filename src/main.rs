use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fleetctl::commands::service::ServiceOptions;
use fleetctl::commands::{
    apps, cluster, container, image, login, node, service, stack, tag, trigger, volume,
};
use fleetctl::config::Config;
use fleetctl::exit_codes;

#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(
    about = "Manage containerized services on the platform and on your local engine",
    long_about = "fleetctl manages containerized applications across two sources.\n\nWith an account configured, commands run against the remote orchestration\nplatform: services, containers, nodes, node clusters, stacks, volumes,\ntags and triggers.\n\nWithout an account, the application commands fall back to the local\ncontainer engine: containers named 'local-<app>-<n>' with matching size\nlimits are grouped into applications and managed in place."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Store platform credentials
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        apikey: String,
        /// Platform endpoint
        #[arg(long)]
        host: Option<String>,
    },
    /// List applications, remote and local
    Ps {
        /// Print only uuids/names
        #[arg(short, long)]
        quiet: bool,
    },
    /// Create and deploy an application
    Run {
        image: String,
        /// Deploy on the local engine even with an account configured
        #[arg(long)]
        local: bool,
        /// Container size for local deployments (XS, S, M, L, XL)
        #[arg(long)]
        size: Option<String>,
        #[command(flatten)]
        options: ServiceOptions,
    },
    /// Start one or more applications or containers, remote or local
    Start { identifiers: Vec<String> },
    /// Stop one or more applications or containers, remote or local
    Stop { identifiers: Vec<String> },
    /// Terminate one or more applications or containers, remote or local
    Terminate { identifiers: Vec<String> },
    /// Fetch logs of one or more applications or containers, remote or local
    Logs { identifiers: Vec<String> },
    /// Show details of one or more applications or containers, remote or local
    Inspect { identifiers: Vec<String> },
    /// Manage services
    Service {
        #[command(subcommand)]
        subcommand: service::ServiceCommands,
    },
    /// Manage containers
    Container {
        #[command(subcommand)]
        subcommand: container::ContainerCommands,
    },
    /// Manage nodes
    Node {
        #[command(subcommand)]
        subcommand: node::NodeCommands,
    },
    /// Manage node clusters
    Cluster {
        #[command(subcommand)]
        subcommand: cluster::ClusterCommands,
    },
    /// Manage stacks
    Stack {
        #[command(subcommand)]
        subcommand: stack::StackCommands,
    },
    /// Manage volumes
    Volume {
        #[command(subcommand)]
        subcommand: volume::VolumeCommands,
    },
    /// Manage volume groups
    Volumegroup {
        #[command(subcommand)]
        subcommand: volume::VolumeGroupCommands,
    },
    /// Manage tags on services, node clusters and nodes
    Tag {
        #[command(subcommand)]
        subcommand: tag::TagCommands,
    },
    /// Manage redeploy triggers
    Trigger {
        #[command(subcommand)]
        subcommand: trigger::TriggerCommands,
    },
    /// Manage registry images
    Image {
        #[command(subcommand)]
        subcommand: image::ImageCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(error) = run(cli).await {
        eprintln!("{:#}", error);
        std::process::exit(exit_codes::exit_code_for_anyhow(&error));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).map_err(fleetctl::FleetctlError::Config)?;

    match cli.command {
        Commands::Login {
            username,
            apikey,
            host,
        } => {
            login::login(cli.config.as_deref(), username, apikey, host)?;
        }
        Commands::Ps { quiet } => {
            apps::ps(&config, quiet).await?;
        }
        Commands::Run {
            image,
            local,
            size,
            options,
        } => {
            apps::run(&config, image, options, local, size).await?;
        }
        Commands::Start { identifiers } => {
            apps::dispatch(&config, apps::Verb::Start, identifiers).await?;
        }
        Commands::Stop { identifiers } => {
            apps::dispatch(&config, apps::Verb::Stop, identifiers).await?;
        }
        Commands::Terminate { identifiers } => {
            apps::dispatch(&config, apps::Verb::Terminate, identifiers).await?;
        }
        Commands::Logs { identifiers } => {
            apps::dispatch(&config, apps::Verb::Logs, identifiers).await?;
        }
        Commands::Inspect { identifiers } => {
            apps::dispatch(&config, apps::Verb::Inspect, identifiers).await?;
        }
        Commands::Service { subcommand } => {
            service::handle_command(subcommand, &config).await?;
        }
        Commands::Container { subcommand } => {
            container::handle_command(subcommand, &config).await?;
        }
        Commands::Node { subcommand } => {
            node::handle_command(subcommand, &config).await?;
        }
        Commands::Cluster { subcommand } => {
            cluster::handle_command(subcommand, &config).await?;
        }
        Commands::Stack { subcommand } => {
            stack::handle_command(subcommand, &config).await?;
        }
        Commands::Volume { subcommand } => {
            volume::handle_command(subcommand, &config).await?;
        }
        Commands::Volumegroup { subcommand } => {
            volume::handle_group_command(subcommand, &config).await?;
        }
        Commands::Tag { subcommand } => {
            tag::handle_command(subcommand, &config).await?;
        }
        Commands::Trigger { subcommand } => {
            trigger::handle_command(subcommand, &config).await?;
        }
        Commands::Image { subcommand } => {
            image::handle_command(subcommand, &config).await?;
        }
    }
    Ok(())
}
