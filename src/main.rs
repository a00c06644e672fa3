//! Patchpath CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "patchpath")]
#[command(about = "Cheapest patch sequences between game versions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./patchpath.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store snapshot to load instead of the demo data
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the cheapest patch path between two versions of a title
    Resolve {
        /// Title id
        title: u32,
        /// Installed version label
        from: String,
        /// Desired version label
        to: String,
    },
    /// Write the demo data to a snapshot file
    Seed {
        /// Output path
        out: PathBuf,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("patchpath={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = config::AppConfig::load(cli.config.as_deref())?;
    if cli.data.is_some() {
        config.data = cli.data;
    }

    match cli.command {
        Commands::Serve { port, host } => {
            tracing::info!("Patchpath v{}", env!("CARGO_PKG_VERSION"));
            commands::serve(&config, host, port).await
        }
        Commands::Resolve { title, from, to } => {
            commands::resolve(&config, title, &from, &to).await
        }
        Commands::Seed { out } => {
            commands::seed(&out).await
        }
        Commands::Version => {
            println!("Patchpath v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
