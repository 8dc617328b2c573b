use std::path::PathBuf;

use clap::{Parser, Subcommand};
use diary_server::config::{read_config_or_default, DEFAULT_CONFIG_FILE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diary-server")]
#[command(about = "Blob store for an end-to-end encrypted journal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the server config file
    #[arg(
        long,
        global = true,
        env = "DIARY_SERVER_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the journal blob (default)
    Serve,

    /// Create the shared secret and KDF parameters from a password
    SetPassword {
        /// Use the unsalted SHA-256 scheme (only for existing journals)
        #[arg(long)]
        legacy: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diary_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::SetPassword { legacy } => diary_server::setup::run(&cli.config, legacy),
        Commands::Serve => {
            let config = read_config_or_default(&cli.config)?;
            let settings = config.resolve(|key| std::env::var(key).ok())?;
            diary_server::serve(settings, shutdown_signal()).await
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
