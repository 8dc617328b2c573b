//! Diary CLI - a private, append-only journal encrypted end-to-end
//!
//! Everything is decrypted here, on the client; the server only ever sees
//! the access credential and the ciphertext blob.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use diary_core::VERSION;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{entries, misc, reset};
use crate::errors::classify;
use crate::ui::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli).await {
        let ui_ctx = ctx.ui_context(false);
        let err = classify(e);
        print_error(&ui_ctx, err.message(), err.hint());
        std::process::exit(err.exit_code());
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("diary_cli={0},diary_core={0}", default_level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::List(args)) => entries::handle_list(ctx, args).await?,
        Some(Commands::Show(args)) => entries::handle_show(ctx, args).await?,
        Some(Commands::History(args)) => entries::handle_history(ctx, args).await?,
        Some(Commands::Add(args)) => entries::handle_add(ctx, args).await?,
        Some(Commands::Edit(args)) => entries::handle_edit(ctx, args).await?,
        Some(Commands::Hide(args)) => entries::handle_set_hidden(ctx, args, true).await?,
        Some(Commands::Unhide(args)) => entries::handle_set_hidden(ctx, args, false).await?,
        Some(Commands::Reset(args)) => reset::handle_reset(ctx, args).await?,
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("Diary v{}", VERSION);
            println!("\nQuickstart:");
            println!("  export DIARY_SERVER_URL=http://127.0.0.1:8787");
            println!("  diary add --body \"Hello\"");
            println!("  diary list");
            println!("  diary show 1");
            println!("\nRun `diary --help` for full usage.");
        }
    }

    Ok(())
}
