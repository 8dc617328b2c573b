use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use diary_core::VERSION;

/// Diary - a private, append-only journal, encrypted end-to-end
#[derive(Parser)]
#[command(name = "diary")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Journal server URL (e.g. http://127.0.0.1:8787)
    #[arg(short, long, global = true, env = "DIARY_SERVER_URL")]
    pub server: Option<String>,

    /// Path to the client config file
    #[arg(long, global = true, env = "DIARY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List journal entries
    List(ListArgs),

    /// Show the latest revision of an entry
    Show(ShowArgs),

    /// Show every revision of an entry, oldest first
    History(IndexArgs),

    /// Add a new entry
    Add(AddArgs),

    /// Append a new revision to an entry
    Edit(EditArgs),

    /// Hide an entry from the default listing
    Hide(IndexArgs),

    /// Make a hidden entry visible again
    Unhide(IndexArgs),

    /// Replace an unreadable stored journal with an empty one
    Reset(ResetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Include hidden entries
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Entry number as shown by `diary list`
    #[arg(value_name = "N")]
    pub index: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// An entry number as shown by `diary list`
#[derive(Args)]
pub struct IndexArgs {
    #[arg(value_name = "N")]
    pub index: usize,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Entry body (otherwise read from stdin)
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    #[arg(value_name = "N")]
    pub index: usize,

    /// New body (otherwise read from stdin)
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `reset` command
#[derive(Args)]
pub struct ResetArgs {
    /// Confirm that the stored journal may be replaced by an empty one
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
