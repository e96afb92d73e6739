mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, init, move_element, rename, tree, CheckArgs, InitArgs, MoveArgs, RenameArgs, TreeArgs,
};
use tracing_subscriber::EnvFilter;

/// Trellis CLI - edit page trees with undoable commands
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Trellis project
    Init(InitArgs),

    /// Print the element tree of one or all pages
    Tree(TreeArgs),

    /// Verify the structure of one or all pages
    Check(CheckArgs),

    /// Rename an element
    Rename(RenameArgs),

    /// Move, reorder or delete an element
    Move(MoveArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Tree(args) => tree(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Rename(args) => rename(args, &cwd).await,
        Command::Move(args) => move_element(args, &cwd).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
