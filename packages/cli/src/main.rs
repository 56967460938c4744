mod commands;
mod config;
mod script;
mod store;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{inspect, new, replay, InspectArgs, NewArgs, ReplayArgs};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Media Kit CLI - build and debug media kit documents without a browser
#[derive(Parser, Debug)]
#[command(name = "mediakit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./mediakit.config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log editor activity to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new media kit document from a starter layout
    New(NewArgs),

    /// Show the structure of a media kit document
    Inspect(InspectArgs),

    /// Replay an editing script against a document
    Replay(ReplayArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(&cwd)?,
    };

    match cli.command {
        Command::New(args) => new(args, &config, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Replay(args) => replay(args, &config, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
