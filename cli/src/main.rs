//! Memotree entry point
//!
//! Edits, renders and plays a voice memo tree stored in a data directory.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memotree_cli::{App, Command};

#[derive(Parser)]
#[command(name = "memotree")]
#[command(about = "Record, organize and play voice memos as a tree")]
#[command(version)]
struct Args {
    /// Directory holding treeData.json and recordings.json
    #[arg(long, short)]
    data_dir: Option<PathBuf>,

    /// JSON file overriding the canvas geometry
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_filter = if args.verbose {
        "memotree=debug,memotree_cli=debug,memotree_core=debug"
    } else {
        "memotree=info,memotree_cli=info,memotree_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(cwd) => cwd.join(".memotree"),
            Err(e) => {
                tracing::error!("Failed to get current directory: {}", e);
                std::process::exit(1);
            }
        },
    };
    tracing::debug!("Data directory: {:?}", data_dir);

    let app = match App::open(&data_dir, args.layout.as_deref()).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to open {}: {:#}", data_dir.display(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = args.command.run(&app).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
