//! Layout Studio - Command line front end
//!
//! Exports saved workflows to PDF and inspects or imports them.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use store::pdf::PdfBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "layout-studio", about = "Layout editor workflows and PDF export")]
struct Cli {
    /// Directory holding settings.json and workflows.json
    #[arg(long, env = "LAYOUT_STUDIO_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an exported workflow file to PDF
    Export(ExportArgs),
    /// Print the pages and elements of an exported workflow file
    Info {
        workflow: PathBuf,
    },
    /// List saved workflows, most recently updated first
    List,
    /// Import an exported workflow file into the saved workflows
    Import {
        workflow: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ExportArgs {
    workflow: PathBuf,

    /// Output file; defaults to the configured export filename
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    backend: Option<PdfBackend>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Pages to export, 1-based and inclusive, e.g. `2` or `1-3`
    #[arg(long)]
    pages: Option<String>,

    /// Leave content streams uncompressed
    #[arg(long)]
    no_compress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::debug!(data_dir = %cli.data_dir.display(), "Starting layout-studio");

    match cli.command {
        Command::Export(args) => commands::export(&cli.data_dir, args).await,
        Command::Info { workflow } => commands::info(&workflow).await,
        Command::List => commands::list(&cli.data_dir).await,
        Command::Import { workflow } => commands::import(&cli.data_dir, &workflow).await,
    }
}
