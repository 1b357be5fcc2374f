//! Terrastamp CLI - Command-line interface for stamping terrain grids

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{apply, init, inspect};

#[derive(Parser)]
#[command(name = "terrastamp")]
#[command(about = "Apply height stamps onto a chunked terrain grid", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample world file
    Init {
        /// Path of the world file to create
        path: String,
    },

    /// Show grid geometry and where each stamp lands
    Inspect {
        /// Path to world file
        world: String,
    },

    /// Build the grid, apply every stamp and export chunk heightmaps
    Apply {
        /// Path to world file
        world: String,

        /// Output directory for chunk PNGs
        #[arg(short, long, default_value = "chunks")]
        output: String,

        /// Also write the whole grid as a single stitched PNG
        #[arg(long)]
        stitched: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Init { path } => init::run(&path),
        Commands::Inspect { world } => inspect::run(&world),
        Commands::Apply {
            world,
            output,
            stitched,
        } => apply::run(apply::ApplyArgs {
            world,
            output,
            stitched,
        }),
    }
}
