//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Sort finished downloads into the movie and TV libraries.
///
/// Walks the source directory once, moves every recognised video file into
/// its library folder and records it so later runs skip it. Exits 0 when at
/// least one file was moved, 1 otherwise.
#[derive(Parser, Debug)]
#[command(name = "movemedia")]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, env = "MOVEMEDIA_CONFIG", default_value = "movemedia.toml")]
    pub config: PathBuf,

    /// Scan this directory instead of the configured source path
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Classify and route, but neither move nor record anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
