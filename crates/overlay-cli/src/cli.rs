use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "overlay",
    about = "Overlay: deep-merge layered JSON config files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Abort merges nested deeper than this
    #[arg(long, global = true, default_value_t = overlay_merge::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge config files, later files overriding earlier ones
    Merge(MergeArgs),
    /// Parse one file and print a normalized deep copy
    Copy(CopyArgs),
    /// Check that config files parse
    Check(CheckArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Config layers, lowest precedence first
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CopyArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
