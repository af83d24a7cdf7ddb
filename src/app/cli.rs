use clap::Parser;
use std::path::PathBuf;

use crate::app::models::DecodePolicy;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate selected project files into a single annotated text file"
)]
pub struct Cli {
    /// Project root directory (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Root-relative subdirectories to scan, in order (e.g. 'lib' 'android')
    #[arg(long, num_args = 1..)]
    pub dirs: Option<Vec<String>>,

    /// Filename suffixes to include (e.g. '.dart' '.gradle')
    #[arg(long, num_args = 1..)]
    pub ext: Option<Vec<String>>,

    /// Output file path (defaults to <root>/project_dump.txt)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// How to handle source files that are not valid UTF-8
    #[arg(long, value_enum)]
    pub on_invalid_utf8: Option<DecodePolicy>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_links: bool,
}
