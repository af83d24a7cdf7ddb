use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub root: PathBuf,
    pub output_path: PathBuf,
    pub directories: Vec<String>,
    pub extensions: Vec<String>,
    pub decode_policy: DecodePolicy,
    pub follow_links: bool,
}

/// Policy for source files whose bytes are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Fail the run on the first file with invalid bytes
    Strict,
    /// Substitute U+FFFD for each invalid sequence
    #[default]
    Replace,
    /// Drop invalid bytes from the output
    Skip,
}

/// Represents a single file discovered during the scan.
#[derive(Debug)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Path relative to the project root, used only for the header line.
    pub relative_path: PathBuf,
}

/// Outcome of a completed dump.
#[derive(Debug)]
pub struct DumpReport {
    pub files_written: usize,
    pub output_path: PathBuf,
}
