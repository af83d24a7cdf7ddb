// Declare modules
pub mod cli;
pub mod config;
pub mod dumper;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::resolve_config;
use self::dumper::Dumper;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Identify Project Root
    let root = match args.root.clone() {
        Some(path) => path,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    // 3. Resolve Configuration
    let config = resolve_config(args, root)?;

    if config.directories.is_empty() {
        log::warn!("💡 Tip: No directories to scan (via --dirs or a preset).");
    }
    if config.extensions.is_empty() {
        log::warn!("💡 Tip: No file extensions configured (via --ext or a preset).");
    }

    // 4. Scan Directories
    let scanner = Scanner::new(&config);
    let entries = scanner.scan();

    if entries.is_empty() {
        log::warn!("⚠️ No matching files found under the configured directories.");
        // The run still creates the (empty) output file, so every run
        // truncates the previous dump no matter what matched.
    }

    // 5. Write the dump
    let report = Dumper::new(&config).dump(&entries)?;

    // 6. Confirmation to Stdout
    println!(
        "Project dump completed successfully ({} files). Output file: {}",
        report.files_written,
        report.output_path.display()
    );

    Ok(())
}
