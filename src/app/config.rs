use crate::app::cli::Cli;
use crate::app::models::{DecodePolicy, DumpConfig};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Default output filename, created directly under the project root.
pub const DEFAULT_OUTPUT_NAME: &str = "project_dump.txt";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct PresetConfig {
    dirs: Option<Vec<String>>,
    ext: Option<Vec<String>>,
    output: Option<PathBuf>,
    on_invalid_utf8: Option<DecodePolicy>,
    follow_links: Option<bool>,
}

fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home
        .join(".config")
        .join("project_dump")
        .join("presets.toml");

    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read presets at {:?}", config_path))?;

    let parsed: PresetsFile = toml::from_str(&content).context("Failed to parse presets.toml")?;

    Ok(parsed.presets)
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Resolves symlinks in the output path's parent so the scanner's
/// self-exclusion check compares against the same path the walker yields.
/// A parent that does not exist yet is left alone; creating the file there
/// fails later with the usual output error.
fn normalize_output_path(path: PathBuf) -> PathBuf {
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        if let Ok(parent) = parent.canonicalize() {
            return parent.join(name);
        }
    }
    path
}

pub fn resolve_config(cli: Cli, root: PathBuf) -> Result<DumpConfig> {
    let presets = load_presets_file()?;
    resolve_with_presets(cli, root, &presets)
}

fn resolve_with_presets(
    cli: Cli,
    root: PathBuf,
    presets: &HashMap<String, PresetConfig>,
) -> Result<DumpConfig> {
    let root = root
        .canonicalize()
        .context(format!("Root path {:?} is not accessible", root))?;
    if !root.is_dir() {
        bail!("Root path {:?} is not a directory", root);
    }

    // Determine preset to use: CLI flag > root directory name > None
    let project_name = root.file_name().and_then(|n| n.to_str()).map(str::to_owned);
    let preset_key = cli.preset.or(project_name);
    let preset = preset_key
        .as_deref()
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();

    let output_path = cli
        .output
        .or(preset.output)
        .map(|p| if p.is_absolute() { p } else { root.join(p) })
        .unwrap_or_else(|| root.join(DEFAULT_OUTPUT_NAME));
    let output_path = normalize_output_path(output_path);

    Ok(DumpConfig {
        directories: merge_vecs(preset.dirs, cli.dirs),
        extensions: merge_vecs(preset.ext, cli.ext),
        decode_policy: cli
            .on_invalid_utf8
            .or(preset.on_invalid_utf8)
            .unwrap_or_default(),
        follow_links: cli.follow_links || preset.follow_links.unwrap_or(false),
        output_path,
        root,
    })
}
