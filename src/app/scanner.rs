use crate::app::models::{DumpConfig, FileEntry};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::path::Path;

pub struct Scanner<'a> {
    config: &'a DumpConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a DumpConfig) -> Self {
        Self { config }
    }

    /// Walks each configured subdirectory in the given order and collects
    /// every file whose name ends with one of the configured suffixes.
    ///
    /// Entries within a directory are visited in file-name order so that a
    /// run over an unchanged tree always produces the same sequence. A
    /// configured subdirectory that does not exist contributes nothing.
    pub fn scan(&self) -> Vec<FileEntry> {
        let mut entries = Vec::new();

        for dir in &self.config.directories {
            let dir_path = self.config.root.join(dir);
            if !dir_path.is_dir() {
                log::debug!("Skipping nonexistent directory {:?}", dir_path);
                continue;
            }

            // All standard filters off: no gitignore handling, no hidden-file
            // filtering. Everything under the directory is a candidate.
            let walker = WalkBuilder::new(&dir_path)
                .standard_filters(false)
                .follow_links(self.config.follow_links)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();

            for result in walker {
                match result {
                    Ok(entry) => {
                        if entry.file_type().map_or(false, |t| t.is_file()) {
                            if let Some(found) = self.process_file(entry.path()) {
                                entries.push(found);
                            }
                        }
                    }
                    Err(err) => log::warn!("Error walking entry: {}", err),
                }
            }
        }

        entries
    }

    fn process_file(&self, path: &Path) -> Option<FileEntry> {
        // Never dump the output file into itself.
        if path == self.config.output_path {
            return None;
        }

        let name = path.file_name()?.to_string_lossy();
        if !self.matches_extension(&name) {
            return None;
        }

        let relative = diff_paths(path, &self.config.root)?;

        Some(FileEntry {
            path: path.to_path_buf(),
            relative_path: relative,
        })
    }

    // Exact suffix match, case-sensitive.
    fn matches_extension(&self, name: &str) -> bool {
        self.config
            .extensions
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }
}
