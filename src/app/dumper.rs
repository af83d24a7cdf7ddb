use crate::app::models::{DecodePolicy, DumpConfig, DumpReport, FileEntry};
use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};

pub struct Dumper<'a> {
    config: &'a DumpConfig,
}

impl<'a> Dumper<'a> {
    pub fn new(config: &'a DumpConfig) -> Self {
        Self { config }
    }

    /// Creates (truncating) the output file and writes one header + content
    /// block per entry, in the order given. Each file is fully read and
    /// closed before the next one is opened.
    ///
    /// Failure to create the output file, or any read/write error other
    /// than an invalid-byte decode under a tolerant policy, aborts the run.
    pub fn dump(&self, entries: &[FileEntry]) -> Result<DumpReport> {
        let file = File::create(&self.config.output_path).context(format!(
            "Failed to create output file {:?}",
            self.config.output_path
        ))?;
        let mut out = BufWriter::new(file);

        for entry in entries {
            println!("Dumping: {}", entry.relative_path.display());

            let bytes =
                fs::read(&entry.path).context(format!("Failed to read {:?}", entry.path))?;
            let content = decode(&bytes, self.config.decode_policy)
                .with_context(|| format!("File {:?} is not valid UTF-8", entry.path))?;

            writeln!(
                out,
                "==================== FILE: {} ====================",
                entry.relative_path.display()
            )?;
            out.write_all(content.as_bytes())?;
            // Blank line between blocks
            out.write_all(b"\n\n")?;
        }

        out.flush().context("Failed to flush output file")?;

        Ok(DumpReport {
            files_written: entries.len(),
            output_path: self.config.output_path.clone(),
        })
    }
}

fn decode(bytes: &[u8], policy: DecodePolicy) -> Result<String> {
    match policy {
        DecodePolicy::Strict => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(err) => bail!("invalid byte sequence at offset {}", err.valid_up_to()),
        },
        DecodePolicy::Replace => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DecodePolicy::Skip => {
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
            }
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn config_for(root: &Path, policy: DecodePolicy) -> DumpConfig {
        DumpConfig {
            root: root.to_path_buf(),
            output_path: root.join("project_dump.txt"),
            directories: vec!["lib".into()],
            extensions: vec![".dart".into()],
            decode_policy: policy,
            follow_links: false,
        }
    }

    fn entry_for(root: &Path, relative: &str, content: &[u8]) -> FileEntry {
        let relative_path = PathBuf::from(relative);
        let path = root.join(&relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        FileEntry {
            path,
            relative_path,
        }
    }

    #[test]
    fn writes_one_block_per_file_with_header_and_blank_line() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let entries = vec![
            entry_for(root, "lib/a.dart", b"void main(){}"),
            entry_for(root, "lib/b.dart", b"class B {}"),
        ];

        let config = config_for(root, DecodePolicy::Replace);
        let report = Dumper::new(&config).dump(&entries).unwrap();
        assert_eq!(report.files_written, 2);

        let output = fs::read_to_string(&config.output_path).unwrap();
        let expected = format!(
            "==================== FILE: {} ====================\nvoid main(){{}}\n\n\
             ==================== FILE: {} ====================\nclass B {{}}\n\n",
            Path::new("lib").join("a.dart").display(),
            Path::new("lib").join("b.dart").display(),
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn empty_entry_list_produces_an_empty_output_file() {
        let tmp = tempdir().unwrap();
        let config = config_for(tmp.path(), DecodePolicy::Replace);

        let report = Dumper::new(&config).dump(&[]).unwrap();
        assert_eq!(report.files_written, 0);
        assert_eq!(fs::read(&config.output_path).unwrap(), b"");
    }

    #[test]
    fn output_is_truncated_on_each_run() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let entries = vec![entry_for(root, "lib/a.dart", b"void main(){}")];
        let config = config_for(root, DecodePolicy::Replace);
        let dumper = Dumper::new(&config);

        dumper.dump(&entries).unwrap();
        let first = fs::read(&config.output_path).unwrap();
        dumper.dump(&entries).unwrap();
        let second = fs::read(&config.output_path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn replace_policy_substitutes_invalid_bytes() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let entries = vec![entry_for(root, "lib/a.dart", b"ab\xffcd")];

        let config = config_for(root, DecodePolicy::Replace);
        Dumper::new(&config).dump(&entries).unwrap();

        let output = fs::read_to_string(&config.output_path).unwrap();
        assert!(output.contains("ab\u{FFFD}cd"));
    }

    #[test]
    fn skip_policy_drops_invalid_bytes() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let entries = vec![entry_for(root, "lib/a.dart", b"ab\xff\xfecd")];

        let config = config_for(root, DecodePolicy::Skip);
        Dumper::new(&config).dump(&entries).unwrap();

        let output = fs::read_to_string(&config.output_path).unwrap();
        assert!(output.contains("abcd"));
        assert!(!output.contains('\u{FFFD}'));
    }

    #[test]
    fn strict_policy_fails_on_invalid_bytes() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let entries = vec![entry_for(root, "lib/a.dart", b"ab\xffcd")];

        let config = config_for(root, DecodePolicy::Strict);
        let err = Dumper::new(&config).dump(&entries).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn unreadable_source_file_aborts_the_run() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let entries = vec![FileEntry {
            path: root.join("lib").join("gone.dart"),
            relative_path: PathBuf::from("lib").join("gone.dart"),
        }];

        let config = config_for(root, DecodePolicy::Replace);
        assert!(Dumper::new(&config).dump(&entries).is_err());
    }

    #[test]
    fn unwritable_output_path_fails_before_reading_anything() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let mut config = config_for(root, DecodePolicy::Replace);
        config.output_path = root.join("no_such_dir").join("dump.txt");

        let err = Dumper::new(&config).dump(&[]).unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));
    }
}
