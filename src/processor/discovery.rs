//! Batch input discovery
//!
//! Finds device logs under a directory tree and round-trips the batch input
//! list (one path per line) the processor consumes.

use crate::error::Result;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect every file under `root` whose extension equals `extension`, sorted
pub fn discover_log_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(
        "Found {} .{} files under {}",
        files.len(),
        extension,
        root.display()
    );
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Read a batch input list, skipping blank lines
pub fn read_path_list(list_path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(list_path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Write a batch input list, one path per line
pub fn write_path_list(list_path: &Path, paths: &[PathBuf]) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(list_path)?);
    for path in paths {
        writeln!(writer, "{}", path.display())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discovers_nested_logs_only() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("RxData").join("2024").join("06");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.log"), "").unwrap();
        fs::write(temp_dir.path().join("a.log"), "").unwrap();
        fs::write(nested.join("b_output.txt"), "").unwrap();
        fs::write(nested.join("notes.log.bak"), "").unwrap();

        let files = discover_log_files(temp_dir.path(), ".log").unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("RxData/2024/06/b.log"), temp_dir.path().join("a.log")]
        );
    }

    #[test]
    fn test_path_list_round_trip_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("path.txt");
        let paths = vec![PathBuf::from("/x/1.log"), PathBuf::from("/x/2.log")];

        write_path_list(&list, &paths).unwrap();
        fs::write(&list, format!("{}\n  \n", fs::read_to_string(&list).unwrap())).unwrap();

        assert_eq!(read_path_list(&list).unwrap(), paths);
    }

    #[test]
    fn test_missing_list_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_path_list(&temp_dir.path().join("nope.txt")).is_err());
    }
}
