//! Integration tests for the batch driver
//!
//! Runs complete batches over small device logs written to temporary
//! directories.

pub mod basic_processing;

use std::fs;
use std::path::{Path, PathBuf};

/// Write a device log with the default one-line preamble
pub fn write_log(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = format!("RX export\n{header}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}
