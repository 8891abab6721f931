//! Raw table loading for device logs.
//!
//! A device log starts with a fixed number of metadata lines, followed by a
//! delimited header row and the data rows. Header names are kept exactly as
//! written (padding included); trimming belongs to the schema resolver.

use crate::config::InputFormat;
use crate::error::{Result, RxError};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Header plus data records of one input file, fully loaded
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, records: Vec<StringRecord>) -> Self {
        Self { headers, records }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Load a device log from disk
pub fn read_raw_table(file_path: &Path, format: &InputFormat) -> Result<RawTable> {
    let file = File::open(file_path)?;
    let table = read_raw_table_from(BufReader::new(file), file_path, format)?;

    debug!(
        "Loaded {}: {} columns, {} data rows",
        file_path.display(),
        table.headers.len(),
        table.row_count()
    );
    Ok(table)
}

/// Load a device log from any buffered reader; `file_path` is only used in errors
pub fn read_raw_table_from<R: BufRead>(
    mut reader: R,
    file_path: &Path,
    format: &InputFormat,
) -> Result<RawTable> {
    let mut line = Vec::new();
    for _ in 0..format.metadata_lines {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(RxError::EmptyInput {
                path: file_path.to_path_buf(),
                skipped: format.metadata_lines,
            });
        }
    }

    read_delimited(reader, file_path, format)
}

fn read_delimited<R: Read>(reader: R, file_path: &Path, format: &InputFormat) -> Result<RawTable> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|name| name.to_string())
        .collect();

    if headers.iter().all(|name| name.trim().is_empty()) {
        return Err(RxError::EmptyInput {
            path: file_path.to_path_buf(),
            skipped: format.metadata_lines,
        });
    }

    let records = csv_reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(RawTable::new(headers, records))
}
