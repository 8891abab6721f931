//! Column resolution for device logs.
//!
//! Header names arrive with incidental padding and the value column goes by
//! more than one name depending on the device firmware. The resolver trims
//! every name, insists on the time column, picks the first configured value
//! candidate that is present, and projects the table down to those two
//! columns under canonical names.

use crate::config::SchemaConfig;
use crate::error::{Result, RxError};
use crate::reader::RawTable;
use std::path::Path;
use tracing::debug;

/// Positions of the selected columns in the raw header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub time_index: usize,
    pub value_index: usize,
    /// Value column name as found in the file (trimmed)
    pub source_value_column: String,
}

/// One projected row; `value` is `None` when the record has no such field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRow {
    pub time: String,
    pub value: Option<String>,
}

/// Two-column view of a raw table under canonical names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub time_column: String,
    pub value_column: String,
    pub source_value_column: String,
    pub rows: Vec<ProjectedRow>,
}

impl Projection {
    pub fn columns(&self) -> [&str; 2] {
        [&self.time_column, &self.value_column]
    }
}

/// Resolves time and value columns against a [`SchemaConfig`]
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    config: SchemaConfig,
}

impl SchemaResolver {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Locate the time column and the first present value candidate
    pub fn select(&self, headers: &[String], file_path: &Path) -> Result<ColumnSelection> {
        let trimmed: Vec<&str> = headers.iter().map(|name| name.trim()).collect();
        let time_column = self.config.time_column.trim();

        let time_index = trimmed
            .iter()
            .position(|name| *name == time_column)
            .ok_or_else(|| RxError::MissingTimeColumn {
                path: file_path.to_path_buf(),
                column: time_column.to_string(),
            })?;

        let (value_index, source_value_column) = self
            .config
            .value_candidates
            .iter()
            .find_map(|candidate| {
                let candidate = candidate.trim();
                trimmed
                    .iter()
                    .position(|name| *name == candidate)
                    .map(|index| (index, candidate.to_string()))
            })
            .ok_or_else(|| RxError::MissingValueColumn {
                path: file_path.to_path_buf(),
                candidates: self.config.value_candidates.clone(),
                available: trimmed.iter().map(|name| name.to_string()).collect(),
            })?;

        debug!(
            "Resolved columns for {}: time at {}, '{}' at {}",
            file_path.display(),
            time_index,
            source_value_column,
            value_index
        );

        Ok(ColumnSelection {
            time_index,
            value_index,
            source_value_column,
        })
    }

    /// Resolve columns and project the table to `[time, <canonical value>]`
    pub fn resolve(&self, table: &RawTable, file_path: &Path) -> Result<Projection> {
        let selection = self.select(&table.headers, file_path)?;

        let rows = table
            .records
            .iter()
            .map(|record| ProjectedRow {
                time: record
                    .get(selection.time_index)
                    .unwrap_or_default()
                    .to_string(),
                value: record.get(selection.value_index).map(str::to_string),
            })
            .collect();

        Ok(Projection {
            time_column: self.config.time_column.trim().to_string(),
            value_column: self.config.canonical_value_column.clone(),
            source_value_column: selection.source_value_column,
            rows,
        })
    }
}

impl Default for SchemaResolver {
    fn default() -> Self {
        Self::new(SchemaConfig::default())
    }
}
