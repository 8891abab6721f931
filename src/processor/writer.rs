//! Output writing for bucket tables and the consolidated error report
//!
//! Bucket tables are written to a temporary file next to the target and
//! renamed into place, so a failed write never leaves a truncated table.

use crate::config::OutputConfig;
use crate::error::{Result, RxError};
use crate::models::{BucketResult, FileFailure};

use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// `<dir>/<stem><suffix>.<extension>` next to the input file
pub fn output_path_for(input: &Path, config: &OutputConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}{}.{}", stem, config.suffix, config.extension);

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Decimal rendering that always keeps a fractional part (`15.0`, `-45.25`)
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// Write one bucket table with header `time,<value_column>`
pub fn write_bucket_table(
    output_path: &Path,
    value_column: &str,
    rows: &[BucketResult],
) -> Result<()> {
    write_atomically(output_path, rows, value_column).map_err(|source| RxError::OutputWrite {
        path: output_path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {} rows to {}", rows.len(), output_path.display());
    Ok(())
}

fn write_atomically(
    output_path: &Path,
    rows: &[BucketResult],
    value_column: &str,
) -> std::io::Result<()> {
    let directory = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = NamedTempFile::new_in(directory)?;
    {
        let mut writer = WriterBuilder::new().from_writer(BufWriter::new(temp_file.as_file()));
        writer.write_record(["time", value_column])?;
        for row in rows {
            let value = format_value(row.output_value);
            writer.write_record([row.time_label.as_str(), value.as_str()])?;
        }
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file.persist(output_path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `<path>: <message>` per failure; nothing is written for an empty list
pub fn write_error_report(report_path: &Path, failures: &[FileFailure]) -> Result<bool> {
    if failures.is_empty() {
        return Ok(false);
    }

    let write_lines = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(report_path)?);
        for failure in failures {
            writeln!(writer, "{}", failure.report_line())?;
        }
        writer.flush()
    };

    write_lines().map_err(|source| RxError::ReportWrite {
        path: report_path.to_path_buf(),
        source,
    })?;

    debug!(
        "Wrote {} failure(s) to {}",
        failures.len(),
        report_path.display()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::fs;
    use tempfile::TempDir;

    fn row(index: usize, label: &str, value: f64) -> BucketResult {
        BucketResult {
            index,
            time_label: label.to_string(),
            output_value: value,
        }
    }

    #[test]
    fn test_output_path_derivation() {
        let config = OutputConfig::default();
        assert_eq!(
            output_path_for(Path::new("/data/rx/dev_0101.log"), &config),
            PathBuf::from("/data/rx/dev_0101_output.txt")
        );
        assert_eq!(
            output_path_for(Path::new("site.a.log"), &config),
            PathBuf::from("site.a_output.txt")
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(15.0), "15.0");
        assert_eq!(format_value(75.0), "75.0");
        assert_eq!(format_value(-45.25), "-45.25");
        assert_eq!(format_value(0.0), "0.0");
    }

    #[test]
    fn test_write_bucket_table() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dev_output.txt");

        write_bucket_table(
            &output,
            "MX_RX_LEVEL",
            &[row(0, "00:00:00", 15.0), row(2, "00:00:20", -212.5)],
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "time,MX_RX_LEVEL\n00:00:00,15.0\n00:00:20,-212.5\n"
        );
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("empty_output.txt");
        write_bucket_table(&output, "MX_RX_LEVEL", &[]).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "time,MX_RX_LEVEL\n");
    }

    #[test]
    fn test_write_onto_directory_is_output_error() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("blocked_output.txt");
        fs::create_dir(&output).unwrap();

        let err = write_bucket_table(&output, "MX_RX_LEVEL", &[row(0, "00:00:00", 1.0)])
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::OutputWrite);
    }

    #[test]
    fn test_error_report_only_when_failures() {
        let temp_dir = TempDir::new().unwrap();
        let report = temp_dir.path().join("error_log.txt");

        assert!(!write_error_report(&report, &[]).unwrap());
        assert!(!report.exists());

        let failures = vec![FileFailure {
            path: PathBuf::from("/logs/b.log"),
            kind: FailureKind::MissingTimeColumn,
            message: "'time' column not found in /logs/b.log".to_string(),
        }];
        assert!(write_error_report(&report, &failures).unwrap());
        assert_eq!(
            fs::read_to_string(&report).unwrap(),
            "/logs/b.log: 'time' column not found in /logs/b.log\n"
        );
    }
}
