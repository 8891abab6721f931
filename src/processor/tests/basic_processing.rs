//! Basic batch processing tests

use super::write_log;
use crate::config::ProcessorConfig;
use crate::processor::{BatchProcessor, BatchState};
use std::fs;
use tempfile::TempDir;

fn config_in(temp_dir: &TempDir) -> ProcessorConfig {
    ProcessorConfig::default()
        .with_workers(2)
        .with_error_log(temp_dir.path().join("error_log.txt"))
}

#[tokio::test]
async fn test_batch_processes_all_files() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_log(
        temp_dir.path(),
        "a.log",
        "time,MX_RX_LEVEL",
        &["00:00:00,1", "00:00:02,2", "00:00:04,3", "00:00:06,4", "00:00:08,5"],
    );
    let b = write_log(
        temp_dir.path(),
        "b.log",
        "time,1803_RX_LEVEL",
        &["00:00:10,10", "00:00:12,20"],
    );

    let mut processor = BatchProcessor::new(config_in(&temp_dir)).unwrap();
    assert_eq!(processor.state(), BatchState::Idle);

    let report = processor.run(&[a.clone(), b.clone()]).await;

    assert_eq!(processor.state(), BatchState::Done);
    assert_eq!(report.total_files, 2);
    assert_eq!(report.files_processed(), 2);
    assert_eq!(report.files_failed(), 0);
    assert_eq!(report.total_rows(), 2);
    assert_eq!(report.success_rate(), 100.0);
    assert!(report.error_log.is_none());
    assert!(!temp_dir.path().join("error_log.txt").exists());

    assert_eq!(report.processed[0].path, a);
    assert_eq!(report.processed[1].path, b);

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("a_output.txt")).unwrap(),
        "time,MX_RX_LEVEL\n00:00:00,15.0\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("b_output.txt")).unwrap(),
        "time,MX_RX_LEVEL\n00:00:10,75.0\n"
    );
}

#[tokio::test]
async fn test_empty_batch_completes() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = BatchProcessor::new(config_in(&temp_dir)).unwrap();

    let report = processor.run(&[]).await;

    assert_eq!(processor.state(), BatchState::Done);
    assert_eq!(report.total_files, 0);
    assert_eq!(report.success_rate(), 0.0);
    assert!(report.error_log.is_none());
}

#[tokio::test]
async fn test_more_files_than_workers() {
    let temp_dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..12)
        .map(|i| {
            write_log(
                temp_dir.path(),
                &format!("dev{i:02}.log"),
                "time,MX_RX_LEVEL",
                &[&format!("01:00:0{},{}", i % 10, i)],
            )
        })
        .collect();

    let mut processor = BatchProcessor::new(config_in(&temp_dir)).unwrap();
    let report = processor.run(&paths).await;

    assert_eq!(report.files_processed(), 12);
    let reported: Vec<_> = report.processed.iter().map(|p| p.path.clone()).collect();
    assert_eq!(reported, paths);
    for path in &paths {
        let stem = path.file_stem().unwrap().to_string_lossy();
        assert!(temp_dir.path().join(format!("{stem}_output.txt")).exists());
    }
}

#[tokio::test]
async fn test_summary_mentions_counts() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_log(temp_dir.path(), "a.log", "time,MX_RX_LEVEL", &["00:00:00,x"]);

    let mut processor = BatchProcessor::new(config_in(&temp_dir)).unwrap();
    let report = processor.run(&[a]).await;

    assert_eq!(report.coerced_values(), 1);
    let summary = report.summary();
    assert!(summary.contains("1 total, 1 processed, 0 failed"));
    assert!(summary.contains("1 values treated as missing"));
}
