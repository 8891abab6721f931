//! RX Level Processor Library
//!
//! Reduces per-device RX level logs into fixed ten-second bucket tables.
//!
//! Each input file is a CSV log with a metadata preamble, a `time` column
//! (`HH:MM:SS`) and one RX level column. Samples are grouped into the
//! half-open buckets of one day and each bucket is reduced with a
//! count-sensitive rule: exactly the expected number of samples gives their
//! sum, any other non-zero count gives the mean scaled to the expected count.
//!
//! This library provides:
//! - Column resolution across the known RX level column spellings
//! - Time-of-day parsing with lenient value coercion
//! - Day bucket generation and per-bucket aggregation
//! - A per-file pipeline writing `<stem>_output.txt` next to the input
//! - A parallel batch driver with failure isolation and an error report

pub mod aggregator;
pub mod buckets;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;
pub mod reader;
pub mod schema;
pub mod time_parser;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use buckets::DayBuckets;
pub use config::{EmptyBucketPolicy, ProcessorConfig};
pub use error::{FailureKind, Result, RxError};
pub use models::{BucketResult, FileFailure, FileOutcome, ProcessedFile, Sample, TimeOfDay};
pub use processor::pipeline::{FilePipeline, FileProcessor};
pub use processor::{BatchProcessor, BatchReport, BatchState};
pub use schema::SchemaResolver;
