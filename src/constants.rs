//! Application constants for the RX level processor
//!
//! Default values for the input format, schema resolution, bucketing and
//! batch execution. Everything here is a default only; the live values are
//! carried by [`ProcessorConfig`](crate::config::ProcessorConfig).

// =============================================================================
// Input Format
// =============================================================================

/// Lines preceding the header row in a device log
pub const DEFAULT_METADATA_LINES: usize = 1;

/// Field delimiter of device logs
pub const DEFAULT_DELIMITER: u8 = b',';

/// Extension of device logs picked up by discovery
pub const DEFAULT_LOG_EXTENSION: &str = "log";

// =============================================================================
// Schema Resolution
// =============================================================================

/// Name of the mandatory time column after trimming
pub const TIME_COLUMN: &str = "time";

/// Canonical name of the value column in output tables
pub const CANONICAL_VALUE_COLUMN: &str = "MX_RX_LEVEL";

/// Value column names accepted in priority order (primary, then legacy alias)
pub const VALUE_COLUMN_CANDIDATES: &[&str] = &["MX_RX_LEVEL", "1803_RX_LEVEL"];

// =============================================================================
// Bucketing and Aggregation
// =============================================================================

pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Last representable second of the day (23:59:59)
pub const LAST_SECOND_OF_DAY: u32 = SECONDS_PER_DAY - 1;

/// Width of one bucket in seconds
pub const DEFAULT_BUCKET_WIDTH_SECS: u32 = 10;

/// Samples a fully populated bucket holds at the assumed 2 s sampling interval
pub const DEFAULT_EXPECTED_COUNT: usize = 5;

// =============================================================================
// Output
// =============================================================================

/// Appended to the input file stem to name the output table
pub const OUTPUT_SUFFIX: &str = "_output";

pub const OUTPUT_EXTENSION: &str = "txt";

/// Default consolidated error report
pub const DEFAULT_ERROR_LOG: &str = "error_log.txt";

/// Default batch input list
pub const DEFAULT_PATH_LIST: &str = "path.txt";

// =============================================================================
// Batch Execution
// =============================================================================

/// Per-file time limit before a worker result is abandoned
pub const DEFAULT_FILE_TIMEOUT_SECS: u64 = 300;

/// Work queue slots per worker
pub const WORK_QUEUE_DEPTH_PER_WORKER: usize = 2;
