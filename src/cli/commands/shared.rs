//! Shared components for CLI commands

use crate::processor::BatchReport;
use colored::*;
use tracing::debug;

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level derived from the flags.
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rxlevel_processor={}", log_level)));

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Print the colored end-of-batch summary on stdout
pub fn print_batch_summary(report: &BatchReport) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  Files: {} total, {} processed, {}",
        report.total_files.to_string().bright_white().bold(),
        report.files_processed().to_string().bright_white().bold(),
        if report.files_failed() > 0 {
            format!("{} failed", report.files_failed())
                .bright_red()
                .bold()
        } else {
            "0 failed".normal()
        }
    );
    println!(
        "  Rows written: {}",
        report.total_rows().to_string().bright_white().bold()
    );
    if report.coerced_values() > 0 {
        println!(
            "  Values treated as missing: {}",
            report.coerced_values().to_string().yellow()
        );
    }
    println!(
        "  Duration: {:.2}s ({:.1} files/sec)",
        report.processing_time.as_secs_f64(),
        report.files_per_second()
    );

    if let Some(error_log) = &report.error_log {
        println!(
            "{} {}",
            "Errors logged to".bright_red(),
            error_log.display().to_string().bright_white()
        );
    } else if report.files_failed() > 0 {
        println!(
            "{}",
            "Some files failed and the error report could not be written".bright_red()
        );
    }
}
