//! Run summary reporting
//!
//! Printed to stderr after a verbose run; stdout stays reserved for
//! match paths.

use crate::search::StatsSnapshot;
use humansize::{format_size, BINARY};
use std::time::Duration;

/// Print the end-of-run summary
pub fn print_summary(stats: &StatsSnapshot, duration: Duration) {
    let secs = duration.as_secs_f64();
    let throughput = if secs > 0.0 {
        stats.bytes_scanned as f64 / secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("Search complete in {}", format_elapsed(duration));
    eprintln!("  Directories: {}", format_number(stats.dirs_walked));
    eprintln!(
        "  Files:       {} ({} scanned)",
        format_number(stats.files_scanned),
        format_size(stats.bytes_scanned, BINARY)
    );
    eprintln!("  Matches:     {}", format_number(stats.files_matched));
    if stats.errors > 0 {
        eprintln!("  Errors:      {} (skipped entries)", format_number(stats.errors));
    }
    eprintln!("  Throughput:  {}/s", format_size(throughput as u64, BINARY));
}

/// One-line progress report for long verbose runs
pub fn format_progress(stats: &StatsSnapshot, elapsed: Duration) -> String {
    format!(
        "[{}] dirs: {} | files: {} | matches: {} | scanned: {}",
        format_elapsed(elapsed),
        format_number(stats.dirs_walked),
        format_number(stats.files_scanned),
        format_number(stats.files_matched),
        format_size(stats.bytes_scanned, BINARY),
    )
}

/// Format a duration as h/m/s
pub fn format_elapsed(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
