// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for mmbatch
//!
//! A batch run is short-lived, so metrics are written once at the end of the
//! run to a text file for the node exporter textfile collector:
//! - mmcmd invocation metrics (count, duration)
//! - Record operation metrics (adds, removes, zone creations)
//! - Control-file line metrics (processed, skipped)

use lazy_static::lazy_static;
use prometheus::{
    opts, register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec,
    TextEncoder,
};
use std::path::Path;

lazy_static! {
    /// mmcmd invocation counter by command and result
    pub static ref MMCMD_COMMANDS_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "mmbatch_mmcmd_commands_total",
            "Total number of mmcmd commands executed"
        ),
        &["command", "result"]
    )
    .expect("Failed to create MMCMD_COMMANDS_TOTAL metric");

    /// mmcmd invocation duration histogram
    pub static ref MMCMD_COMMAND_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "mmbatch_mmcmd_command_duration_seconds",
        "mmcmd command execution duration in seconds",
        &["command"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("Failed to create MMCMD_COMMAND_DURATION_SECONDS metric");

    /// Record operations counter by operation type and result
    pub static ref RECORD_OPERATIONS_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "mmbatch_record_operations_total",
            "Total number of record and zone operations"
        ),
        &["operation", "result"]
    )
    .expect("Failed to create RECORD_OPERATIONS_TOTAL metric");

    /// Control file lines by outcome
    pub static ref LINES_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "mmbatch_lines_total",
            "Total number of control file lines read"
        ),
        &["outcome"]
    )
    .expect("Failed to create LINES_TOTAL metric");

    /// Application info metric
    pub static ref APP_INFO: CounterVec = register_counter_vec!(
        opts!(
            "mmbatch_app_info",
            "Application information"
        ),
        &["version"]
    )
    .expect("Failed to create APP_INFO metric");
}

/// Initialize metrics with application info
pub fn init_metrics() {
    APP_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .inc();
}

/// Generate metrics output in Prometheus format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Write the current metrics to a textfile collector file
///
/// The file is written next to its destination and renamed into place so the
/// collector never reads a partial file.
pub fn write_textfile(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = gather_metrics()?;
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, text)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Record an mmcmd invocation
///
/// Only the command verb is used as label, never its arguments.
pub fn record_mmcmd_command(command: &str, success: bool, duration: f64) {
    let verb = command.split_whitespace().next().unwrap_or("unknown");
    let result = if success { "success" } else { "error" };
    MMCMD_COMMANDS_TOTAL
        .with_label_values(&[verb, result])
        .inc();
    MMCMD_COMMAND_DURATION_SECONDS
        .with_label_values(&[verb])
        .observe(duration);
}

/// Record a record or zone operation
pub fn record_operation(operation: &str, success: bool) {
    let result = if success { "success" } else { "error" };
    RECORD_OPERATIONS_TOTAL
        .with_label_values(&[operation, result])
        .inc();
}

/// Record the outcome of a control file line
pub fn record_line(skipped: bool) {
    let outcome = if skipped { "skipped" } else { "processed" };
    LINES_TOTAL.with_label_values(&[outcome]).inc();
}
