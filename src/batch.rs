// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Batch processing of control files
//!
//! Each control line is validated and turned into either:
//! - an addition, creating the zone first when the server does not know it
//! - a removal, deleting every record of the zone matching the deletion key
//!
//! Lines are handled one at a time and nothing is cached between them, so
//! zones and records are fetched again for every line. Errors reported by
//! mmcmd are logged and counted; failures of mmcmd itself end the run.

use std::cmp::Reverse;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, error, info, warn};

use crate::control::{control_file_path, ControlFileReader, ControlLine, LineOp, Mode};
use crate::metrics;
use crate::mmcmd::MmBackend;
use crate::records::{AdditionRecord, BackendRecord, DeletionKey};
use crate::types::{BackendError, BatchError, SkipReason};

/// Counters for a finished batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub records_added: usize,
    pub records_removed: usize,
    pub zones_created: usize,
    /// Error replies from mmcmd that did not stop the run
    pub backend_errors: usize,
}

/// Applies control-file lines to an [`MmBackend`]
pub struct BatchProcessor<B> {
    backend: B,
    mode: Mode,
}

impl<B: MmBackend + Sync> BatchProcessor<B> {
    pub fn new(backend: B, mode: Mode) -> Self {
        Self { backend, mode }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Open and process the control file named on the command line
    ///
    /// Progress lines go to `out`. When `metrics_file` is set, metrics are
    /// written there after the run, also when the run was aborted.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the run is aborted.
    pub async fn process_file<W: Write>(
        &self,
        arg: &str,
        out: &mut W,
        metrics_file: Option<&Path>,
    ) -> Result<BatchSummary, BatchError> {
        let path = control_file_path(arg);
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|source| BatchError::Open {
                path: path.clone(),
                source,
            })?;

        writeln!(out, "Reading from control file [{}]", path)?;

        let mut reader = ControlFileReader::new(BufReader::new(file));
        let result = self.run(&mut reader).await;

        if let Some(metrics_file) = metrics_file {
            match metrics::write_textfile(metrics_file) {
                Ok(()) => debug!("Wrote metrics to {}", metrics_file.display()),
                Err(e) => error!("Failed to write metrics to {}: {}", metrics_file.display(), e),
            }
        }

        let summary = result.map_err(|source| BatchError::Aborted {
            path: path.clone(),
            line: reader.lines_read(),
            source: Box::new(source),
        })?;

        info!(
            "{} lines skipped, {} records added, {} records removed, {} zones created, {} mmcmd errors",
            summary.lines_skipped,
            summary.records_added,
            summary.records_removed,
            summary.zones_created,
            summary.backend_errors
        );
        writeln!(out, "Done. Processed {} lines", summary.lines_read)?;

        Ok(summary)
    }

    /// Process every line of a control file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or mmcmd itself fails.
    /// Changes made before the failure are kept.
    pub async fn run<R>(
        &self,
        reader: &mut ControlFileReader<R>,
    ) -> Result<BatchSummary, BatchError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = BatchSummary::default();

        while let Some(line) = reader.next_line().await? {
            self.process_line(&line, &mut summary).await?;
        }

        summary.lines_read = reader.lines_read();
        Ok(summary)
    }

    /// Validate and apply a single control line
    pub async fn process_line(
        &self,
        line: &ControlLine,
        summary: &mut BatchSummary,
    ) -> Result<(), BackendError> {
        match LineOp::parse(line, self.mode) {
            Ok(LineOp::Add(rr)) => {
                metrics::record_line(false);
                self.add(&rr, summary).await
            }
            Ok(LineOp::Remove(key)) => {
                metrics::record_line(false);
                self.remove(&key, summary).await
            }
            Err(reason) => {
                metrics::record_line(true);
                summary.lines_skipped += 1;
                if reason == SkipReason::Blank {
                    debug!("Ignoring line {}: {}", line.number, reason);
                } else {
                    warn!("Ignoring line {}: {}", line.number, reason);
                }
                Ok(())
            }
        }
    }

    /// Add one record, creating its zone when missing
    async fn add(
        &self,
        rr: &AdditionRecord,
        summary: &mut BatchSummary,
    ) -> Result<(), BackendError> {
        debug!("{}", rr.to_rr());

        let zones = self.backend.list_zones().await?;
        if !zones.contains(&rr.zone) {
            info!("Creating zone [{}]", rr.zone);
            let created = match self.backend.create_zone(&rr.zone).await {
                Err(e @ BackendError::NoMasterServer(_)) => {
                    absorb(Err(e), summary)?;
                    metrics::record_operation("create_zone", false);
                    warn!("Not adding [{}], zone [{}] does not exist", rr.to_rr(), rr.zone);
                    return Ok(());
                }
                result => absorb(result, summary)?,
            };
            metrics::record_operation("create_zone", created);
            // a rejected addzone does not stop the add
            if created {
                summary.zones_created += 1;
                absorb(self.backend.save_zone(&rr.zone).await, summary)?;
            }
        }

        info!("Adding record [{}] to zone [{}]", rr.to_rr(), rr.zone);
        let added = absorb(
            self.backend.add_record(&rr.zone, &rr.to_rr()).await,
            summary,
        )?;
        metrics::record_operation("add", added);
        if added {
            summary.records_added += 1;
            absorb(self.backend.save_zone(&rr.zone).await, summary)?;
        }

        Ok(())
    }

    /// Remove every record of the zone matching `key`
    async fn remove(
        &self,
        key: &DeletionKey,
        summary: &mut BatchSummary,
    ) -> Result<(), BackendError> {
        let zones = self.backend.list_zones().await?;
        if !zones.contains(&key.zone) {
            info!("Cannot remove records from non-existing zone [{}]", key.zone);
            return Ok(());
        }

        info!("Searching in zone [{}] ...", key.zone);
        let records = self.backend.list_records(&key.zone).await?;

        for record in deletion_order(key.select(&records).collect()) {
            info!("Removing [{}] ...", record.describe(&key.zone));
            let deleted = absorb(
                self.backend.delete_record(&key.zone, &record.index).await,
                summary,
            )?;
            metrics::record_operation("remove", deleted);
            if deleted {
                summary.records_removed += 1;
                absorb(self.backend.save_zone(&key.zone).await, summary)?;
            }
        }

        Ok(())
    }
}

/// Order matches highest index first so a deletion never shifts the index
/// of a record still waiting to be deleted
fn deletion_order(mut records: Vec<&BackendRecord>) -> Vec<&BackendRecord> {
    records.sort_by_key(|r| Reverse(r.index.parse::<u64>().ok()));
    records
}

/// Log and count a recoverable backend error, propagate the rest
///
/// Returns whether the operation succeeded.
fn absorb(
    result: Result<(), BackendError>,
    summary: &mut BatchSummary,
) -> Result<bool, BackendError> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_recoverable() => {
            error!("{}", e);
            summary.backend_errors += 1;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
