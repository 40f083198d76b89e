// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! mmbatch - bulk DNS record changes through the Men & Mice mmcmd CLI
//!
//! Reads a control file of DNS resource records and adds them to, or removes
//! them from, zones managed by a Men & Mice central server.
//!
//! # Control file
//!
//! One operation per line, fields separated by whitespace:
//!
//! ```text
//! 84.151.10.in-addr.arpa. 244
//! 84.151.10.in-addr.arpa. 244 PTR www.example.com.
//! example.com.  www  A 192.0.2.80
//! example.net.  @    mx 10 mail.example.com.
//! ```
//!
//! The first column is the zone, the second the owner name (`@` for the zone
//! apex). Additions need the record type and data as well. Removals take
//! either zone and owner, removing every record of that owner, or all four
//! columns, removing only records with that type and data.
//!
//! # Usage
//!
//! ## As a Library
//!
//! ```rust,no_run
//! use mmbatch::{BatchProcessor, ControlFileReader, MmcmdConfig, MmcmdExecutor, Mode};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let executor = MmcmdExecutor::new(MmcmdConfig::load()?, false);
//!     let processor = BatchProcessor::new(executor, Mode::Add);
//!
//!     let file = tokio::fs::File::open("records.txt").await?;
//!     let mut reader = ControlFileReader::new(tokio::io::BufReader::new(file));
//!     let summary = processor.run(&mut reader).await?;
//!     println!("added {} records", summary.records_added);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## As a Binary
//!
//! ```bash
//! MMCMD_PASSWORD=secret MMCMD_MASTER_SERVER=ns1.example.com mmbatch records.txt
//! MMCMD_PASSWORD=secret mmbatch -r removals.txt
//! ```

pub mod batch;
pub mod config;
pub mod control;
pub mod metrics;
pub mod mmcmd;
pub mod mmcmd_parser;
pub mod names;
pub mod records;
pub mod types;

// Batch driver
pub use batch::{BatchProcessor, BatchSummary};

// Configuration
pub use config::MmcmdConfig;

// Control file handling
pub use control::{control_file_path, ControlFileReader, ControlLine, LineOp, Mode};

// mmcmd backend
pub use mmcmd::{EchoWriter, MmBackend, MmcmdExecutor};

// Record types
pub use records::{AdditionRecord, BackendRecord, DeletionKey};

// Error types
pub use types::{BackendError, BatchError, ConfigError, NameError, SkipReason};

#[cfg(test)]
mod records_test;
