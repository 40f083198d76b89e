// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Men & Mice bulk record tool
//!
//! Adds the DNS records listed in a control file, or removes them with `-r`,
//! by running the `mmcmd` CLI against a Men & Mice central server.
//!
//! Connection settings come from `MMCMD_*` environment variables or the YAML
//! file named by `MMBATCH_CONFIG`.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use mmbatch::{metrics, BatchProcessor, MmcmdConfig, MmcmdExecutor, Mode};

/// Set to "json" for JSON log lines
const ENV_LOG_FORMAT: &str = "MMBATCH_LOG_FORMAT";

/// Path of a textfile collector file to write metrics to
const ENV_METRICS_FILE: &str = "MMBATCH_METRICS_FILE";

/// Bulk add or remove DNS resource records through mmcmd
///
/// Each line of FILE is "<zone> <owner> <type> <data...>". With -r, lines
/// may also be "<zone> <owner>" to remove every record of an owner.
#[derive(Parser, Debug)]
#[command(name = "mmbatch")]
#[command(author, version)]
struct Cli {
    /// Control file containing the records
    file: String,

    /// Remove records instead of adding them
    #[arg(short = 'r')]
    remove: bool,

    /// Print debug information, including every mmcmd command
    #[arg(short = 'd')]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr);

    if std::env::var(ENV_LOG_FORMAT).is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug);
    metrics::init_metrics();

    let config = MmcmdConfig::load().context("invalid mmcmd configuration")?;
    debug!("{:?}", config);

    let metrics_file = std::env::var(ENV_METRICS_FILE).ok().map(PathBuf::from);

    let mode = if cli.remove { Mode::Remove } else { Mode::Add };
    let processor = BatchProcessor::new(MmcmdExecutor::new(config, cli.debug), mode);

    processor
        .process_file(&cli.file, &mut std::io::stdout(), metrics_file.as_deref())
        .await?;

    Ok(())
}
