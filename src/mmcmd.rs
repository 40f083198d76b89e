// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! mmcmd command execution
//!
//! This module drives the Men & Mice `mmcmd` command-line client. Every
//! command runs in its own mmcmd process:
//!
//! ```text
//! mmcmd -q -s<server> -u<user> -p<password> "<command>; quit;"
//! ```
//!
//! Mutating commands (`add`, `del`, `addzone`, `save`) print nothing on
//! success; any output is an error message from the server.

use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::MmcmdConfig;
use crate::metrics;
use crate::mmcmd_parser;
use crate::records::BackendRecord;
use crate::types::BackendError;

/// Typed operations against the DNS management backend
#[async_trait]
pub trait MmBackend {
    /// Names of all zones known to the server
    async fn list_zones(&self) -> Result<Vec<String>, BackendError>;

    /// All records of a zone with their backend-assigned indexes
    async fn list_records(&self, zone: &str) -> Result<Vec<BackendRecord>, BackendError>;

    /// Append a record ("<owner> <type> <data>") to the end of a zone
    async fn add_record(&self, zone: &str, rr: &str) -> Result<(), BackendError>;

    /// Delete the record at `index`
    async fn delete_record(&self, zone: &str, index: &str) -> Result<(), BackendError>;

    /// Create a master zone served by the configured master server
    async fn create_zone(&self, zone: &str) -> Result<(), BackendError>;

    /// Persist pending changes of a zone
    async fn save_zone(&self, zone: &str) -> Result<(), BackendError>;
}

/// Destination for echoed mmcmd commands
pub type EchoWriter = Arc<Mutex<dyn Write + Send>>;

/// mmcmd command executor
#[derive(Clone)]
pub struct MmcmdExecutor {
    config: MmcmdConfig,
    /// Receives every outgoing command, never the credentials
    echo: Option<EchoWriter>,
}

impl MmcmdExecutor {
    /// Create a new mmcmd executor
    ///
    /// # Arguments
    /// * `config` - Connection settings
    /// * `echo_commands` - Print each command on stdout before running it
    pub fn new(config: MmcmdConfig, echo_commands: bool) -> Self {
        info!(
            "Creating mmcmd executor for {} as {} (timeout {}s)",
            config.server,
            config.user,
            config.timeout.as_secs()
        );
        let echo = echo_commands.then(|| Arc::new(Mutex::new(std::io::stdout())) as EchoWriter);
        Self { config, echo }
    }

    /// Echo commands to `writer` instead of stdout
    pub fn with_echo_writer(mut self, writer: EchoWriter) -> Self {
        self.echo = Some(writer);
        self
    }

    fn echo(&self, command: &str) {
        let Some(writer) = &self.echo else {
            return;
        };
        let mut w = writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(w, "mmcmd {}", command) {
            warn!("Failed to echo mmcmd command: {}", e);
        }
    }

    /// Arguments for one mmcmd invocation, the password included
    pub(crate) fn args(&self, command: &str) -> Vec<String> {
        vec![
            "-q".to_string(),
            format!("-s{}", self.config.server),
            format!("-u{}", self.config.user),
            format!("-p{}", self.config.password),
            format!("{}; quit;", command),
        ]
    }

    /// Execute an mmcmd command
    ///
    /// # Returns
    /// The stdout output with trailing newlines removed
    ///
    /// # Errors
    /// Returns an error if mmcmd cannot be started, exits unsuccessfully,
    /// prints invalid UTF-8, or runs longer than the configured timeout
    pub async fn execute(&self, command: &str) -> Result<String, BackendError> {
        self.echo(command);
        debug!("Executing mmcmd command: {}", command);

        let start = Instant::now();

        let mut cmd = Command::new(&self.config.mmcmd_path);
        cmd.args(self.args(command)).kill_on_drop(true);

        let output = match tokio::time::timeout(self.config.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                metrics::record_mmcmd_command(command, false, start.elapsed().as_secs_f64());
                return Err(BackendError::Spawn {
                    path: self.config.mmcmd_path.clone(),
                    source,
                });
            }
            Err(_) => {
                error!("mmcmd command timed out: {}", command);
                metrics::record_mmcmd_command(command, false, start.elapsed().as_secs_f64());
                return Err(BackendError::Timeout {
                    command: command.to_string(),
                    timeout: self.config.timeout,
                });
            }
        };

        let duration = start.elapsed().as_secs_f64();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("mmcmd command failed: {}", stderr);
            metrics::record_mmcmd_command(command, false, duration);
            return Err(BackendError::Failed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        metrics::record_mmcmd_command(command, true, duration);

        let stdout = String::from_utf8(output.stdout).map_err(|_| BackendError::InvalidOutput {
            command: command.to_string(),
        })?;
        debug!("mmcmd completed in {:.3}s", duration);

        Ok(stdout.trim_end_matches('\n').to_string())
    }

    /// Run a command that prints nothing on success
    async fn mutate(&self, command: String) -> Result<(), BackendError> {
        let reply = self.execute(&command).await?;
        if reply.is_empty() {
            Ok(())
        } else {
            Err(BackendError::Rejected {
                command,
                message: reply,
            })
        }
    }
}

#[async_trait]
impl MmBackend for MmcmdExecutor {
    async fn list_zones(&self) -> Result<Vec<String>, BackendError> {
        let reply = self.execute("zones").await?;
        Ok(mmcmd_parser::parse_zone_list(&reply))
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<BackendRecord>, BackendError> {
        let reply = self.execute(&format!("print -l {}", zone)).await?;
        Ok(mmcmd_parser::parse_record_list(&reply))
    }

    async fn add_record(&self, zone: &str, rr: &str) -> Result<(), BackendError> {
        // -1 appends after the last record
        self.mutate(format!("add {} -1 {}", zone, rr)).await
    }

    async fn delete_record(&self, zone: &str, index: &str) -> Result<(), BackendError> {
        self.mutate(format!("del {} {}", zone, index)).await
    }

    async fn create_zone(&self, zone: &str) -> Result<(), BackendError> {
        let master = self
            .config
            .master_server
            .as_deref()
            .ok_or_else(|| BackendError::NoMasterServer(zone.to_string()))?;
        self.mutate(format!("addzone {} {} *", zone, master)).await
    }

    async fn save_zone(&self, zone: &str) -> Result<(), BackendError> {
        self.mutate(format!("save {}", zone)).await
    }
}
