// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common types and errors used throughout the mmbatch library

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the mmcmd backend
///
/// Only [`BackendError::Rejected`] is recoverable: the backend answered, but
/// with an error message. Every other variant means the subprocess itself
/// misbehaved and the batch run is aborted.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to start mmcmd at {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("mmcmd command '{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("mmcmd command '{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("mmcmd command '{command}' returned non UTF-8 output")]
    InvalidOutput { command: String },

    #[error("Error from mmcmd: {message}")]
    Rejected { command: String, message: String },

    #[error("No master server configured, cannot create zone {0}")]
    NoMasterServer(String),
}

impl BackendError {
    /// Whether the batch run can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BackendError::Rejected { .. } | BackendError::NoMasterServer(_)
        )
    }
}

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to open control file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Aborted at line {line} of {path}")]
    Aborted {
        path: String,
        line: usize,
        #[source]
        source: Box<BatchError>,
    },
}

/// Name qualification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Zone name cannot be empty")]
    EmptyZone,

    #[error("Owner name cannot be empty")]
    EmptyOwner,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No mmcmd password configured (set MMCMD_PASSWORD or 'password' in the config file)")]
    MissingPassword,

    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Why a control-file line was not turned into a backend operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or whitespace-only line
    Blank,
    /// Fewer than the two fields every operation needs
    TooFewFields { got: usize },
    /// Three fields in remove mode: neither owner-only nor owner+type+data
    AmbiguousRemoval,
    /// Fewer than four fields in add mode
    NotEnoughForAddition { expected: usize, got: usize },
    /// Zone or owner could not be qualified
    InvalidName(NameError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blank => write!(f, "blank line"),
            SkipReason::TooFewFields { got } => {
                write!(f, "too few fields (expected at least 2, got {})", got)
            }
            SkipReason::AmbiguousRemoval => write!(
                f,
                "3 fields for record removal (expected 2, or 4 and more)"
            ),
            SkipReason::NotEnoughForAddition { expected, got } => write!(
                f,
                "not enough fields for record addition (expected {}, got {})",
                expected, got
            ),
            SkipReason::InvalidName(e) => write!(f, "{}", e),
        }
    }
}
