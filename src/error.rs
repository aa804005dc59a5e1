//! Error types for fleetctl
//!
//! Library code uses `crate::error::Result<T>` which returns `FleetctlError`.
//! The binary uses `anyhow::Result<T>` for top-level handling; the conversion
//! happens at the CLI boundary so error chains survive intact.
//!
//! ## Resolution errors
//!
//! `NotFound` and `NonUnique` are special: the resolvers in `src/resolve.rs`
//! produce them as *values* (`Resolution::NotFound` / `Resolution::NonUnique`)
//! when running in merge mode, and only convert them into these error variants
//! when a caller asked for strict, single-kind resolution. Transport and
//! engine failures are never folded into `NotFound`; they always propagate.

use thiserror::Error;

/// Main error type for fleetctl
#[derive(Error, Debug)]
pub enum FleetctlError {
    #[error("Cannot find any {kind} matching '{identifier}'")]
    NotFound { kind: String, identifier: String },

    #[error("Identifier '{identifier}' matches more than one {kind}, please use the long uuid")]
    NonUnique { kind: String, identifier: String },

    #[error("Platform API error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Authentication failed, check your credentials or run 'fleetctl login'")]
    Auth,

    #[error("Container engine not available: {0}")]
    EngineUnavailable(String),

    #[error("Container engine error: {0}")]
    Engine(String),

    #[error("Bad parameter: {0}")]
    BadParameter(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{failed} of {total} identifiers could not be processed")]
    Batch {
        failed: usize,
        total: usize,
        exit_code: i32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stack file error: {0}")]
    StackFile(#[from] serde_yaml::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not logged in, run 'fleetctl login' or set FLEETCTL_USER and FLEETCTL_APIKEY")]
    MissingCredentials,

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to write config: {0}")]
    Write(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FleetctlError>;

impl FleetctlError {
    pub fn not_found(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        FleetctlError::NotFound {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }

    pub fn non_unique(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        FleetctlError::NonUnique {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        FleetctlError::Transport {
            message: message.into(),
            source: None,
        }
    }
}
