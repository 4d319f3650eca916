//! Error types for netpatrol.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for netpatrol operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading/normalization errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport-level errors (SSH connection, channel)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Connection/authentication negotiation errors
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Mid-run command execution errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Report serialization errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Configuration errors. Always fatal: the run does not start.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config source could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config source is not valid JSON
    #[error("{}: invalid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON document is neither a device array nor a wrapped object
    #[error("{}: expected an array of devices or an object with a `devices` key", .path.display())]
    UnexpectedShape { path: PathBuf },

    /// A device entry failed to deserialize
    #[error("{}: device entry {index}: {source}", .path.display())]
    Device {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A required device field is present but empty
    #[error("{}: device entry {index}: `{field}` must not be empty", .path.display())]
    EmptyField {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    /// A line-oriented entry has too few fields
    #[error(
        "{}:{line}: expected `username host password backup_password device_type`, found {found} fields",
        .path.display()
    )]
    Line {
        path: PathBuf,
        line: usize,
        found: usize,
    },

    /// Text after the leading fields that is not a double-quoted command
    #[error("{}:{line}: trailing text outside double-quoted commands", .path.display())]
    LineTrailing { path: PathBuf, line: usize },

    /// Device type is not one of the supported vendor profiles
    #[error("{}:{line}: unknown device type '{name}'", .path.display())]
    UnknownDeviceType {
        path: PathBuf,
        line: usize,
        name: String,
    },
}

/// Transport layer errors (SSH connection, authentication, channel I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Channel closed by the remote side mid-operation
    #[error("Channel closed by peer")]
    ChannelClosed,

    /// No prompt matched in the read buffer before the deadline
    #[error("No prompt matched within {0:?}")]
    PromptTimeout(Duration),

    /// Invalid prompt regex in a vendor profile
    #[error("Invalid prompt pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Connect attempt timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    /// Whether this failure means the credential was rejected, as opposed
    /// to the host being unreachable or the channel dying.
    ///
    /// The credential negotiator only spends the backup password on
    /// authentication failures; a down host fails the same way twice.
    pub fn is_authentication(&self) -> bool {
        matches!(self, TransportError::AuthenticationFailed { .. })
    }
}

/// Connection negotiation errors. Recorded per device, never fatal to a run.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Every available credential was rejected
    #[error("All credentials rejected by {host}: {source}")]
    CredentialsRejected {
        host: String,
        #[source]
        source: TransportError,
    },

    /// Host could not be reached at all
    #[error("{host} unreachable: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: TransportError,
    },
}

/// A command failed mid-run. Recorded per device alongside the output
/// captured before the failure; never fatal to a run.
#[derive(Error, Debug)]
#[error("Command {command:?} failed: {source}")]
pub struct SessionError {
    /// The command that was executing when the session broke
    pub command: String,
    #[source]
    pub source: TransportError,
}

/// Report output errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report file could not be written
    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using netpatrol's Error.
pub type Result<T> = std::result::Result<T, Error>;
