//! # Netpatrol
//!
//! Multi-vendor network fleet inspection over SSH.
//!
//! Netpatrol reads a fleet config, logs in to every device in turn,
//! runs each device's diagnostic command list and writes one flat text
//! report for the whole run. It fills the niche of the nightly "log in
//! everywhere and save `show version`" cron script, with real error
//! handling.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, with legacy algorithm support for
//!   older switches
//! - Cisco IOS/IOS-XE/NX-OS, Huawei VRP, H3C Comware and Juniper JUNOS
//!   platform profiles
//! - Backup password fallback when the primary is rejected
//! - Per-device failure isolation: one dead switch never aborts the run
//! - JSON and line-oriented fleet config formats
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use netpatrol::{Inspector, Report, SshTransport, TransportConfig};
//!
//! #[tokio::main]
//! async fn main() -> netpatrol::Result<()> {
//!     let devices = netpatrol::config::load_devices(Path::new("devices.json"), None)?;
//!
//!     let transport = SshTransport::new(TransportConfig::default());
//!     let results = Inspector::new(transport).run(devices).await;
//!
//!     let written = Report::new(results).write_to(None)?;
//!     println!("Report written to {}", written.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod inspect;
pub mod platform;
pub mod report;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use config::{CommandTable, DeviceRecord};
pub use error::{Error, Result};
pub use inspect::{CredentialUsed, InspectionResult, Inspector, Status};
pub use platform::DeviceKind;
pub use report::Report;
pub use session::CommandOutput;
pub use transport::{SshTransport, Transport, TransportConfig};

// Credential fields on [`DeviceRecord`] use this type; re-exported so
// callers building records by hand do not need secrecy directly.
pub use secrecy::SecretString;
