//! Device transport abstraction.
//!
//! A [`Transport`] dials a device and yields a [`RemoteSession`] on
//! which commands can be executed. The production implementation is
//! [`SshTransport`]; tests swap in a scripted fake so credential and
//! session logic can be exercised without a live device.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;
use crate::platform::DeviceKind;

mod buffer;
mod ssh;

#[cfg(test)]
pub(crate) mod fake;

pub use ssh::{SshSession, SshTransport};

/// Connection target plus everything needed to log in.
///
/// Borrowed from a device record for the duration of one attempt, so a
/// retry with different credentials is a fresh `Endpoint`, not mutation.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    /// Hostname or IP address to dial.
    pub host: &'a str,
    /// SSH port.
    pub port: u16,
    /// Login user.
    pub username: &'a str,
    /// Password for this attempt.
    pub password: &'a str,
    /// Vendor platform, selects prompt pattern and session setup.
    pub kind: DeviceKind,
    /// Privilege elevation secret, when the platform asks for one.
    pub secret: Option<&'a str>,
}

impl fmt::Debug for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("kind", &self.kind)
            .field("secret", &self.secret.map(|_| "<redacted>"))
            .finish()
    }
}

/// Tunables for connecting and talking to devices.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect plus SSH handshake deadline.
    pub connect_timeout: Duration,
    /// How long to wait for the prompt after sending a command.
    pub command_timeout: Duration,
    /// Requested PTY width. Wide enough that devices do not wrap output.
    pub terminal_width: u32,
    /// Requested PTY height.
    pub terminal_height: u32,
    /// Offer legacy key exchange and ciphers for older devices.
    pub legacy_algorithms: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            command_timeout: Duration::from_secs(30),
            terminal_width: 511,
            terminal_height: 24,
            legacy_algorithms: true,
        }
    }
}

/// Opens sessions to devices.
pub trait Transport: Send + Sync {
    /// Session type produced by a successful [`open`](Transport::open).
    type Session: RemoteSession;

    /// Connect and authenticate against `endpoint`.
    ///
    /// The returned session is ready for commands: the login banner has
    /// been consumed, pagination disabled and privilege elevated where
    /// the platform calls for it.
    fn open(
        &self,
        endpoint: Endpoint<'_>,
    ) -> impl Future<Output = Result<Self::Session, TransportError>> + Send;
}

/// An open, authenticated session on one device.
pub trait RemoteSession: Send {
    /// Run one command and return its output with echo and prompt removed.
    fn execute(
        &mut self,
        command: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Tear the session down, consuming it.
    fn close(self) -> impl Future<Output = Result<(), TransportError>> + Send;
}
