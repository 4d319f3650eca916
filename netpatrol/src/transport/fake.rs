//! Scripted in-memory transport for tests.
//!
//! Hosts are declared up front with the passwords they accept and the
//! point at which their session drops. Connection attempts and session
//! closes are recorded so tests can assert on credential order and
//! teardown.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Endpoint, RemoteSession, Transport};
use crate::error::TransportError;

/// One recorded connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attempt {
    pub(crate) host: String,
    pub(crate) password: String,
    pub(crate) secret: Option<String>,
}

/// Per-host behavior script.
#[derive(Debug, Clone, Default)]
pub(crate) struct HostScript {
    passwords: Vec<String>,
    unreachable: bool,
    fail_after: Option<usize>,
}

impl HostScript {
    /// Accept any of `passwords`, reject the rest.
    pub(crate) fn accepting(passwords: &[&str]) -> Self {
        Self {
            passwords: passwords.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Connecting to this host times out.
    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Drop the session after `count` successful commands.
    pub(crate) fn fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }
}

/// Transport whose devices are scripts instead of sockets.
///
/// Clones share the attempt log and close counter, so a test can hand
/// one clone to the code under test and assert through another.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    scripts: HashMap<String, HostScript>,
    attempts: Arc<Mutex<Vec<Attempt>>>,
    closed: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_host(mut self, host: &str, script: HostScript) -> Self {
        self.scripts.insert(host.to_string(), script);
        self
    }

    /// Every connection attempt made so far, in order.
    pub(crate) fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().unwrap().clone()
    }

    /// How many sessions have been closed.
    pub(crate) fn closed_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Transport for FakeTransport {
    type Session = FakeSession;

    async fn open(&self, endpoint: Endpoint<'_>) -> Result<FakeSession, TransportError> {
        self.attempts.lock().unwrap().push(Attempt {
            host: endpoint.host.to_string(),
            password: endpoint.password.to_string(),
            secret: endpoint.secret.map(str::to_string),
        });

        let script = self
            .scripts
            .get(endpoint.host)
            .filter(|script| !script.unreachable)
            .ok_or(TransportError::Timeout(Duration::from_secs(1)))?;

        if !script.passwords.iter().any(|p| p == endpoint.password) {
            return Err(TransportError::AuthenticationFailed {
                user: endpoint.username.to_string(),
            });
        }

        Ok(FakeSession {
            host: endpoint.host.to_string(),
            executed: 0,
            fail_after: script.fail_after,
            closed: self.closed.clone(),
        })
    }
}

/// Session handed out by [`FakeTransport`].
#[derive(Debug)]
pub(crate) struct FakeSession {
    host: String,
    executed: usize,
    fail_after: Option<usize>,
    closed: Arc<AtomicUsize>,
}

impl RemoteSession for FakeSession {
    async fn execute(&mut self, command: &str) -> Result<String, TransportError> {
        if self.fail_after.is_some_and(|limit| self.executed >= limit) {
            return Err(TransportError::ChannelClosed);
        }
        self.executed += 1;
        Ok(format!("{command} output from {}", self.host))
    }

    async fn close(self) -> Result<(), TransportError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
