//! Command execution over an open device session.
//!
//! [`DeviceSession`] drives one device through its command list in
//! strict order. The first command that fails stops the run, and the
//! output gathered up to that point is kept, so a report can show how
//! far a device got before its session died.

use log::debug;

use crate::error::{SessionError, TransportError};
use crate::transport::RemoteSession;

/// Output of one completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The command as it was sent.
    pub command: String,
    /// Cleaned output the device returned.
    pub output: String,
}

/// What a command run produced.
///
/// `outputs` holds every command that completed before `error`, if any,
/// stopped the run.
#[derive(Debug)]
pub struct CommandRun {
    /// Completed commands, in execution order.
    pub outputs: Vec<CommandOutput>,
    /// The failure that ended the run early, when there was one.
    pub error: Option<SessionError>,
}

/// Runs a command list over an open session.
pub struct DeviceSession<S> {
    remote: S,
}

impl<S: RemoteSession> DeviceSession<S> {
    pub fn new(remote: S) -> Self {
        Self { remote }
    }

    /// Execute `commands` in order, stopping at the first failure.
    ///
    /// Never touches the session again after a failure; whatever the
    /// earlier commands produced is returned alongside the error.
    pub async fn run(&mut self, commands: &[String]) -> CommandRun {
        let mut outputs = Vec::with_capacity(commands.len());

        for (index, command) in commands.iter().enumerate() {
            debug!("Command {}/{}: {command}", index + 1, commands.len());
            match self.remote.execute(command).await {
                Ok(output) => outputs.push(CommandOutput {
                    command: command.clone(),
                    output,
                }),
                Err(source) => {
                    return CommandRun {
                        outputs,
                        error: Some(SessionError {
                            command: command.clone(),
                            source,
                        }),
                    };
                }
            }
        }

        CommandRun {
            outputs,
            error: None,
        }
    }

    /// Tear the underlying session down.
    pub async fn close(self) -> Result<(), TransportError> {
        self.remote.close().await
    }
}
