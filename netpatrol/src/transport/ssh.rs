//! SSH transport implementation using russh.
//!
//! Opens one PTY shell per device and drives it like an operator would:
//! send a line, collect output until the platform prompt settles, strip
//! the echo and the prompt. Network gear does not speak `exec` channels
//! reliably, so everything goes through the interactive shell.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use regex::bytes::Regex;
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::{Channel, ChannelMsg};

use super::buffer::PromptBuffer;
use super::{Endpoint, RemoteSession, Transport, TransportConfig};
use crate::error::TransportError;
use crate::platform::Elevation;

/// SSH transport wrapping the russh client.
#[derive(Debug, Clone, Default)]
pub struct SshTransport {
    config: TransportConfig,
}

impl SshTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

impl Transport for SshTransport {
    type Session = SshSession;

    async fn open(&self, endpoint: Endpoint<'_>) -> Result<SshSession, TransportError> {
        let mut ssh_config = client::Config {
            inactivity_timeout: Some(self.config.command_timeout),
            ..Default::default()
        };
        if self.config.legacy_algorithms {
            // Switches in the field often run SSH stacks that never
            // learned the modern defaults; offer the old ones too.
            ssh_config.preferred.kex = Cow::Owned(vec![
                russh::kex::CURVE25519,
                russh::kex::CURVE25519_PRE_RFC_8731,
                russh::kex::DH_G14_SHA256,
                russh::kex::DH_G14_SHA1,
                russh::kex::DH_G1_SHA1,
                russh::kex::DH_GEX_SHA256,
                russh::kex::DH_GEX_SHA1,
            ]);
            ssh_config.preferred.cipher = Cow::Owned(vec![
                russh::cipher::AES_256_CTR,
                russh::cipher::AES_128_CTR,
                russh::cipher::AES_256_CBC,
                russh::cipher::AES_192_CBC,
                russh::cipher::AES_128_CBC,
            ]);
        }

        let profile = endpoint.kind.profile();
        let prompt = Regex::new(profile.prompt)?;

        debug!("Connecting to {}:{}", endpoint.host, endpoint.port);
        let mut handle = tokio::time::timeout(
            self.config.connect_timeout,
            client::connect(
                Arc::new(ssh_config),
                (endpoint.host, endpoint.port),
                AcceptingHandler,
            ),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.config.connect_timeout))??;

        let authenticated = handle
            .authenticate_password(endpoint.username, endpoint.password)
            .await?
            .success();
        if !authenticated {
            return Err(TransportError::AuthenticationFailed {
                user: endpoint.username.to_string(),
            });
        }
        debug!("Authenticated on {} as {}", endpoint.host, endpoint.username);

        let channel = handle.channel_open_session().await?;
        channel
            .request_pty(
                true,
                "xterm",
                self.config.terminal_width,
                self.config.terminal_height,
                0,
                0,
                &[],
            )
            .await?;
        channel.request_shell(true).await?;

        let mut session = SshSession {
            handle,
            channel,
            prompt,
            buffer: PromptBuffer::new(),
            command_timeout: self.config.command_timeout,
        };

        // Swallow the login banner up to the first prompt.
        session.read_until_prompt(None).await?;

        for command in profile.pagination_off {
            trace!("Pagination setup on {}: {command}", endpoint.host);
            session.execute(command).await?;
        }

        if let (Some(elevation), Some(secret)) = (profile.elevation, endpoint.secret) {
            session
                .elevate(&elevation, secret, endpoint.username)
                .await?;
            debug!("Privileged mode entered on {}", endpoint.host);
        }

        Ok(session)
    }
}

/// Accepts any server host key.
// TODO: optional known_hosts verification in the style of OpenSSH accept-new
struct AcceptingHandler;

impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// An authenticated PTY shell on one device.
pub struct SshSession {
    handle: Handle<AcceptingHandler>,
    channel: Channel<Msg>,

    /// Prompt pattern of the device's platform.
    prompt: Regex,

    /// Accumulated channel output, consumed prompt by prompt.
    buffer: PromptBuffer,

    command_timeout: Duration,
}

impl SshSession {
    /// Read channel output until the platform prompt appears, or until
    /// `alt` matches first.
    ///
    /// Returns the accumulated text and whether `alt` ended the wait.
    async fn read_until_prompt(
        &mut self,
        alt: Option<&Regex>,
    ) -> Result<(String, bool), TransportError> {
        let waited = tokio::time::timeout(self.command_timeout, async {
            loop {
                if self.buffer.tail_contains(&self.prompt) {
                    return Ok((self.buffer.take_text(), false));
                }
                if let Some(alt) = alt {
                    if self.buffer.tail_contains(alt) {
                        return Ok((self.buffer.take_text(), true));
                    }
                }
                self.read_chunk().await?;
            }
        })
        .await;

        match waited {
            Ok(result) => result,
            Err(_) => Err(TransportError::PromptTimeout(self.command_timeout)),
        }
    }

    /// Pull the next channel message into the buffer.
    async fn read_chunk(&mut self) -> Result<(), TransportError> {
        match self.channel.wait().await {
            Some(ChannelMsg::Data { data }) => self.buffer.extend(&data),
            Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
            Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                return Err(TransportError::ChannelClosed);
            }
            Some(_) => {}
        }
        Ok(())
    }

    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        let data = format!("{line}\n");
        self.channel.data(data.as_bytes()).await?;
        Ok(())
    }

    /// Enter the platform's privileged mode.
    ///
    /// The device answering with a second secret prompt after the secret
    /// was sent means it rejected the secret.
    async fn elevate(
        &mut self,
        elevation: &Elevation,
        secret: &str,
        user: &str,
    ) -> Result<(), TransportError> {
        let secret_prompt = Regex::new(elevation.prompt)?;

        self.buffer.clear();
        self.send_line(elevation.command).await?;
        let (_, asked) = self.read_until_prompt(Some(&secret_prompt)).await?;
        if !asked {
            // Went straight back to a prompt: already privileged.
            return Ok(());
        }

        self.buffer.clear();
        self.send_line(secret).await?;
        let (_, asked_again) = self.read_until_prompt(Some(&secret_prompt)).await?;
        if asked_again {
            return Err(TransportError::AuthenticationFailed {
                user: user.to_string(),
            });
        }

        Ok(())
    }
}

impl RemoteSession for SshSession {
    async fn execute(&mut self, command: &str) -> Result<String, TransportError> {
        trace!("Sending {command:?}");
        self.buffer.clear();
        self.send_line(command).await?;
        let (raw, _) = self.read_until_prompt(None).await?;
        Ok(clean_output(&raw, command, &self.prompt))
    }

    async fn close(mut self) -> Result<(), TransportError> {
        let _ = self.channel.eof().await;
        let _ = self.channel.close().await;
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}

/// Strip the echoed command line and the trailing prompt from raw output.
fn clean_output(raw: &str, command: &str, prompt: &Regex) -> String {
    let text = raw.replace('\r', "");
    let mut body = text.as_str();

    if let Some(pos) = body.find('\n') {
        if body[..pos].contains(command) {
            body = &body[pos + 1..];
        }
    }

    if let Some(found) = prompt.find_iter(body.as_bytes()).last() {
        body = &body[..found.start()];
    }

    body.trim().to_string()
}
