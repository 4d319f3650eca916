//! Credential fallback for device login.

use log::{debug, warn};
use secrecy::ExposeSecret;

use crate::config::DeviceRecord;
use crate::error::{ConnectionError, TransportError};
use crate::inspect::CredentialUsed;
use crate::transport::{Endpoint, Transport};

/// Open a session on `device`, falling back to the backup password when
/// the primary is rejected.
///
/// At most two attempts are ever made: the primary password, then the
/// backup if the record has one. Only an authentication failure moves on
/// to the backup; a host that cannot be reached is reported as
/// unreachable right away, without burning the second attempt.
pub(crate) async fn negotiate<T: Transport>(
    transport: &T,
    device: &DeviceRecord,
) -> Result<(T::Session, CredentialUsed), ConnectionError> {
    let secret = device
        .secret
        .as_ref()
        .filter(|_| device.kind.requires_secret())
        .map(|s| s.expose_secret());

    let rejection = match try_open(transport, device, device.password.expose_secret(), secret).await
    {
        Ok(session) => {
            debug!("{}: logged in with the primary password", device.host);
            return Ok((session, CredentialUsed::Primary));
        }
        Err(source) if source.is_authentication() => source,
        Err(source) => {
            return Err(ConnectionError::Unreachable {
                host: device.host.clone(),
                source,
            });
        }
    };

    let Some(backup) = &device.backup_password else {
        return Err(ConnectionError::CredentialsRejected {
            host: device.host.clone(),
            source: rejection,
        });
    };

    warn!("{}: primary password rejected, trying backup", device.host);
    match try_open(transport, device, backup.expose_secret(), secret).await {
        Ok(session) => {
            debug!("{}: logged in with the backup password", device.host);
            Ok((session, CredentialUsed::Backup))
        }
        Err(source) if source.is_authentication() => Err(ConnectionError::CredentialsRejected {
            host: device.host.clone(),
            source,
        }),
        Err(source) => Err(ConnectionError::Unreachable {
            host: device.host.clone(),
            source,
        }),
    }
}

async fn try_open<T: Transport>(
    transport: &T,
    device: &DeviceRecord,
    password: &str,
    secret: Option<&str>,
) -> Result<T::Session, TransportError> {
    transport
        .open(Endpoint {
            host: &device.host,
            port: device.port,
            username: &device.username,
            password,
            kind: device.kind,
            secret,
        })
        .await
}
