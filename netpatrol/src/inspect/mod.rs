//! Sequential fleet inspection.
//!
//! The inspector walks the device list one host at a time: connect,
//! authenticate with backup fallback, run the command list, tear the
//! session down, record the result. A device failing never stops the
//! run; the failure becomes that device's result and the walk goes on.

mod negotiate;
mod outcome;

pub use outcome::{CredentialUsed, InspectionResult, Status};

use log::{debug, warn};

use crate::config::DeviceRecord;
use crate::session::DeviceSession;
use crate::transport::Transport;

/// Walks a device fleet and produces one [`InspectionResult`] per device.
pub struct Inspector<T> {
    transport: T,
}

impl<T: Transport> Inspector<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Inspect every device in `devices`, in order.
    ///
    /// Returns exactly one result per input record, in input order,
    /// no matter how many devices fail along the way.
    pub async fn run(&self, devices: Vec<DeviceRecord>) -> Vec<InspectionResult> {
        let total = devices.len();
        let mut results = Vec::with_capacity(total);

        for (index, device) in devices.into_iter().enumerate() {
            debug!("Device {}/{total}: {}", index + 1, device.label);
            results.push(self.inspect_device(device).await);
        }

        results
    }

    /// Take one device from connect to result.
    async fn inspect_device(&self, device: DeviceRecord) -> InspectionResult {
        debug!("{}: connecting", device.host);
        let (remote, credential) = match negotiate::negotiate(&self.transport, &device).await {
            Ok(opened) => opened,
            Err(error) => {
                warn!("{}: {error}", device.host);
                let message = error.to_string();
                return InspectionResult::failure(
                    device,
                    CredentialUsed::None,
                    Vec::new(),
                    message,
                );
            }
        };

        debug!(
            "{}: authenticated, executing {} commands",
            device.host,
            device.commands.len()
        );
        let mut session = DeviceSession::new(remote);
        let run = session.run(&device.commands).await;

        if let Err(error) = session.close().await {
            warn!("{}: teardown failed: {error}", device.host);
        }

        match run.error {
            None => {
                debug!("{}: done", device.host);
                InspectionResult::success(device, credential, run.outputs)
            }
            Some(error) => {
                warn!("{}: {error}", device.host);
                let message = error.to_string();
                InspectionResult::failure(device, credential, run.outputs, message)
            }
        }
    }
}
