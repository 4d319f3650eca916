//! Per-device inspection outcomes.

use std::fmt;

use crate::config::DeviceRecord;
use crate::session::CommandOutput;

/// Whether a device inspection completed its full command list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which password the device ended up accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialUsed {
    /// The record's primary password.
    Primary,
    /// The backup password, after the primary was rejected.
    Backup,
    /// No password was accepted, or the device was never reached.
    None,
}

impl CredentialUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialUsed::Primary => "primary",
            CredentialUsed::Backup => "backup",
            CredentialUsed::None => "none",
        }
    }

    /// The label the report prints for this credential.
    pub fn report_label(&self) -> &'static str {
        match self {
            CredentialUsed::Primary => "主密码",
            CredentialUsed::Backup => "备用密码",
            CredentialUsed::None => "未成功登录",
        }
    }
}

impl fmt::Display for CredentialUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything recorded about one device's inspection.
///
/// Owns the device record it describes; the inspector hands records over
/// as it finishes with them.
#[derive(Debug)]
pub struct InspectionResult {
    /// The inspected device.
    pub device: DeviceRecord,

    /// Overall outcome.
    pub status: Status,

    /// Which credential got us in.
    pub credential_used: CredentialUsed,

    /// Output of every command that completed, in execution order.
    ///
    /// A failed inspection keeps the outputs gathered before the
    /// failure, so this is not empty just because `status` is
    /// [`Status::Failed`].
    pub command_outputs: Vec<CommandOutput>,

    /// What went wrong, for failed inspections.
    pub error_message: Option<String>,
}

impl InspectionResult {
    pub fn success(
        device: DeviceRecord,
        credential_used: CredentialUsed,
        command_outputs: Vec<CommandOutput>,
    ) -> Self {
        Self {
            device,
            status: Status::Success,
            credential_used,
            command_outputs,
            error_message: None,
        }
    }

    pub fn failure(
        device: DeviceRecord,
        credential_used: CredentialUsed,
        command_outputs: Vec<CommandOutput>,
        error_message: String,
    ) -> Self {
        Self {
            device,
            status: Status::Failed,
            credential_used,
            command_outputs,
            error_message: Some(error_message),
        }
    }
}
