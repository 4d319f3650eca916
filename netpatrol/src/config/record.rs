//! Canonical device model and command tables.

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

use crate::platform::DeviceKind;

/// Default SSH port when a device entry does not specify one.
const DEFAULT_PORT: u16 = 22;

/// One inspection target, fully resolved by normalization.
///
/// Immutable once built: downstream components read it, none mutate it.
/// Credentials are wrapped in [`SecretString`] so a `Debug` dump of a
/// record (or of anything holding one) never prints them.
#[derive(Debug)]
pub struct DeviceRecord {
    /// Address the transport dials.
    pub host: String,

    /// Vendor profile for this device.
    pub kind: DeviceKind,

    /// Login user.
    pub username: String,

    /// Primary login password.
    pub password: SecretString,

    /// Second password, tried once when the primary is rejected.
    pub backup_password: Option<SecretString>,

    /// Privileged-mode secret, consumed when the vendor profile elevates.
    pub secret: Option<SecretString>,

    /// SSH port, 22 unless overridden.
    pub port: u16,

    /// Commands to run, already resolved (own, then table, then empty).
    pub commands: Vec<String>,

    /// Name shown in the report; falls back to `host`.
    pub label: String,
}

/// Device entry as written in a config source, before resolution.
///
/// Shared by the JSON and line-oriented shapes; the line parser fills it
/// by hand. Credentials stay plain here only for the moment between
/// deserialization and [`RawDevice::into_record`].
#[derive(Debug, Deserialize)]
pub(crate) struct RawDevice {
    pub(crate) host: String,
    pub(crate) device_type: DeviceKind,
    pub(crate) username: String,
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) backup_password: Option<String>,
    #[serde(default)]
    pub(crate) secret: Option<String>,
    #[serde(default)]
    pub(crate) port: Option<u16>,
    #[serde(default)]
    pub(crate) commands: Option<Vec<String>>,
    #[serde(default, alias = "hostname_label")]
    pub(crate) hostname: Option<String>,
}

impl RawDevice {
    /// First required field that is present but empty, if any.
    pub(crate) fn empty_field(&self) -> Option<&'static str> {
        if self.host.trim().is_empty() {
            return Some("host");
        }
        if self.username.trim().is_empty() {
            return Some("username");
        }
        if self.password.is_empty() {
            return Some("password");
        }
        None
    }

    /// Resolve into the canonical record, filling `commands` from `table`
    /// when the entry carries none of its own.
    pub(crate) fn into_record(self, table: Option<&CommandTable>) -> DeviceRecord {
        let commands = match self.commands {
            Some(commands) => commands,
            None => table
                .and_then(|t| t.get(self.device_type))
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        };
        let label = self.hostname.unwrap_or_else(|| self.host.clone());
        DeviceRecord {
            host: self.host,
            kind: self.device_type,
            username: self.username,
            password: SecretString::from(self.password),
            backup_password: self.backup_password.map(SecretString::from),
            secret: self.secret.map(SecretString::from),
            port: self.port.unwrap_or(DEFAULT_PORT),
            commands,
            label,
        }
    }
}

/// Ordered mapping from device kind to the commands run on it.
///
/// Used only during normalization, to fill in commands for devices that
/// do not specify their own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CommandTable {
    map: IndexMap<DeviceKind, Vec<String>>,
}

impl CommandTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock diagnostic set for every supported vendor.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for kind in DeviceKind::ALL {
            table.insert(
                kind,
                kind.default_commands().iter().map(|c| (*c).to_string()).collect(),
            );
        }
        table
    }

    /// Register the command list for a kind, replacing any previous list.
    pub fn insert(&mut self, kind: DeviceKind, commands: Vec<String>) {
        self.map.insert(kind, commands);
    }

    /// Commands registered for a kind.
    pub fn get(&self, kind: DeviceKind) -> Option<&[String]> {
        self.map.get(&kind).map(Vec::as_slice)
    }

    /// Copy entries from `fallback` for kinds this table does not define.
    pub fn merge_missing(&mut self, fallback: &CommandTable) {
        for (kind, commands) in &fallback.map {
            if !self.map.contains_key(kind) {
                self.map.insert(*kind, commands.clone());
            }
        }
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of kinds with a registered list.
    pub fn len(&self) -> usize {
        self.map.len()
    }
}
