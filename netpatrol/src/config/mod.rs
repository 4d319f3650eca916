//! Config loading and normalization.
//!
//! Three source shapes converge on one canonical model here: a device
//! list (JSON array, optionally wrapped in a `devices` key, or the
//! line-oriented text form), a command table (flat JSON map, or nested
//! under a `commands` key), and a mixed document carrying both.
//! Downstream code only ever sees [`DeviceRecord`]s with their command
//! list already resolved.

mod record;
mod text;

pub use record::{CommandTable, DeviceRecord};

use std::fs;
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::error::ConfigError;
use record::RawDevice;

/// Device config file used when the caller names no source.
pub const DEFAULT_DEVICES_PATH: &str = "devices.json";

/// Load device records from a device config file.
///
/// Content whose first non-whitespace byte is `[` or `{` is parsed as
/// JSON (a bare array of device objects, or an object with a `devices`
/// key); anything else is parsed as the line-oriented text form. Entries
/// that carry no commands of their own are resolved against `table`.
/// A `commands` key embedded in the document is ignored here; use
/// [`load_mixed`] for combined documents.
pub fn load_devices(
    path: &Path,
    table: Option<&CommandTable>,
) -> Result<Vec<DeviceRecord>, ConfigError> {
    let contents = read_source(path)?;
    let (raw, _) = parse_device_source(path, &contents)?;
    normalize(path, raw, table)
}

/// Load a command table from a command config file.
///
/// Accepts the flat `{"<device_type>": ["cmd", ...]}` mapping or the
/// same mapping nested under a `commands` key.
pub fn load_commands(path: &Path) -> Result<CommandTable, ConfigError> {
    let contents = read_source(path)?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let table_value = match value {
        Value::Object(mut obj) => match obj.remove("commands") {
            Some(inner) => inner,
            None => Value::Object(obj),
        },
        other => other,
    };
    serde_json::from_value(table_value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a mixed document carrying both a `devices` list and a `commands`
/// mapping.
///
/// The document's own table takes precedence; `fallback` fills in kinds
/// the document does not define.
pub fn load_mixed(
    path: &Path,
    fallback: Option<&CommandTable>,
) -> Result<Vec<DeviceRecord>, ConfigError> {
    let contents = read_source(path)?;
    let (raw, embedded) = parse_device_source(path, &contents)?;
    let table = match (embedded, fallback) {
        (Some(mut table), Some(fb)) => {
            table.merge_missing(fb);
            Some(table)
        }
        (Some(table), None) => Some(table),
        (None, Some(fb)) => Some(fb.clone()),
        (None, None) => None,
    };
    normalize(path, raw, table.as_ref())
}

fn read_source(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_device_source(
    path: &Path,
    contents: &str,
) -> Result<(Vec<RawDevice>, Option<CommandTable>), ConfigError> {
    match contents.trim_start().chars().next() {
        Some('[' | '{') => parse_json_devices(path, contents),
        _ => Ok((text::parse(path, contents)?, None)),
    }
}

fn parse_json_devices(
    path: &Path,
    contents: &str,
) -> Result<(Vec<RawDevice>, Option<CommandTable>), ConfigError> {
    let value: Value = serde_json::from_str(contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(entries) => Ok((devices_from_entries(path, entries)?, None)),
        Value::Object(mut obj) => {
            let Some(Value::Array(entries)) = obj.remove("devices") else {
                return Err(ConfigError::UnexpectedShape {
                    path: path.to_path_buf(),
                });
            };
            let table = match obj.remove("commands") {
                Some(commands) => {
                    Some(
                        serde_json::from_value(commands).map_err(|source| ConfigError::Json {
                            path: path.to_path_buf(),
                            source,
                        })?,
                    )
                }
                None => None,
            };
            Ok((devices_from_entries(path, entries)?, table))
        }
        _ => Err(ConfigError::UnexpectedShape {
            path: path.to_path_buf(),
        }),
    }
}

fn devices_from_entries(path: &Path, entries: Vec<Value>) -> Result<Vec<RawDevice>, ConfigError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|source| ConfigError::Device {
                path: path.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}

fn normalize(
    path: &Path,
    raw: Vec<RawDevice>,
    table: Option<&CommandTable>,
) -> Result<Vec<DeviceRecord>, ConfigError> {
    let mut records = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        if let Some(field) = entry.empty_field() {
            return Err(ConfigError::EmptyField {
                path: path.to_path_buf(),
                index,
                field,
            });
        }
        records.push(entry.into_record(table));
    }
    debug!(
        "normalized {} device record(s) from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}
