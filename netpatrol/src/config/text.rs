//! Line-oriented device config parsing.
//!
//! One device per line:
//!
//! ```text
//! # core switches
//! admin 10.0.0.1 pw1 pw2 cisco_ios "show version" "show arp"
//! admin 10.0.0.2 pw1 pw2 juniper
//! ```
//!
//! Five whitespace-separated fields (`username host password
//! backup_password device_type`) followed by zero or more double-quoted
//! commands. `#`-prefixed and blank lines are skipped. A line with no
//! quoted commands leaves the entry's commands unset, so a command table
//! can fill them in later.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::record::RawDevice;
use crate::error::ConfigError;
use crate::platform::DeviceKind;

/// Five plain fields, then whatever remains.
static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)(.*)$").unwrap());

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

pub(crate) fn parse(path: &Path, contents: &str) -> Result<Vec<RawDevice>, ConfigError> {
    let mut devices = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let number = idx + 1;

        let caps = LINE_RE.captures(line).ok_or_else(|| ConfigError::Line {
            path: path.to_path_buf(),
            line: number,
            found: line.split_whitespace().count(),
        })?;

        let type_name = &caps[5];
        let device_type =
            DeviceKind::from_name(type_name).ok_or_else(|| ConfigError::UnknownDeviceType {
                path: path.to_path_buf(),
                line: number,
                name: type_name.to_string(),
            })?;

        let rest = caps.get(6).map_or("", |m| m.as_str());
        let mut commands = Vec::new();
        let mut cursor = 0;
        for m in QUOTED_RE.find_iter(rest) {
            if !rest[cursor..m.start()].trim().is_empty() {
                return Err(ConfigError::LineTrailing {
                    path: path.to_path_buf(),
                    line: number,
                });
            }
            // Strip the surrounding quotes; they are single-byte ASCII.
            commands.push(rest[m.start() + 1..m.end() - 1].to_string());
            cursor = m.end();
        }
        if !rest[cursor..].trim().is_empty() {
            return Err(ConfigError::LineTrailing {
                path: path.to_path_buf(),
                line: number,
            });
        }

        devices.push(RawDevice {
            host: caps[2].to_string(),
            device_type,
            username: caps[1].to_string(),
            password: caps[3].to_string(),
            backup_password: Some(caps[4].to_string()),
            secret: None,
            port: None,
            commands: if commands.is_empty() { None } else { Some(commands) },
            hostname: None,
        });
    }
    Ok(devices)
}
