//! Flat-file inspection report.
//!
//! The report format is line-oriented and deliberately boring: one
//! header with the inspection time, then one block per device in fleet
//! order, separated by rules. Operators grep it, diff it against the
//! previous run, and attach it to tickets.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::ReportError;
use crate::inspect::InspectionResult;

/// Where the report goes when no path is given.
pub const DEFAULT_REPORT_PATH: &str = "inspection_results.txt";

const RULE_WIDTH: usize = 50;

/// Renders a finished inspection run into the flat report format.
pub struct Report {
    timestamp: DateTime<Local>,
    results: Vec<InspectionResult>,
}

impl Report {
    /// A report over `results`, stamped with the current local time.
    pub fn new(results: Vec<InspectionResult>) -> Self {
        Self::with_timestamp(Local::now(), results)
    }

    /// A report with an explicit timestamp.
    pub fn with_timestamp(timestamp: DateTime<Local>, results: Vec<InspectionResult>) -> Self {
        Self { timestamp, results }
    }

    /// The rendered report text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the report to `path`, or to [`DEFAULT_REPORT_PATH`] when
    /// none is given. Returns the path written.
    pub fn write_to(&self, path: Option<&Path>) -> Result<PathBuf, ReportError> {
        let path = path.unwrap_or(Path::new(DEFAULT_REPORT_PATH));
        fs::write(path, self.render()).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(path.to_path_buf())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "巡检时间: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;

        for result in &self.results {
            let device = &result.device;
            writeln!(f, "设备: {} ({})", device.label, device.kind)?;
            writeln!(f, "IP地址: {}", device.host)?;
            writeln!(f, "状态: {}", result.status)?;
            writeln!(f, "登录密码: {}", result.credential_used.report_label())?;
            if let Some(message) = &result.error_message {
                writeln!(f, "错误: {message}")?;
            }
            writeln!(f, "输出:")?;
            for entry in &result.command_outputs {
                writeln!(f, "--- Command: {} ---", entry.command)?;
                writeln!(f, "{}", entry.output)?;
            }
            writeln!(f, "{rule}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use secrecy::SecretString;
    use tempfile::TempDir;

    use super::*;
    use crate::config::DeviceRecord;
    use crate::inspect::{CredentialUsed, InspectionResult};
    use crate::platform::DeviceKind;
    use crate::session::CommandOutput;

    fn device(label: &str, host: &str, kind: DeviceKind) -> DeviceRecord {
        DeviceRecord {
            host: host.to_string(),
            kind,
            username: "admin".to_string(),
            password: SecretString::from("pw".to_string()),
            backup_password: None,
            secret: None,
            port: 22,
            commands: Vec::new(),
            label: label.to_string(),
        }
    }

    fn output(command: &str, output: &str) -> CommandOutput {
        CommandOutput {
            command: command.to_string(),
            output: output.to_string(),
        }
    }

    fn fixed_report(results: Vec<InspectionResult>) -> Report {
        let stamp = Local.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        Report::with_timestamp(stamp, results)
    }

    #[test]
    fn test_header_and_device_block() {
        let result = InspectionResult::success(
            device("core-sw01", "10.0.0.1", DeviceKind::CiscoIos),
            CredentialUsed::Primary,
            vec![output("show version", "Cisco IOS Software")],
        );
        let text = fixed_report(vec![result]).render();

        let rule = "=".repeat(50);
        assert!(text.starts_with("巡检时间: 2026-01-05 09:30:00\n"));
        // Every rule line is followed by a blank line, including the last.
        assert!(text.contains(&format!("{rule}\n\n设备:")));
        assert!(text.ends_with(&format!("{rule}\n\n")));
        assert!(text.contains("设备: core-sw01 (cisco_ios)\n"));
        assert!(text.contains("IP地址: 10.0.0.1\n"));
        assert!(text.contains("状态: success\n"));
        assert!(text.contains("登录密码: 主密码\n"));
        assert!(text.contains("--- Command: show version ---\nCisco IOS Software\n"));
        assert!(!text.contains("错误:"));
    }

    #[test]
    fn test_failed_device_block() {
        let result = InspectionResult::failure(
            device("edge-r1", "10.0.0.2", DeviceKind::Juniper),
            CredentialUsed::None,
            Vec::new(),
            "Host 10.0.0.2 unreachable: Connection timed out after 30s".to_string(),
        );
        let text = fixed_report(vec![result]).render();

        assert!(text.contains("状态: failed\n"));
        // The credential line always carries a label, never a blank.
        assert!(text.contains("登录密码: 未成功登录\n"));
        assert!(text.contains("错误: Host 10.0.0.2 unreachable"));
        assert!(text.contains("输出:\n"));
    }

    #[test]
    fn test_partial_outputs_rendered_for_failed_device() {
        let result = InspectionResult::failure(
            device("core-sw01", "10.0.0.1", DeviceKind::Huawei),
            CredentialUsed::Backup,
            vec![
                output("display version", "VRP (R) software"),
                output("display arp", "ARP table"),
            ],
            "Command \"display vlan\" failed: Channel closed by peer".to_string(),
        );
        let text = fixed_report(vec![result]).render();

        assert!(text.contains("登录密码: 备用密码\n"));
        assert!(text.contains("--- Command: display version ---"));
        assert!(text.contains("--- Command: display arp ---"));
        assert!(!text.contains("--- Command: display vlan ---"));
    }

    #[test]
    fn test_devices_in_result_order() {
        let results = vec![
            InspectionResult::success(
                device("b-sw", "10.0.0.2", DeviceKind::CiscoIos),
                CredentialUsed::Primary,
                Vec::new(),
            ),
            InspectionResult::success(
                device("a-sw", "10.0.0.1", DeviceKind::CiscoIos),
                CredentialUsed::Primary,
                Vec::new(),
            ),
        ];
        let text = fixed_report(results).render();

        let first = text.find("设备: b-sw").unwrap();
        let second = text.find("设备: a-sw").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_write_to_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let report = fixed_report(vec![InspectionResult::success(
            device("core-sw01", "10.0.0.1", DeviceKind::CiscoIos),
            CredentialUsed::Primary,
            Vec::new(),
        )]);

        let written = report.write_to(Some(&path)).unwrap();

        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), report.render());
    }

    #[test]
    fn test_write_to_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        let report = fixed_report(Vec::new());

        let error = report.write_to(Some(&path)).unwrap_err();
        assert!(error.to_string().contains("report.txt"));
    }

    #[test]
    fn test_default_path_name() {
        assert_eq!(DEFAULT_REPORT_PATH, "inspection_results.txt");
    }
}
