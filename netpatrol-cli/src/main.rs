//! Fleet inspection from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use netpatrol::config::{self, CommandTable};
use netpatrol::{Inspector, Report, SshTransport, Status, TransportConfig};

/// Multi-vendor network fleet inspection over SSH.
///
/// Reads a device config, logs in to every device in order, runs each
/// device's command list and writes one flat text report for the run.
#[derive(Debug, Parser)]
#[command(name = "netpatrol", version, about)]
struct Cli {
    /// Combined config file carrying both devices and commands
    #[arg(conflicts_with_all = ["mixed", "devices"])]
    config: Option<PathBuf>,

    /// Device config file (JSON or line-oriented text)
    #[arg(short, long)]
    devices: Option<PathBuf>,

    /// Command table file, applied to devices without their own commands
    #[arg(short, long)]
    commands: Option<PathBuf>,

    /// Combined config file, same as the positional form
    #[arg(short, long, conflicts_with = "devices")]
    mixed: Option<PathBuf>,

    /// Report output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fill command gaps with the built-in per-vendor diagnostic sets
    #[arg(long)]
    builtin_commands: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// The command table handed to config normalization, if any.
    fn command_table(&self) -> Result<Option<CommandTable>> {
        let mut table = match &self.commands {
            Some(path) => Some(
                config::load_commands(path)
                    .with_context(|| format!("loading commands from {}", path.display()))?,
            ),
            None => None,
        };

        if self.builtin_commands {
            let mut merged = table.unwrap_or_default();
            merged.merge_missing(&CommandTable::builtin());
            table = Some(merged);
        }

        Ok(table)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let table = cli.command_table()?;

    let devices = if let Some(path) = cli.mixed.as_ref().or(cli.config.as_ref()) {
        config::load_mixed(path, table.as_ref())
            .with_context(|| format!("loading config from {}", path.display()))?
    } else {
        let path = cli
            .devices
            .clone()
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_DEVICES_PATH));
        config::load_devices(&path, table.as_ref())
            .with_context(|| format!("loading devices from {}", path.display()))?
    };

    info!("Inspecting {} devices", devices.len());

    let transport = SshTransport::new(TransportConfig::default());
    let results = Inspector::new(transport).run(devices).await;

    let succeeded = results
        .iter()
        .filter(|r| r.status == Status::Success)
        .count();
    let failed = results.len() - succeeded;

    let report = Report::new(results);
    let written = report
        .write_to(cli.output.as_deref())
        .context("writing report")?;

    println!("Inspected {} devices: {succeeded} ok, {failed} failed", succeeded + failed);
    println!("Report written to {}", written.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_conflicts_with_mixed() {
        assert!(Cli::try_parse_from(["netpatrol", "fleet.json", "--mixed", "other.json"]).is_err());
    }

    #[test]
    fn test_devices_and_commands_flags() {
        let cli = Cli::try_parse_from([
            "netpatrol",
            "--devices",
            "devices.txt",
            "--commands",
            "commands.json",
            "--builtin-commands",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.devices.as_deref(), Some("devices.txt".as_ref()));
        assert_eq!(cli.commands.as_deref(), Some("commands.json".as_ref()));
        assert!(cli.builtin_commands);
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_builtin_commands_without_table() {
        let cli = Cli::try_parse_from(["netpatrol", "--builtin-commands"]).unwrap();
        let table = cli.command_table().unwrap().unwrap();
        assert!(!table.is_empty());
    }
}
