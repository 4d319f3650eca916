//! Inspect a single device and print the report to stdout.
//!
//! # Prerequisites
//!
//! - A reachable network device with SSH enabled
//! - Valid credentials
//!
//! # Usage
//!
//! ```bash
//! NETPATROL_HOST=192.168.1.1 NETPATROL_USER=admin NETPATROL_PASSWORD=secret \
//!     cargo run --example fleet_inspect -- cisco_ios
//! ```
//!
//! The first argument selects the device type (default `cisco_ios`);
//! the built-in diagnostic command set for that type is run. Set
//! `NETPATROL_SECRET` for devices that need an enable/super password.

use std::env;

use netpatrol::{
    DeviceKind, DeviceRecord, Inspector, Report, SecretString, SshTransport, TransportConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let kind = env::args()
        .nth(1)
        .and_then(|name| DeviceKind::from_name(&name))
        .unwrap_or(DeviceKind::CiscoIos);

    let host = env::var("NETPATROL_HOST").unwrap_or_else(|_| "192.168.1.1".to_string());
    let username = env::var("NETPATROL_USER").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("NETPATROL_PASSWORD").unwrap_or_default();
    let secret = env::var("NETPATROL_SECRET").ok();

    let device = DeviceRecord {
        host: host.clone(),
        kind,
        username,
        password: SecretString::from(password),
        backup_password: None,
        secret: secret.map(SecretString::from),
        port: 22,
        commands: kind
            .default_commands()
            .iter()
            .map(|c| c.to_string())
            .collect(),
        label: host,
    };

    println!("Inspecting {} as {}...", device.host, kind);

    let transport = SshTransport::new(TransportConfig::default());
    let results = Inspector::new(transport).run(vec![device]).await;

    print!("{}", Report::new(results).render());
    Ok(())
}
