//! Vendor device types and their capability profiles.
//!
//! Every supported vendor resolves to a static [`Profile`]: the prompt
//! pattern its CLI settles on, the commands that switch pagination off,
//! and the privileged-mode elevation sequence when the vendor has one.
//! Orchestration code never branches on vendor name strings; it asks the
//! profile.
//!
//! # Prompt Examples
//!
//! ```text
//! Switch>                   # Cisco exec mode
//! Switch#                   # Cisco privileged mode
//! <CE6850>                  # Huawei VRP user view
//! [CE6850]                  # Huawei VRP system view
//! user@router>              # JUNOS operational mode
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported vendor platforms.
///
/// Wire names (config files, report output) are the snake_case form of
/// the variant, e.g. `cisco_ios`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Cisco IOS (classic)
    CiscoIos,
    /// Cisco IOS-XE
    CiscoXe,
    /// Cisco NX-OS (Nexus)
    CiscoNxos,
    /// Huawei VRP
    Huawei,
    /// H3C Comware
    H3c,
    /// Juniper JUNOS
    Juniper,
}

impl DeviceKind {
    /// All supported kinds, in a stable order.
    pub const ALL: [DeviceKind; 6] = [
        DeviceKind::CiscoIos,
        DeviceKind::CiscoXe,
        DeviceKind::CiscoNxos,
        DeviceKind::Huawei,
        DeviceKind::H3c,
        DeviceKind::Juniper,
    ];

    /// The wire name used in config files and the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::CiscoIos => "cisco_ios",
            DeviceKind::CiscoXe => "cisco_xe",
            DeviceKind::CiscoNxos => "cisco_nxos",
            DeviceKind::Huawei => "huawei",
            DeviceKind::H3c => "h3c",
            DeviceKind::Juniper => "juniper",
        }
    }

    /// Look up a kind by its wire name.
    pub fn from_name(name: &str) -> Option<DeviceKind> {
        DeviceKind::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// The static capability profile for this kind.
    pub fn profile(&self) -> &'static Profile {
        match self {
            DeviceKind::CiscoIos => &CISCO_IOS,
            DeviceKind::CiscoXe => &CISCO_XE,
            DeviceKind::CiscoNxos => &CISCO_NXOS,
            DeviceKind::Huawei => &HUAWEI,
            DeviceKind::H3c => &H3C,
            DeviceKind::Juniper => &JUNIPER,
        }
    }

    /// Whether this vendor elevates into privileged mode with a secret.
    pub fn requires_secret(&self) -> bool {
        self.profile().elevation.is_some()
    }

    /// The stock diagnostic command set for this vendor.
    ///
    /// Applied only when a caller opts in; normalization never falls back
    /// to these on its own.
    pub fn default_commands(&self) -> &'static [&'static str] {
        match self {
            DeviceKind::CiscoIos | DeviceKind::CiscoXe => &[
                "show version",
                "show ip interface brief",
                "show vlan brief",
                "show spanning-tree summary",
                "show arp",
                "show processes cpu",
                "show memory statistics",
            ],
            DeviceKind::CiscoNxos => &[
                "show version",
                "show interface brief",
                "show vlan brief",
                "show spanning-tree detail",
                "show ip arp",
                "show processes cpu",
                "show processes memory",
            ],
            DeviceKind::Huawei => &[
                "display version",
                "display ip interface brief",
                "display vlan",
                "display stp brief",
                "display arp",
                "display cpu-usage",
                "display memory-usage",
            ],
            DeviceKind::H3c => &[
                "display version",
                "display ip interface brief",
                "display vlan",
                "display stp brief",
                "display arp",
                "display cpu-usage",
                "display memory",
            ],
            DeviceKind::Juniper => &[
                "show version",
                "show interfaces terse",
                "show vlans",
                "show spanning-tree bridge",
                "show arp",
                "show chassis alarms",
                "show system processes summary",
            ],
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static per-vendor session behavior.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// Regex matching the CLI prompt at the end of command output.
    pub prompt: &'static str,

    /// Commands run right after login to disable output pagination.
    pub pagination_off: &'static [&'static str],

    /// Privileged-mode elevation sequence, for vendors that have one.
    pub elevation: Option<Elevation>,
}

/// How a vendor elevates into privileged mode.
#[derive(Debug, Clone, Copy)]
pub struct Elevation {
    /// Command that starts the elevation (e.g. `enable`).
    pub command: &'static str,

    /// Regex matching the secret prompt the device answers with.
    pub prompt: &'static str,
}

/// Shared secret prompt for enable/super style elevation.
const SECRET_PROMPT: &str = r"(?mi)password[:\s]*$";

const CISCO_IOS: Profile = Profile {
    prompt: r"(?mi)^[\w.\-@/:]{1,63}[>#]\s?$",
    pagination_off: &["terminal length 0", "terminal width 512"],
    elevation: Some(Elevation {
        command: "enable",
        prompt: SECRET_PROMPT,
    }),
};

const CISCO_XE: Profile = Profile {
    prompt: r"(?mi)^[\w.\-@/:]{1,63}[>#]\s?$",
    pagination_off: &["terminal length 0", "terminal width 512"],
    elevation: Some(Elevation {
        command: "enable",
        prompt: SECRET_PROMPT,
    }),
};

const CISCO_NXOS: Profile = Profile {
    prompt: r"(?mi)^[\w.\-@/:]{1,63}[>#]\s?$",
    pagination_off: &["terminal length 0"],
    elevation: Some(Elevation {
        command: "enable",
        prompt: SECRET_PROMPT,
    }),
};

const HUAWEI: Profile = Profile {
    prompt: r"(?mi)^[<\[][\w.\-]{1,63}[>\]]\s?$",
    pagination_off: &["screen-length 0 temporary"],
    elevation: Some(Elevation {
        command: "super",
        prompt: SECRET_PROMPT,
    }),
};

const H3C: Profile = Profile {
    prompt: r"(?mi)^[<\[][\w.\-]{1,63}[>\]]\s?$",
    pagination_off: &["screen-length disable"],
    elevation: Some(Elevation {
        command: "super",
        prompt: SECRET_PROMPT,
    }),
};

const JUNIPER: Profile = Profile {
    prompt: r"(?mi)^(\{\w+(:(\w+)?\d)?\}\n)?[\w\-@()/:\.]{1,63}[>#%]\s?$",
    pagination_off: &["set cli screen-length 0", "set cli screen-width 511"],
    elevation: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use regex::bytes::Regex;

    fn prompt_regex(kind: DeviceKind) -> Regex {
        Regex::new(kind.profile().prompt).unwrap()
    }

    #[test]
    fn test_wire_name_round_trip() {
        for kind in DeviceKind::ALL {
            assert_eq!(DeviceKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(DeviceKind::from_name("cisco"), None);
        assert_eq!(DeviceKind::from_name(""), None);
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&DeviceKind::CiscoIos).unwrap();
        assert_eq!(json, "\"cisco_ios\"");
        let kind: DeviceKind = serde_json::from_str("\"juniper\"").unwrap();
        assert_eq!(kind, DeviceKind::Juniper);
        assert!(serde_json::from_str::<DeviceKind>("\"fortinet\"").is_err());
    }

    #[test]
    fn test_cisco_prompt_match() {
        let re = prompt_regex(DeviceKind::CiscoIos);
        assert!(re.is_match(b"Switch>"));
        assert!(re.is_match(b"core-sw01# "));
        assert!(re.is_match(b"show version\r\nCisco IOS Software\r\nSwitch#"));
        assert!(!re.is_match(b"Password:"));
    }

    #[test]
    fn test_vrp_prompt_match() {
        let re = prompt_regex(DeviceKind::Huawei);
        assert!(re.is_match(b"<CE6850>"));
        assert!(re.is_match(b"[CE6850] "));
        assert!(!re.is_match(b"CE6850#"));
    }

    #[test]
    fn test_juniper_prompt_match() {
        let re = prompt_regex(DeviceKind::Juniper);
        assert!(re.is_match(b"admin@edge-r1> "));
        assert!(re.is_match(b"{master:0}\nadmin@edge-r1>"));
        assert!(!re.is_match(b"admin@edge-r1 "));
    }

    #[test]
    fn test_elevation_capability() {
        assert!(DeviceKind::CiscoIos.requires_secret());
        assert!(DeviceKind::Huawei.requires_secret());
        assert!(!DeviceKind::Juniper.requires_secret());
        let elevation = DeviceKind::CiscoIos.profile().elevation.unwrap();
        assert_eq!(elevation.command, "enable");
    }

    #[test]
    fn test_default_commands_cover_all_kinds() {
        for kind in DeviceKind::ALL {
            assert!(
                !kind.default_commands().is_empty(),
                "{kind} has no stock command set"
            );
            assert!(!kind.profile().pagination_off.is_empty());
        }
    }
}
