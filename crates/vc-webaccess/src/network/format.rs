//! Debian-style `interfaces` file reading and writing.
//!
//! Only the subset the system page edits is understood: `iface` stanzas
//! with `dhcp` or `static` methods and their `address`, `netmask` and
//! `gateway` options. Everything else is skipped on read and regenerated on
//! write.

use crate::domain::interface::InterfaceRecord;
use std::fmt::Write as _;

/// Fixed preamble of every written file
const PREAMBLE: &str = "auto lo\niface lo inet loopback\nallow-hotplug eth0\n";

/// Parse interface records in file order.
///
/// A `dhcp` stanza is emitted as soon as its `iface` line is read; a
/// `static` stanza stays open for option lines until the next `iface` line
/// or the end of input.
pub fn parse_interfaces(text: &str) -> Vec<InterfaceRecord> {
    let mut records = Vec::new();
    let mut open: Option<InterfaceRecord> = None;

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&keyword) = tokens.first() else {
            continue;
        };
        if keyword.starts_with('#') {
            continue;
        }

        match keyword {
            "iface" => {
                if let Some(record) = open.take() {
                    records.push(record);
                }
                if tokens.len() < 4 {
                    continue;
                }
                match tokens[3] {
                    "dhcp" => records.push(InterfaceRecord::dhcp(tokens[1])),
                    "static" => open = Some(InterfaceRecord::with_static(tokens[1], "", "", "")),
                    // loopback, manual, ...
                    _ => {}
                }
            }
            "address" | "netmask" | "gateway" => {
                let (Some(record), Some(value)) = (open.as_mut(), tokens.get(1)) else {
                    continue;
                };
                let value = value.to_string();
                match keyword {
                    "address" => record.address = value,
                    "netmask" => record.netmask = value,
                    _ => record.gateway = value,
                }
            }
            _ => {}
        }
    }

    if let Some(record) = open {
        records.push(record);
    }
    records
}

/// Render the full file for `records`.
///
/// Empty options of a static record are left out, so a stanza read from
/// disk without a gateway is written back without one.
pub fn serialize_interfaces(records: &[InterfaceRecord]) -> String {
    let mut out = String::from(PREAMBLE);

    for record in records {
        if !record.is_static {
            let _ = writeln!(out, "iface {} inet dhcp", record.name);
            continue;
        }
        let _ = writeln!(out, "iface {} inet static", record.name);
        for (option, value) in [
            ("address", &record.address),
            ("netmask", &record.netmask),
            ("gateway", &record.gateway),
        ] {
            if !value.is_empty() {
                let _ = writeln!(out, "  {} {}", option, value);
            }
        }
    }

    out
}
