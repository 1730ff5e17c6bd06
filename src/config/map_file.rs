//! GoveeBTTempLogger `gvh-titlemap.txt` files.
//!
//! Each non-blank line has the form `ADDRESS<whitespace>NAME`.

use super::device::{DeviceConfig, BLUETOOTH_ADDRESS_PATTERN};
use regex::Regex;
use std::sync::OnceLock;

fn map_line_re() -> &'static Regex {
    static MAP_LINE: OnceLock<Regex> = OnceLock::new();
    MAP_LINE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<address>{BLUETOOTH_ADDRESS_PATTERN})(?:\s+(?P<name>.*?))?\s*$"
        ))
        .expect("map line pattern is valid")
    })
}

/// Parse `text` as a map file.
///
/// Returns `None` if any non-blank line is not an address entry, meaning the text is
/// some other kind of file. Entries without a name are dropped.
pub fn parse_map_file(text: &str) -> Option<Vec<DeviceConfig>> {
    let mut devices: Vec<DeviceConfig> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let captures = map_line_re().captures(line)?;
        let Some(name) = captures.name("name").map(|m| m.as_str()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let device = DeviceConfig::new(&captures["address"], Some(name.to_string()));
        // Later entries for the same address win
        match devices.iter_mut().find(|d| d.address == device.address) {
            Some(existing) => *existing = device,
            None => devices.push(device),
        }
    }

    Some(devices)
}
