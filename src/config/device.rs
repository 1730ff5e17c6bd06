//! Bluetooth thermometer identities.

use crate::error::{GvError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Pattern for a colon-separated Bluetooth address such as `A4:C1:38:12:34:56`
pub(crate) const BLUETOOTH_ADDRESS_PATTERN: &str = r"(?:[A-Fa-f0-9]{2}:){5}[A-Fa-f0-9]{2}";

fn address_re() -> &'static Regex {
    static ADDRESS: OnceLock<Regex> = OnceLock::new();
    ADDRESS.get_or_init(|| {
        Regex::new(&format!("^{BLUETOOTH_ADDRESS_PATTERN}$")).expect("address pattern is valid")
    })
}

/// Whether `text` is exactly one colon-separated Bluetooth address
pub fn is_bluetooth_address(text: &str) -> bool {
    address_re().is_match(text)
}

/// A thermometer and its optional friendly name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Upper-case, colon-separated Bluetooth address
    pub address: String,
    pub name: Option<String>,
}

impl DeviceConfig {
    pub fn new(address: &str, name: Option<String>) -> Self {
        Self {
            address: address.to_ascii_uppercase(),
            name: name.filter(|n| !n.is_empty()),
        }
    }

    /// The address without `:` separators, as used in log file names
    pub fn short_address(&self) -> String {
        self.address.replace(':', "")
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({})", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// Insert `:` separators between the octets of a 12-digit Bluetooth address
pub fn chunk_address(address: &str) -> Result<String> {
    if address.len() != 12 || !address.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(GvError::invalid_argument(format!(
            "Expected a 12-digit hexadecimal address: {address}"
        )));
    }

    let octets: Vec<&str> = (0..12).step_by(2).map(|i| &address[i..i + 2]).collect();
    Ok(octets.join(":"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let named = DeviceConfig::new("a4:c1:38:12:34:56", Some("Kitchen".to_string()));
        assert_eq!(named.to_string(), "Kitchen (A4:C1:38:12:34:56)");

        let unnamed = DeviceConfig::new("A4:C1:38:12:34:56", None);
        assert_eq!(unnamed.to_string(), "A4:C1:38:12:34:56");
    }

    #[test]
    fn test_empty_name_is_no_name() {
        let device = DeviceConfig::new("A4:C1:38:12:34:56", Some(String::new()));
        assert_eq!(device.name, None);
    }

    #[test]
    fn test_short_address() {
        let device = DeviceConfig::new("A4:C1:38:12:34:56", None);
        assert_eq!(device.short_address(), "A4C138123456");
    }

    #[test]
    fn test_chunk_address() {
        assert_eq!(chunk_address("A4C138123456").unwrap(), "A4:C1:38:12:34:56");
        assert!(chunk_address("A4C1381234").is_err());
        assert!(chunk_address("A4C13812345Z").is_err());
    }

    #[test]
    fn test_is_bluetooth_address() {
        assert!(is_bluetooth_address("a4:c1:38:12:34:56"));
        assert!(!is_bluetooth_address("config"));
        assert!(!is_bluetooth_address("A4:C1:38:12:34:56:78"));
    }
}
