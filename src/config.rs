//! Configuration loading.
//!
//! The configuration file is either a GoveeBTTempLogger `gvh-titlemap.txt` map file or
//! a TOML document:
//!
//! ```toml
//! [config]
//! log_directory = "/var/log/goveebttemplogger"
//! map_file = "/var/log/goveebttemplogger/gvh-titlemap.txt"
//!
//! ["A4:C1:38:12:34:56"]
//! name = "Kitchen"
//! ```
//!
//! Names from `map_file` take precedence over names given in device sections.

mod device;
mod map_file;

pub use device::{chunk_address, is_bluetooth_address, DeviceConfig};
pub use map_file::parse_map_file;

use crate::error::{GvError, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Location of the configuration file, relative to the home directory
const DEFAULT_CONFIG_PATH: &str = ".config/gv-tools/gv-tools.rc";

/// The `[config]` section
#[derive(Debug, Default, Deserialize)]
struct MainSection {
    #[serde(default)]
    log_directory: Option<PathBuf>,
    #[serde(default)]
    map_file: Option<PathBuf>,
}

/// A `["AA:BB:CC:DD:EE:FF"]` device section
#[derive(Debug, Default, Deserialize)]
struct DeviceSection {
    #[serde(default)]
    name: Option<String>,
}

/// Loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory holding GoveeBTTempLogger's log files
    pub log_directory: Option<PathBuf>,
    /// Known devices, in the order they were configured
    pub devices: Vec<DeviceConfig>,
}

impl Config {
    /// `~/.config/gv-tools/gv-tools.rc`, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_PATH))
    }

    /// Load the configuration from `path`, or from [`Config::default_path`].
    ///
    /// A missing file is an empty configuration, not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };

        if !path.is_file() {
            debug!("no configuration file at {}", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| GvError::open_error(&path, e))?;
        debug!("loading configuration from {}", path.display());
        Self::parse(&text)
    }

    /// Parse configuration text in either supported format
    pub fn parse(text: &str) -> Result<Self> {
        if let Some(devices) = parse_map_file(text) {
            return Ok(Self {
                log_directory: None,
                devices,
            });
        }

        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| GvError::config(e.to_string()))?;

        let mut config = Self::default();

        if let Some(section) = table.get("config") {
            let main: MainSection = section
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| GvError::config(format!("[config]: {e}")))?;

            config.log_directory = main.log_directory.filter(|d| !d.as_os_str().is_empty());

            if let Some(map_path) = main.map_file.filter(|p| !p.as_os_str().is_empty()) {
                let map_text = std::fs::read_to_string(&map_path)
                    .map_err(|e| GvError::open_error(&map_path, e))?;
                config.devices = parse_map_file(&map_text).ok_or_else(|| {
                    GvError::config(format!("Not a map file: {}", map_path.display()))
                })?;
            }
        }

        for (section_name, section) in &table {
            if !is_bluetooth_address(section_name) {
                continue;
            }
            let device: DeviceSection = section.clone().try_into().map_err(
                |e: toml::de::Error| GvError::config(format!("[{section_name}]: {e}")),
            )?;
            config.add_device(DeviceConfig::new(section_name, device.name));
        }

        Ok(config)
    }

    /// Look up a device by address (any case)
    pub fn device(&self, address: &str) -> Option<&DeviceConfig> {
        self.devices
            .iter()
            .find(|d| d.address.eq_ignore_ascii_case(address))
    }

    /// Add `device` unless its address is already known
    pub fn add_device(&mut self, device: DeviceConfig) {
        if self.device(&device.address).is_none() {
            self.devices.push(device);
        }
    }
}
