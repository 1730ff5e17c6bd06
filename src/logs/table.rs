//! Discovery of GoveeBTTempLogger log files.
//!
//! GoveeBTTempLogger writes one file per device per (UTC) month, named like
//! `gvh-A4C138123456-2024-01.txt` (older releases: `gvh507x_A4C138123456-2024-01.txt`).

use crate::config::chunk_address;
use crate::error::{GvError, Result};
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

fn log_file_re() -> &'static Regex {
    static LOG_FILE: OnceLock<Regex> = OnceLock::new();
    LOG_FILE.get_or_init(|| {
        Regex::new(
            r"^gvh[^-_]*[-_](?P<address>[0-9A-Fa-f]{12})-(?P<year>\d{4})-(?P<month>\d{2})\.txt$",
        )
        .expect("log file pattern is valid")
    })
}

/// Log files for one month, keyed by upper-case colon-separated address
pub type MonthLogs = BTreeMap<String, String>;

/// Log files found in a directory, grouped by `(year, month)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTable {
    months: BTreeMap<(i32, u32), MonthLogs>,
}

impl LogTable {
    /// List `directory` and index every file that looks like a log
    pub fn scan(directory: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(directory).map_err(|e| {
            GvError::file_error(format!("Failed to list {}", directory.display()), e)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        let table = Self::from_file_names(names);
        debug!(
            "found logs for {} month(s) in {}",
            table.months.len(),
            directory.display()
        );
        Ok(table)
    }

    /// Index file names; names that are not logs are ignored
    pub fn from_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut months: BTreeMap<(i32, u32), MonthLogs> = BTreeMap::new();

        for name in names {
            let name = name.as_ref();
            let Some(captures) = log_file_re().captures(name) else {
                continue;
            };
            let (Ok(year), Ok(month)) = (
                captures["year"].parse::<i32>(),
                captures["month"].parse::<u32>(),
            ) else {
                continue;
            };
            let Ok(address) = chunk_address(&captures["address"].to_ascii_uppercase()) else {
                continue;
            };
            months
                .entry((year, month))
                .or_default()
                .insert(address, name.to_string());
        }

        Self { months }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Logs for one month, if any
    pub fn month(&self, year: i32, month: u32) -> Option<&MonthLogs> {
        self.months.get(&(year, month)).filter(|logs| !logs.is_empty())
    }
}
