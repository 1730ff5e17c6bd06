//! Command-line interface of `gv-view-log`.

use crate::error::{GvError, Result};
use crate::units::TemperatureUnit;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Options for one `gv-view-log` run
#[derive(Debug, Clone, PartialEq)]
pub struct ViewLogOptions {
    /// Explicit `(year, month)` to view
    pub date: Option<(i32, u32)>,
    /// Show only readings at or after this time (local time unless `utc`)
    pub since: Option<NaiveDateTime>,
    pub config_file: Option<PathBuf>,
    pub header: bool,
    pub log_directory: Option<PathBuf>,
    pub units: TemperatureUnit,
    pub utc: bool,
    /// Full or partial device name or address; empty matches everything
    pub name: String,
}

impl Default for ViewLogOptions {
    fn default() -> Self {
        Self {
            date: None,
            since: None,
            config_file: None,
            header: true,
            log_directory: None,
            units: TemperatureUnit::Celsius,
            utc: false,
            name: String::new(),
        }
    }
}

impl ViewLogOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            date: matches.get_one::<(i32, u32)>("date").copied(),
            since: matches.get_one::<NaiveDateTime>("since").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            header: matches.get_one::<bool>("header").copied().unwrap_or(true),
            log_directory: matches.get_one::<PathBuf>("log-directory").cloned(),
            units: matches
                .get_one::<TemperatureUnit>("units")
                .copied()
                .unwrap_or_default(),
            utc: matches.get_flag("utc"),
            name: matches.get_one::<String>("name").cloned().unwrap_or_default(),
        })
    }
}

/// Build the `gv-view-log` argument parser
pub fn command() -> Command {
    Command::new("gv-view-log")
        .version(crate::VERSION)
        .about("View logs from GoveeBTTempLogger in a friendlier format")
        .long_about(
            "View logs from GoveeBTTempLogger in a friendlier format. With --since, the \
             log is binary searched so that only the requested time range is read.",
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YEAR-MONTH")
                .value_parser(parse_year_month)
                .help(
                    "The year and month to print logs for. Defaults to the month of \
                     --since, or the current month. Note that dates are always UTC.",
                ),
        )
        .arg(
            Arg::new("since")
                .long("since")
                .value_name("TIMESTAMP")
                .value_parser(parse_since)
                .help("Only print readings at or after YYYY-MM-DD[ HH:MM[:SS]]."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG_FILE")
                .value_parser(value_parser!(PathBuf))
                .help(
                    "The path to the configuration file. This may be GoveeBTTempLogger's \
                     `gvh-titlemap.txt` file. Defaults to ~/.config/gv-tools/gv-tools.rc.",
                ),
        )
        .arg(
            Arg::new("header")
                .long("header")
                .value_name("VALUE")
                .value_parser(parse_bool)
                .default_value("1")
                .help(
                    "Set to `0` to suppress printing the device name and column \
                     headings; set to `1` (the default) to print them.",
                ),
        )
        .arg(
            Arg::new("log-directory")
                .long("log-directory")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the directory containing GoveeBTTempLogger's log files."),
        )
        .arg(
            Arg::new("units")
                .long("units")
                .value_name("UNITS")
                .value_parser(parse_units)
                .default_value("centigrade")
                .help("The temperature units to show: c, centigrade, celsius, f, fahrenheit."),
        )
        .arg(
            Arg::new("utc")
                .long("utc")
                .action(ArgAction::SetTrue)
                .help("Show times as UTC times instead of in the local time."),
        )
        .arg(
            Arg::new("name")
                .value_name("NAME")
                .index(1)
                .help(
                    "The name (or partial name) of the device to print logs for. If \
                     multiple devices match or no name is given, a prompt allows \
                     selecting a specific device.",
                ),
        )
}

fn year_month_re() -> &'static Regex {
    static YEAR_MONTH: OnceLock<Regex> = OnceLock::new();
    YEAR_MONTH.get_or_init(|| {
        Regex::new(r"^(?P<year>\d+)-(?P<month>\d+)$").expect("year-month pattern is valid")
    })
}

/// Parse `YYYY-MM`
pub fn parse_year_month(text: &str) -> Result<(i32, u32)> {
    let invalid = || {
        GvError::invalid_argument(format!(
            "Invalid date. Date must be in the form YYYY-MM: {text}"
        ))
    };

    let captures = year_month_re().captures(text).ok_or_else(invalid)?;
    let year = captures["year"].parse::<i32>().map_err(|_| invalid())?;
    let month = captures["month"].parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS` (`T` also accepted)
pub fn parse_since(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(timestamp);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::default()));
    }
    Err(GvError::invalid_argument(format!(
        "Invalid timestamp. Expected YYYY-MM-DD[ HH:MM[:SS]]: {text}"
    )))
}

/// Parse a boolean flag value such as `1`, `0`, `yes` or `off`
pub fn parse_bool(text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(GvError::invalid_argument(format!(
            "Expected a boolean value: {text}"
        ))),
    }
}

fn parse_units(text: &str) -> Result<TemperatureUnit> {
    text.parse()
}
