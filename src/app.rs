//! The `gv-view-log` application.
//!
//! Resolves which device and month to show, opens that device's log and prints its
//! readings through the pager. With `--since` the log is bisected by timestamp so
//! reading starts at the requested time instead of the top of the file.

use crate::bisect::{bisect_file_leftmost, Encoding};
use crate::cli::ViewLogOptions;
use crate::config::{Config, DeviceConfig};
use crate::error::{GvError, Result};
use crate::logs::{timestamp_key, LogTable, Reading};
use crate::pager::Pager;
use crate::prompt::numbered_choices_prompt;
use crate::units::TemperatureUnit;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Utc};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Width of a formatted timestamp, `2024-01-05 12:00:00+00:00`
const TIMESTAMP_WIDTH: usize = 25;

/// Application state for one run
pub struct LogViewer {
    options: ViewLogOptions,
    config: Config,
    log_directory: PathBuf,
}

impl LogViewer {
    /// Load configuration and resolve the log directory
    pub fn new(options: ViewLogOptions) -> Result<Self> {
        let config = Config::load(options.config_file.as_deref())?;

        let log_directory = match (&options.log_directory, &config.log_directory) {
            (Some(dir), _) | (None, Some(dir)) => dir.clone(),
            (None, None) => std::env::current_dir()?,
        };
        if !log_directory.is_dir() {
            return Err(GvError::NotADirectory {
                path: log_directory,
            });
        }
        debug!("log directory: {}", log_directory.display());

        Ok(Self {
            options,
            config,
            log_directory,
        })
    }

    /// Pick a device interactively and print its log
    pub fn run(mut self) -> Result<()> {
        let (device, path) = self.select_log(&mut io::stdin().lock(), &mut io::stderr())?;

        let mut pager = Pager::start();
        let printed = self.print_log(&device, &path, &mut pager);
        let finished = pager.finish();
        printed?;
        finished
    }

    /// Resolve the month's logs and ask which device to show, when more than one matches
    pub fn select_log<I, W>(
        &mut self,
        input: &mut I,
        output: &mut W,
    ) -> Result<(DeviceConfig, PathBuf)>
    where
        I: BufRead,
        W: Write,
    {
        let (year, month) = self.year_month()?;
        let log_table = LogTable::scan(&self.log_directory)?;
        if log_table.is_empty() {
            return Err(GvError::other(format!(
                "No log files found in {}",
                self.log_directory.display()
            )));
        }
        let logs = log_table.month(year, month).ok_or_else(|| {
            GvError::other(format!(
                "No log files found in {} for {year}-{month:02}.",
                self.log_directory.display()
            ))
        })?;

        // Devices that only appear as log files are listed after configured ones
        for address in logs.keys() {
            self.config.add_device(DeviceConfig::new(address, None));
        }

        let found = matching_devices(&self.config, logs.keys(), &self.options.name);
        if found.is_empty() {
            return Err(GvError::other(format!(
                "No matches to \"{}\" found.",
                self.options.name
            )));
        }

        let labels: Vec<String> = found.iter().map(ToString::to_string).collect();
        let preamble = format!("Govee thermometers found for {year}-{month:02}:");
        let choice = numbered_choices_prompt(&labels, Some(&preamble), input, output)?
            .ok_or(GvError::Cancelled)?;
        let device = found[choice].clone();
        debug!("selected {device}");

        let path = self.log_directory.join(&logs[&device.address]);
        if !path.is_file() {
            return Err(GvError::other(format!(
                "No log file found for the specified device and date: {}",
                path.display()
            )));
        }
        Ok((device, path))
    }

    /// Print the readings in `path`, starting at `--since` when given.
    ///
    /// A closed output (the pager was quit) is reported as [`GvError::OutputClosed`].
    pub fn print_log<W: Write>(
        &self,
        device: &DeviceConfig,
        path: &Path,
        out: &mut W,
    ) -> Result<()> {
        let reader: Box<dyn BufRead> = match self.options.since {
            Some(since) => {
                let since_utc = to_utc(since, self.options.utc)?;
                debug!("bisecting {} for {since_utc}", path.display());
                Box::new(bisect_file_leftmost(
                    path,
                    &since_utc,
                    timestamp_key,
                    Encoding::Utf8,
                )?)
            }
            None => Box::new(BufReader::new(
                File::open(path).map_err(|e| GvError::open_error(path, e))?,
            )),
        };

        match write_readings(reader, out, device, &self.options) {
            Err(GvError::FileError { source, .. })
                if source.kind() == io::ErrorKind::BrokenPipe =>
            {
                debug!("output closed early");
                Err(GvError::OutputClosed)
            }
            result => result,
        }
    }

    /// Month to show: `--date`, else the month of `--since`, else the current month
    fn year_month(&self) -> Result<(i32, u32)> {
        if let Some(date) = self.options.date {
            return Ok(date);
        }
        if let Some(since) = self.options.since {
            let since = to_utc(since, self.options.utc)?;
            return Ok((since.year(), since.month()));
        }
        // GoveeBTTempLogger rolls its files over on UTC month boundaries
        let now = Utc::now();
        Ok((now.year(), now.month()))
    }
}

/// Devices that have a log in `addresses` and whose label contains `query`,
/// ignoring case
pub fn matching_devices<'a, I>(
    config: &'a Config,
    addresses: I,
    query: &str,
) -> Vec<&'a DeviceConfig>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let addresses: Vec<I::Item> = addresses.into_iter().collect();
    let query = query.to_lowercase();
    config
        .devices
        .iter()
        .filter(|device| addresses.iter().any(|a| a.as_ref() == device.address))
        .filter(|device| device.to_string().to_lowercase().contains(&query))
        .collect()
}

/// Interpret a user-supplied time as UTC (`utc`) or local time
fn to_utc(timestamp: NaiveDateTime, utc: bool) -> Result<NaiveDateTime> {
    if utc {
        return Ok(timestamp);
    }
    Local
        .from_local_datetime(&timestamp)
        .earliest()
        .map(|local| local.naive_utc())
        .ok_or_else(|| {
            GvError::invalid_argument(format!("{timestamp} does not exist in the local time zone"))
        })
}

/// Column headings for a device with `probes` temperature probes
pub fn header_line(probes: usize) -> String {
    let mut columns = vec![format!("{:<TIMESTAMP_WIDTH$}", "Date")];
    columns.extend(std::iter::repeat("  Temp.".to_string()).take(probes));
    columns.push("   RH ".to_string());
    columns.push("Battery".to_string());
    columns.join("  ")
}

/// One output row
pub fn format_reading(reading: &Reading, units: TemperatureUnit, utc: bool) -> String {
    let timestamp: DateTime<Utc> = Utc.from_utc_datetime(&reading.timestamp);
    let timestamp = if utc {
        timestamp.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S%:z")
            .to_string()
    };

    let mut columns = vec![timestamp];
    columns.extend(
        reading
            .centigrade
            .iter()
            .map(|&c| format!("{:6.2}{}", units.convert(c), units.symbol())),
    );
    columns.push(format!("{:5.1}%", reading.humidity));
    columns.push(format!("[{:3}%]", reading.battery));
    columns.join("  ")
}

fn write_readings<R, W>(
    reader: R,
    out: &mut W,
    device: &DeviceConfig,
    options: &ViewLogOptions,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut first = true;
    for line in reader.lines() {
        let Some(reading) = Reading::parse(&line?) else {
            continue;
        };

        if first && options.header {
            writeln!(out, "{device}")?;
            writeln!(out, "{}", header_line(reading.centigrade.len()))?;
        }
        first = false;

        writeln!(out, "{}", format_reading(&reading, options.units, options.utc))?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reading(line: &str) -> Reading {
        Reading::parse(line).unwrap()
    }

    #[test]
    fn test_header_line() {
        assert_eq!(
            header_line(1),
            "Date                         Temp.     RH   Battery"
        );
        assert_eq!(header_line(4).matches("Temp.").count(), 4);
    }

    #[test]
    fn test_format_reading_utc() {
        let row = format_reading(
            &reading("2024-01-05 12:00:00\t21.5\t45.2\t7"),
            TemperatureUnit::Celsius,
            true,
        );
        assert_eq!(row, "2024-01-05 12:00:00+00:00   21.50C   45.2%  [  7%]");
    }

    #[test]
    fn test_format_reading_fahrenheit() {
        let row = format_reading(
            &reading("2024-01-05 12:00:00\t20\t50\t100"),
            TemperatureUnit::Fahrenheit,
            true,
        );
        assert!(row.contains(" 68.00F"), "{row}");
    }

    #[test]
    fn test_timestamp_column_matches_header_width() {
        let row = format_reading(
            &reading("2024-06-01 00:00:00\t1\t2\t3"),
            TemperatureUnit::Celsius,
            false,
        );
        assert_eq!(row.find("  ").unwrap(), TIMESTAMP_WIDTH);
    }

    #[test]
    fn test_write_readings_skips_unparsable_lines() {
        let input = "garbage\n2024-01-05 12:00:00\t21.5\t45\t100\n\n2024-01-05 12:01:00\t21.6\t45\t100\n";
        let device = DeviceConfig::new("A4:C1:38:12:34:56", Some("Kitchen".into()));
        let options = ViewLogOptions {
            utc: true,
            ..ViewLogOptions::default()
        };

        let mut out = Vec::new();
        write_readings(Cursor::new(input), &mut out, &device, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Kitchen (A4:C1:38:12:34:56)");
        assert!(lines[1].starts_with("Date"));
        assert!(lines[2].starts_with("2024-01-05 12:00:00+00:00"));
        assert!(lines[3].starts_with("2024-01-05 12:01:00+00:00"));
    }

    #[test]
    fn test_write_readings_without_header() {
        let input = "2024-01-05 12:00:00\t21.5\t45\t100\n";
        let device = DeviceConfig::new("A4:C1:38:12:34:56", None);
        let options = ViewLogOptions {
            header: false,
            utc: true,
            ..ViewLogOptions::default()
        };

        let mut out = Vec::new();
        write_readings(Cursor::new(input), &mut out, &device, &options).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_matching_devices() {
        let mut config = Config::default();
        config.add_device(DeviceConfig::new("A4:C1:38:00:00:01", Some("Kitchen".into())));
        config.add_device(DeviceConfig::new("A4:C1:38:00:00:02", Some("Garage".into())));
        config.add_device(DeviceConfig::new("A4:C1:38:00:00:03", Some("Kitchen freezer".into())));

        let with_logs = ["A4:C1:38:00:00:01", "A4:C1:38:00:00:03"];
        let names = |query: &str| -> Vec<String> {
            matching_devices(&config, with_logs, query)
                .iter()
                .map(|d| d.name.clone().unwrap_or_default())
                .collect()
        };

        assert_eq!(names("kitchen"), vec!["Kitchen", "Kitchen freezer"]);
        assert_eq!(names("FREEZER"), vec!["Kitchen freezer"]);
        assert_eq!(names(""), vec!["Kitchen", "Kitchen freezer"]);
        assert!(names("garage").is_empty());
        assert_eq!(names("00:00:03"), vec!["Kitchen freezer"]);
    }

    /// A log directory holding one month of readings with a burst at 02:30:00
    fn log_directory() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let mut log = File::create(dir.path().join("gvh-A4C138123456-2024-01.txt")).unwrap();
        writeln!(log, "2024-01-05 02:29:00\t20.0\t45.0\t100").unwrap();
        for i in 0..20 {
            writeln!(log, "2024-01-05 02:30:00\t21.{i:02}\t45.0\t100").unwrap();
        }
        for minute in 31..36 {
            writeln!(log, "2024-01-05 02:{minute}:00\t22.0\t45.0\t100").unwrap();
        }
        dir
    }

    fn viewer(dir: &Path, since: Option<&str>) -> LogViewer {
        let options = ViewLogOptions {
            date: Some((2024, 1)),
            since: since.map(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()),
            config_file: Some(dir.join("gv-tools.rc")),
            log_directory: Some(dir.to_path_buf()),
            utc: true,
            ..ViewLogOptions::default()
        };
        LogViewer::new(options).unwrap()
    }

    #[test]
    fn test_since_starts_at_first_reading_with_that_timestamp() {
        let dir = log_directory();
        let mut viewer = viewer(dir.path(), Some("2024-01-05 02:30:00"));

        let (device, path) = viewer
            .select_log(&mut Cursor::new(""), &mut Vec::new())
            .unwrap();
        assert_eq!(device.address, "A4:C1:38:12:34:56");

        let mut out = Vec::new();
        viewer.print_log(&device, &path, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().skip(2).collect();

        assert_eq!(rows.len(), 25);
        assert!(
            rows[0].starts_with("2024-01-05 02:30:00+00:00   21.00C"),
            "{}",
            rows[0]
        );
        assert!(rows[24].starts_with("2024-01-05 02:35:00+00:00"));
    }

    #[test]
    fn test_without_since_prints_whole_log() {
        let dir = log_directory();
        let mut viewer = viewer(dir.path(), None);

        let (device, path) = viewer
            .select_log(&mut Cursor::new(""), &mut Vec::new())
            .unwrap();
        let mut out = Vec::new();
        viewer.print_log(&device, &path, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2 + 26);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_closed_output_is_reported() {
        let dir = log_directory();
        let mut viewer = viewer(dir.path(), None);

        let (device, path) = viewer
            .select_log(&mut Cursor::new(""), &mut Vec::new())
            .unwrap();
        let result = viewer.print_log(&device, &path, &mut ClosedPipe);
        assert!(matches!(result, Err(GvError::OutputClosed)));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let dir = log_directory();
        let mut viewer = viewer(dir.path(), None);
        viewer.options.name = "garage".to_string();

        let result = viewer.select_log(&mut Cursor::new(""), &mut Vec::new());
        assert!(matches!(result, Err(GvError::Other { .. })));
    }

    #[test]
    fn test_to_utc_passthrough() {
        let timestamp =
            NaiveDateTime::parse_from_str("2024-01-05 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(to_utc(timestamp, true).unwrap(), timestamp);
    }
}
