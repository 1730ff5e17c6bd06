//! Parsing of individual GoveeBTTempLogger log lines.
//!
//! A line looks like
//!
//! ```text
//! 2024-01-05 12:00:00	21.5	45.2	100
//! 2024-01-05 12:00:00	21.5	45.2	100	H5183	22.0	22.1	22.3
//! ```
//!
//! where the optional trailing fields carry the model and the extra probes of
//! multi-probe meat thermometers. Timestamps are UTC.

use crate::bisect::LineKey;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn timestamp_re() -> &'static Regex {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP.get_or_init(|| {
        Regex::new(r"^(?P<date>\d{4}-\d{2}-\d{2})\s+(?P<time>\d{2}:\d{2}:\d{2})")
            .expect("timestamp pattern is valid")
    })
}

fn reading_re() -> &'static Regex {
    static READING: OnceLock<Regex> = OnceLock::new();
    READING.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<date>\d{4}-\d{2}-\d{2})\s+(?P<time>\d{2}:\d{2}:\d{2})",
            r"\s+(?P<centigrade>\S+)",
            r"\s+(?P<humidity>\d+[.]?\d*)",
            r"\s+(?P<battery>\d+)",
            r"(?:\s+(?P<model>\S+)\s+(?P<centigrade2>\S+)\s+(?P<centigrade3>\S+)\s+(?P<centigrade4>\S+))?",
        ))
        .expect("reading pattern is valid")
    })
}

fn parse_timestamp(captures: &Captures<'_>) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(&captures["date"], "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(&captures["time"], "%H:%M:%S").ok()?;
    Some(NaiveDateTime::new(date, time))
}

/// Sort key for bisecting a log file by time.
///
/// Lines without a leading timestamp are [`LineKey::Invalid`], so blank lines are
/// skipped and anything else stops the search.
pub fn timestamp_key(line: &str) -> LineKey<NaiveDateTime> {
    let Some(captures) = timestamp_re().captures(line) else {
        return LineKey::Invalid("line does not start with a timestamp".to_string());
    };
    match parse_timestamp(&captures) {
        Some(timestamp) => LineKey::Key(timestamp),
        None => LineKey::Invalid("timestamp is out of range".to_string()),
    }
}

/// One sample from a thermometer
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// UTC time of the sample
    pub timestamp: NaiveDateTime,
    /// One temperature per probe, in degrees centigrade
    pub centigrade: Vec<f64>,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Battery level in percent
    pub battery: u8,
    pub model: Option<String>,
}

impl Reading {
    /// Parse a log line, or `None` if it is not a reading
    pub fn parse(line: &str) -> Option<Self> {
        let captures = reading_re().captures(line)?;
        let timestamp = parse_timestamp(&captures)?;

        let mut centigrade = vec![captures["centigrade"].parse::<f64>().ok()?];
        for probe in ["centigrade2", "centigrade3", "centigrade4"] {
            if let Some(value) = captures.name(probe) {
                centigrade.push(value.as_str().parse().ok()?);
            }
        }

        Some(Self {
            timestamp,
            centigrade,
            humidity: captures["humidity"].parse().ok()?,
            battery: captures["battery"].parse().ok()?,
            model: captures.name("model").map(|m| m.as_str().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_single_probe() {
        let reading = Reading::parse("2024-01-05 12:00:00\t21.5\t45.2\t100\n").unwrap();
        assert_eq!(reading.timestamp, at("2024-01-05 12:00:00"));
        assert_eq!(reading.centigrade, vec![21.5]);
        assert_eq!(reading.humidity, 45.2);
        assert_eq!(reading.battery, 100);
        assert_eq!(reading.model, None);
    }

    #[test]
    fn test_parse_multi_probe() {
        let line = "2024-01-05 12:00:00\t21.5\t0\t80\t(GVH5183)\t22\t-1.5\t23.25";
        let reading = Reading::parse(line).unwrap();
        assert_eq!(reading.centigrade, vec![21.5, 22.0, -1.5, 23.25]);
        assert_eq!(reading.battery, 80);
        assert_eq!(reading.model.as_deref(), Some("(GVH5183)"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Reading::parse("").is_none());
        assert!(Reading::parse("hello world").is_none());
        assert!(Reading::parse("2024-01-05 12:00:00\tcold\t45\t100").is_none());
    }

    #[test]
    fn test_timestamp_key() {
        assert_eq!(
            timestamp_key("2024-01-05  07:08:09\t1\t2\t3\n"),
            LineKey::Key(at("2024-01-05 07:08:09"))
        );
        assert!(matches!(timestamp_key("\n"), LineKey::Invalid(_)));
        assert!(matches!(timestamp_key("garbage\n"), LineKey::Invalid(_)));
        assert!(matches!(
            timestamp_key("2024-13-45 00:00:00\n"),
            LineKey::Invalid(_)
        ));
    }

    #[test]
    fn test_battery_out_of_range_is_not_a_reading() {
        assert!(Reading::parse("2024-01-05 12:00:00\t21.5\t45.0\t300").is_none());
        assert_eq!(
            Reading::parse("2024-01-05 12:00:00\t21.5\t45.0\t255")
                .unwrap()
                .battery,
            255
        );
    }
}
