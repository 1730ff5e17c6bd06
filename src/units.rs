//! Temperature units.

use crate::error::{GvError, Result};
use std::str::FromStr;

/// Convert degrees centigrade to degrees Fahrenheit
pub fn fahrenheit_from_centigrade(degrees_c: f64) -> f64 {
    degrees_c * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a reading in degrees centigrade into this unit
    pub fn convert(&self, degrees_c: f64) -> f64 {
        match self {
            Self::Celsius => degrees_c,
            Self::Fahrenheit => fahrenheit_from_centigrade(degrees_c),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Celsius => 'C',
            Self::Fahrenheit => 'F',
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = GvError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "c" | "centigrade" | "celsius" => Ok(Self::Celsius),
            "f" | "fahrenheit" => Ok(Self::Fahrenheit),
            _ => Err(GvError::invalid_argument(format!(
                "Unknown temperature unit {name:?} (expected c, centigrade, celsius, f or fahrenheit)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_from_centigrade() {
        assert_eq!(fahrenheit_from_centigrade(0.0), 32.0);
        assert_eq!(fahrenheit_from_centigrade(100.0), 212.0);
        assert_eq!(fahrenheit_from_centigrade(-40.0), -40.0);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("C".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!(
            "centigrade".parse::<TemperatureUnit>().unwrap(),
            TemperatureUnit::Celsius
        );
        assert_eq!(
            "Fahrenheit".parse::<TemperatureUnit>().unwrap(),
            TemperatureUnit::Fahrenheit
        );
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_convert() {
        assert_eq!(TemperatureUnit::Celsius.convert(21.5), 21.5);
        assert_eq!(TemperatureUnit::Fahrenheit.convert(20.0), 68.0);
        assert_eq!(TemperatureUnit::Fahrenheit.symbol(), 'F');
    }
}
