//! Text encodings understood by the bisector.

use crate::error::{GvError, Result};
use bstr::ByteSlice;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Encoding used to decode lines before they are handed to a key function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Strict UTF-8; invalid sequences are a decode error
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD
    Utf8Lossy,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
    /// 7-bit ASCII; any byte above 0x7f is a decode error
    Ascii,
}

impl Encoding {
    /// Canonical name, as accepted by [`Encoding::from_str`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Lossy => "utf-8-lossy",
            Self::Latin1 => "latin-1",
            Self::Ascii => "ascii",
        }
    }

    /// Decode one line. Returns `None` if the bytes are not valid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Self::Utf8 => bytes.to_str().ok().map(Cow::Borrowed),
            Self::Utf8Lossy => Some(bytes.to_str_lossy()),
            // ASCII-only lines decode identically, so they are borrowed
            Self::Latin1 if bytes.is_ascii() => bytes.to_str().ok().map(Cow::Borrowed),
            Self::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
            Self::Ascii => {
                if bytes.is_ascii() {
                    bytes.to_str().ok().map(Cow::Borrowed)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = GvError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-lossy" | "utf8-lossy" => Ok(Self::Utf8Lossy),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            _ => Err(GvError::invalid_argument(format!(
                "Unsupported encoding: {name}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("utf8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("iso_8859_1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("us-ascii".parse::<Encoding>().unwrap(), Encoding::Ascii);
        assert!(matches!(
            "ebcdic".parse::<Encoding>(),
            Err(GvError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for encoding in [
            Encoding::Utf8,
            Encoding::Utf8Lossy,
            Encoding::Latin1,
            Encoding::Ascii,
        ] {
            assert_eq!(encoding.to_string().parse::<Encoding>().unwrap(), encoding);
        }
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let bytes = b"caf\xe9\n";
        assert!(Encoding::Utf8.decode(bytes).is_none());
        assert!(Encoding::Ascii.decode(bytes).is_none());
        assert_eq!(Encoding::Latin1.decode(bytes).unwrap(), "café\n");
        assert_eq!(Encoding::Utf8Lossy.decode(bytes).unwrap(), "caf\u{FFFD}\n");
    }

    #[test]
    fn test_decode_borrows_valid_text() {
        let decoded = Encoding::Utf8.decode(b"12 abc\n").unwrap();
        assert!(matches!(decoded, Cow::Borrowed("12 abc\n")));
    }
}
