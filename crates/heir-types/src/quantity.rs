use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = 1024 * KILOBYTE;
const GIGABYTE: u64 = 1024 * MEGABYTE;
const TERABYTE: u64 = 1024 * GIGABYTE;

/// A memory or disk size, stored in whole megabytes.
///
/// Parsed from `<digits><unit>[B]` where unit is one of `K`, `M`, `G`, `T`
/// (case-insensitive). A unit is mandatory: `256` alone is rejected.
/// Kilobyte values round down to the nearest megabyte.
///
/// # Examples
///
/// ```
/// use heir_types::ByteQuantity;
///
/// assert_eq!("256M".parse::<ByteQuantity>().unwrap().megabytes(), 256);
/// assert_eq!("1gb".parse::<ByteQuantity>().unwrap().megabytes(), 1024);
/// assert!("256".parse::<ByteQuantity>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ByteQuantity {
    megabytes: u64,
}

impl ByteQuantity {
    /// Create a quantity from a megabyte count.
    pub const fn from_megabytes(megabytes: u64) -> Self {
        Self { megabytes }
    }

    pub const fn megabytes(&self) -> u64 {
        self.megabytes
    }
}

impl FromStr for ByteQuantity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidByteQuantity(s.to_string());
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        let without_b = upper.strip_suffix('B').unwrap_or(&upper);

        let mut chars = without_b.chars();
        let unit = chars.next_back().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let multiplier = match unit {
            'K' => KILOBYTE,
            'M' => MEGABYTE,
            'G' => GIGABYTE,
            'T' => TERABYTE,
            _ => return Err(invalid()),
        };

        let value: u64 = digits.parse().map_err(|_| invalid())?;
        let bytes = value.checked_mul(multiplier).ok_or_else(invalid)?;
        Ok(Self::from_megabytes(bytes / MEGABYTE))
    }
}

impl fmt::Display for ByteQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}M", self.megabytes)
    }
}

impl From<ByteQuantity> for String {
    fn from(quantity: ByteQuantity) -> Self {
        quantity.to_string()
    }
}

impl TryFrom<String> for ByteQuantity {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mb(s: &str) -> u64 {
        s.parse::<ByteQuantity>().unwrap().megabytes()
    }

    #[test]
    fn parses_each_unit() {
        assert_eq!(mb("2048K"), 2);
        assert_eq!(mb("64M"), 64);
        assert_eq!(mb("2G"), 2048);
        assert_eq!(mb("1T"), 1024 * 1024);
    }

    #[test]
    fn accepts_optional_b_suffix_and_any_case() {
        assert_eq!(mb("128MB"), 128);
        assert_eq!(mb("128mb"), 128);
        assert_eq!(mb("1Gb"), 1024);
        assert_eq!(mb(" 256M "), 256);
    }

    #[test]
    fn kilobytes_round_down() {
        assert_eq!(mb("1500K"), 1);
        assert_eq!(mb("512K"), 0);
    }

    #[test]
    fn rejects_missing_unit_and_garbage() {
        for bad in ["", "256", "M", "MB", "-1M", "12X", "1.5G", "abcM", "B"] {
            assert!(
                bad.parse::<ByteQuantity>().is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!("99999999999999999999T".parse::<ByteQuantity>().is_err());
        assert!("18446744073709551615T".parse::<ByteQuantity>().is_err());
    }

    #[test]
    fn display_uses_megabytes() {
        assert_eq!("1G".parse::<ByteQuantity>().unwrap().to_string(), "1024M");
    }

    #[test]
    fn serializes_as_text() {
        let q = ByteQuantity::from_megabytes(512);
        assert_eq!(serde_json::to_value(q).unwrap(), "512M");
        let back: ByteQuantity = serde_json::from_str("\"2G\"").unwrap();
        assert_eq!(back.megabytes(), 2048);
        assert!(serde_json::from_str::<ByteQuantity>("\"2\"").is_err());
    }
}
