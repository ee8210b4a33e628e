use std::fmt;
use std::str::FromStr;

/// The integer to factor (or the discrete-log modulus), kept in decimal.
///
/// Inputs run to hundreds of digits, so no machine integer is involved;
/// leading zeros are dropped so equal values compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputNumber(String);

impl InputNumber {
    /// Number of decimal digits.
    pub fn digits(&self) -> usize {
        self.0.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Zero stands for "no N", wherever it comes from.
    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }
}

impl FromStr for InputNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{s}' is not a decimal integer"));
        }
        let trimmed = s.trim_start_matches('0');
        let canonical = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(Self(canonical.to_string()))
    }
}

impl fmt::Display for InputNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
