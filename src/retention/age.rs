// Age expressions for the `older` field
// "<number><unit>" where unit is d, w, m or y; a bare number means days

use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;

/// Minimum age, in whole days, an entry must reach before it is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgeThreshold {
    days: u32,
}

impl AgeThreshold {
    pub fn from_days(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Day factor of a unit suffix.
    fn unit_factor(unit: char) -> Option<u32> {
        match unit {
            'd' => Some(1),
            'w' => Some(7),
            'm' => Some(30),
            'y' => Some(365),
            _ => None,
        }
    }
}

impl FromStr for AgeThreshold {
    type Err = ParamError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let invalid = || ParamError::InvalidAge(expression.to_string());
        let trimmed = expression.trim();

        let (number, factor) = match trimmed.chars().last() {
            Some(unit) if unit.is_ascii_alphabetic() => (
                &trimmed[..trimmed.len() - 1],
                Self::unit_factor(unit).ok_or_else(invalid)?,
            ),
            Some(_) => (trimmed, 1),
            None => return Err(invalid()),
        };

        // digits only: no signs, blanks or fractions
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let count: u32 = number.parse().map_err(|_| invalid())?;
        let days = count.checked_mul(factor).ok_or_else(invalid)?;

        Ok(Self { days })
    }
}

impl fmt::Display for AgeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days)
    }
}
