//! Deal Value Object
//!
//! Non-negative monetary estimate attached to a lead, coerced from free text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expected deal value, always `>= 0`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DealValue(Decimal);

impl DealValue {
    pub const ZERO: DealValue = DealValue(Decimal::ZERO);

    /// Create from a decimal, clamping negatives to zero
    pub fn new(amount: Decimal) -> Self {
        Self(amount.max(Decimal::ZERO))
    }

    /// Coerce user input into a deal value.
    ///
    /// Anything that does not parse as a number becomes zero; negative
    /// numbers are clamped to zero and numbers beyond the decimal range to
    /// `Decimal::MAX`. Thousands separators and a leading currency symbol
    /// are tolerated.
    pub fn coerce(input: &str) -> Self {
        let cleaned: String = input
            .trim()
            .trim_start_matches(['$', '€', '£', '₹'])
            .chars()
            .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            return Self::ZERO;
        }

        let parsed = Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned));

        match parsed {
            Ok(amount) => Self::new(amount),
            Err(_) => Self::out_of_range(&cleaned),
        }
    }

    /// A finite number `Decimal` cannot hold: too large clamps to the
    /// maximum, too small or negative to zero
    fn out_of_range(cleaned: &str) -> Self {
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 1.0 => {
                tracing::debug!("Deal value {} exceeds the decimal range, clamping", cleaned);
                Self(Decimal::MAX)
            }
            _ => Self::ZERO,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for DealValue {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl fmt::Display for DealValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
