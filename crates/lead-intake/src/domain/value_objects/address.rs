//! Address Value Object
//!
//! Postal address captured on the intake form. Fields stay free text while
//! the draft is edited; only `country` is required at submit time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Draft address
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Address {
    /// Replace one field
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::Country => self.country = value,
            AddressField::Street => self.street = value,
            AddressField::City => self.city = value,
            AddressField::State => self.state = value,
            AddressField::PostalCode => self.postal_code = value,
        }
    }

    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Country => &self.country,
            AddressField::Street => &self.street,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::PostalCode => &self.postal_code,
        }
    }

    pub fn has_country(&self) -> bool {
        !self.country.trim().is_empty()
    }

    /// Format the non-empty parts as a single line
    pub fn single_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.postal_code, &self.country]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.single_line())
    }
}

/// Addressable fields of [`Address`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Country,
    Street,
    City,
    State,
    PostalCode,
}

impl FromStr for AddressField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "country" => Ok(Self::Country),
            "street" => Ok(Self::Street),
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            "postal_code" | "postalcode" | "zip" => Ok(Self::PostalCode),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Field name that does not exist on the targeted section
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);
