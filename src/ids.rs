//! Identifier and amount normalization
//!
//! Group and member ids arrive as strings or integers and are normalized into
//! a single string-backed [`Identifier`]. Numeric arguments arrive as integers
//! or floats and are normalized into whole, non-negative amounts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Raw identifier as handed to the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum IdInput {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl From<&str> for IdInput {
    fn from(value: &str) -> Self {
        IdInput::Text(value.to_string())
    }
}

impl From<String> for IdInput {
    fn from(value: String) -> Self {
        IdInput::Text(value)
    }
}

impl From<&String> for IdInput {
    fn from(value: &String) -> Self {
        IdInput::Text(value.clone())
    }
}

impl From<&Identifier> for IdInput {
    fn from(value: &Identifier) -> Self {
        IdInput::Text(value.0.clone())
    }
}

impl From<Identifier> for IdInput {
    fn from(value: Identifier) -> Self {
        IdInput::Text(value.0)
    }
}

impl From<i32> for IdInput {
    fn from(value: i32) -> Self {
        IdInput::Signed(value as i64)
    }
}

impl From<i64> for IdInput {
    fn from(value: i64) -> Self {
        IdInput::Signed(value)
    }
}

impl From<u32> for IdInput {
    fn from(value: u32) -> Self {
        IdInput::Unsigned(value as u64)
    }
}

impl From<u64> for IdInput {
    fn from(value: u64) -> Self {
        IdInput::Unsigned(value)
    }
}

impl From<usize> for IdInput {
    fn from(value: usize) -> Self {
        IdInput::Unsigned(value as u64)
    }
}

impl From<f64> for IdInput {
    fn from(value: f64) -> Self {
        IdInput::Float(value)
    }
}

/// A validated, normalized group or member id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parse a raw id. `field` names the argument in error messages.
    ///
    /// Empty strings and the integer `0` count as missing. Floats are accepted
    /// only when they hold a whole number.
    pub fn parse(input: impl Into<IdInput>, field: &'static str) -> Result<Self> {
        match input.into() {
            IdInput::Text(text) => {
                if text.trim().is_empty() {
                    Err(LedgerError::MissingArgument { field })
                } else {
                    Ok(Identifier(text))
                }
            }
            IdInput::Signed(0) | IdInput::Unsigned(0) => {
                Err(LedgerError::MissingArgument { field })
            }
            IdInput::Signed(n) => Ok(Identifier(n.to_string())),
            IdInput::Unsigned(n) => Ok(Identifier(n.to_string())),
            IdInput::Float(f) => {
                if f == 0.0 {
                    Err(LedgerError::MissingArgument { field })
                } else if !f.is_finite() || f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                    Err(LedgerError::invalid(field, format!("{} is not a usable id", f)))
                } else {
                    Ok(Identifier((f as i64).to_string()))
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw numeric argument (xp or level amount)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl From<i32> for NumericInput {
    fn from(value: i32) -> Self {
        NumericInput::Signed(value as i64)
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Signed(value)
    }
}

impl From<u32> for NumericInput {
    fn from(value: u32) -> Self {
        NumericInput::Unsigned(value as u64)
    }
}

impl From<u64> for NumericInput {
    fn from(value: u64) -> Self {
        NumericInput::Unsigned(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Float(value)
    }
}

/// Normalize an add/subtract amount: `floor(abs(n))`.
pub fn magnitude(input: impl Into<NumericInput>, field: &'static str) -> Result<u64> {
    match input.into() {
        NumericInput::Signed(n) => Ok(n.unsigned_abs()),
        NumericInput::Unsigned(n) => Ok(n),
        NumericInput::Float(f) => {
            if !f.is_finite() {
                return Err(LedgerError::invalid(field, format!("{} is not a finite number", f)));
            }
            Ok(f.abs().floor() as u64)
        }
    }
}

/// Normalize an absolute xp or level value. Negative values are rejected.
pub fn non_negative(input: impl Into<NumericInput>, field: &'static str) -> Result<u64> {
    match input.into() {
        NumericInput::Signed(n) if n < 0 => {
            Err(LedgerError::invalid(field, format!("{} is negative", n)))
        }
        NumericInput::Float(f) if f < 0.0 => {
            Err(LedgerError::invalid(field, format!("{} is negative", f)))
        }
        other => magnitude(other, field),
    }
}
