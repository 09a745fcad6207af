//! Data-cap input parsing and display.
//!
//! A cap is a byte count. The edit field accepts a finite non-negative
//! number; an empty field clears the cap.

use thiserror::Error;

/// What a cap edit asks the backend to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapInput {
    /// Remove the cap (`data_cap: null`).
    Clear,
    /// Set the cap to this many bytes.
    Set(u64),
}

impl CapInput {
    /// The value sent as `data_cap`.
    pub fn as_option(self) -> Option<u64> {
        match self {
            Self::Clear => None,
            Self::Set(bytes) => Some(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapError {
    #[error("Data cap must be a number of bytes, got {0:?}")]
    NotANumber(String),

    #[error("Data cap cannot be negative, got {0:?}")]
    Negative(String),

    #[error("Data cap must be finite, got {0:?}")]
    NotFinite(String),

    #[error("Data cap is too large: {0:?}")]
    TooLarge(String),
}

/// Validate a cap edit. Never touches the network.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn parse_cap(raw: &str) -> Result<CapInput, CapError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(CapInput::Clear);
    }

    // Exact path for plain integers so large byte counts don't go through f64.
    if let Ok(bytes) = trimmed.parse::<u64>() {
        return Ok(CapInput::Set(bytes));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| CapError::NotANumber(raw.to_owned()))?;

    if !value.is_finite() {
        return Err(CapError::NotFinite(raw.to_owned()));
    }
    if value < 0.0 {
        return Err(CapError::Negative(raw.to_owned()));
    }
    if value >= u64::MAX as f64 {
        return Err(CapError::TooLarge(raw.to_owned()));
    }

    Ok(CapInput::Set(value.trunc() as u64))
}

/// `"<n> bytes"` or `"No cap"`.
pub fn format_cap(cap: Option<u64>) -> String {
    cap.map_or_else(|| "No cap".to_owned(), |bytes| format!("{bytes} bytes"))
}
