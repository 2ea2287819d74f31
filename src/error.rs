//! Error type shared by every Flowify operation.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A numeric or text argument was out of range (NaN, negative, blank...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation does not apply to the current production / player state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("not enough cash: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("not enough energy: need {needed}, have {available}")]
    InsufficientEnergy { needed: f64, available: f64 },

    /// The city is above the player's level.
    #[error("{city} unlocks at level {level}")]
    Locked { city: &'static str, level: u32 },

    #[error("save error: {0}")]
    Save(String),

    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tuning file is not valid TOML: {0}")]
    Config(#[from] toml::de::Error),
}

/// Reject NaN, infinities and negative values.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{field} must be a finite non-negative number, got {value}"
        )))
    }
}

/// Reject anything outside `0..=100`.
pub(crate) fn ensure_percent(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{field} must be within 0..=100, got {value}"
        )))
    }
}
