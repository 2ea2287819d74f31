//! Tunable economy knobs.
//!
//! The closed-form formulas keep their constants in `career::state`; the
//! values here are the ones a live game retunes without a code change.

use serde::{Deserialize, Serialize};

use crate::career::state::{
    BOOST_PRICE, CONCERT_ENERGY_COST, MAX_OFFLINE_INTERVALS, MIXING_TIME_MS, ROYALTY_INTERVAL_MS,
};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Length of the mixing phase.
    pub mixing_time_ms: u64,
    /// Cash charged by the session before a boost.
    pub boost_price: u64,
    /// One royalty payout per elapsed interval.
    pub royalty_interval_ms: u64,
    /// Cap on payouts credited after a long absence.
    pub max_offline_intervals: u32,
    pub concert_energy_cost: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            mixing_time_ms: MIXING_TIME_MS,
            boost_price: BOOST_PRICE,
            royalty_interval_ms: ROYALTY_INTERVAL_MS,
            max_offline_intervals: MAX_OFFLINE_INTERVALS,
            concert_energy_cost: CONCERT_ENERGY_COST,
        }
    }
}

impl Tuning {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let tuning: Tuning = toml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        if self.royalty_interval_ms == 0 {
            return Err(Error::InvalidInput(
                "royalty_interval_ms must be greater than zero".into(),
            ));
        }
        if !self.concert_energy_cost.is_finite() || self.concert_energy_cost < 0.0 {
            return Err(Error::InvalidInput(format!(
                "concert_energy_cost must be non-negative, got {}",
                self.concert_energy_cost
            )));
        }
        Ok(())
    }
}
