//! Rating system configuration

use crate::rating::tier::{default_bands, validate_bands, TierBand};
use crate::types::Rating;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Rating, placement and decay constants plus the tier bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating given to participants added from a name list
    pub default_rating: Rating,
    /// Placement battles a new participant starts with
    pub default_placements: u32,
    /// Points removed per decay step
    pub decay_amount: Rating,
    /// Consecutive missed battles after which decay stops applying
    pub decay_cap: u32,
    /// Ordered tier bands, first match wins
    pub tiers: Vec<TierBand>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_rating: 1000,
            default_placements: 2,
            decay_amount: 25,
            decay_cap: 2,
            tiers: default_bands(),
        }
    }
}

impl RatingConfig {
    /// Validate rating constants and tier bands
    pub fn validate(&self) -> Result<()> {
        if self.decay_amount < 0 {
            return Err(anyhow!(
                "Decay amount cannot be negative: {}",
                self.decay_amount
            ));
        }
        validate_bands(&self.tiers)?;
        Ok(())
    }
}
