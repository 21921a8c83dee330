//! Tier classification
//!
//! Maps a rating onto a tier label using ordered, inclusive threshold bands.
//! The first band whose range contains the rating wins; the last band is
//! unbounded above. Ratings below every band fall back to [`UNRANKED`].

use crate::error::{EloError, EloResult};
use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Label for ratings that fall outside every configured band
pub const UNRANKED: &str = "Unranked";

/// A single tier band, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub label: String,
    pub min: Rating,
    /// `None` means unbounded above
    #[serde(default)]
    pub max: Option<Rating>,
}

impl TierBand {
    pub fn new(label: impl Into<String>, min: Rating, max: Option<Rating>) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    /// Check whether a rating falls inside this band
    pub fn contains(&self, rating: Rating) -> bool {
        rating >= self.min && self.max.map_or(true, |max| rating <= max)
    }
}

/// Default season bands
pub fn default_bands() -> Vec<TierBand> {
    vec![
        TierBand::new("bamboo", 0, Some(999)),
        TierBand::new("serum2", 1000, Some(1099)),
        TierBand::new("more", 1100, Some(1199)),
        TierBand::new("plat", 1200, Some(1299)),
        TierBand::new("nork", 1300, Some(1399)),
        TierBand::new("headliner", 1400, None),
    ]
}

/// Validate that bands are non-empty, contiguous, non-overlapping and that
/// only the final band is unbounded.
pub fn validate_bands(bands: &[TierBand]) -> EloResult<()> {
    let invalid = |message: String| EloError::ConfigurationError { message };

    let Some(last) = bands.last() else {
        return Err(invalid("At least one tier band is required".to_string()));
    };

    if last.max.is_some() {
        return Err(invalid(format!(
            "Final tier band '{}' must be unbounded above",
            last.label
        )));
    }

    for (index, band) in bands.iter().enumerate() {
        if band.label.trim().is_empty() {
            return Err(invalid(format!("Tier band {} has an empty label", index)));
        }
        if band.label == UNRANKED {
            return Err(invalid(format!("'{}' is reserved", UNRANKED)));
        }

        let Some(next) = bands.get(index + 1) else {
            break;
        };

        let max = band.max.ok_or_else(|| {
            invalid(format!(
                "Only the final tier band may be unbounded, '{}' is not last",
                band.label
            ))
        })?;

        if max < band.min {
            return Err(invalid(format!(
                "Tier band '{}' has max {} below min {}",
                band.label, max, band.min
            )));
        }

        if max.checked_add(1) != Some(next.min) {
            return Err(invalid(format!(
                "Tier bands '{}' and '{}' are not contiguous ({} then {})",
                band.label, next.label, max, next.min
            )));
        }
    }

    Ok(())
}

/// Ordered band classifier
#[derive(Debug, Clone)]
pub struct TierClassifier {
    bands: Vec<TierBand>,
}

impl TierClassifier {
    /// Create a classifier from validated bands
    pub fn new(bands: Vec<TierBand>) -> EloResult<Self> {
        validate_bands(&bands)?;
        Ok(Self { bands })
    }

    /// Tier label for a rating. Total over every rating.
    pub fn classify(&self, rating: Rating) -> &str {
        self.bands
            .iter()
            .find(|band| band.contains(rating))
            .map(|band| band.label.as_str())
            .unwrap_or(UNRANKED)
    }

    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self {
            bands: default_bands(),
        }
    }
}
