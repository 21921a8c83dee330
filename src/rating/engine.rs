//! Rating engine
//!
//! Applies grades and decay to roster records. Every mutation recomputes the
//! tier from the new rating and records a [`BattleLogEntry`] in the batch
//! that is currently open.

use crate::config::RatingConfig;
use crate::error::{EloError, EloResult};
use crate::history::{BattleBatch, BattleLogEntry};
use crate::rating::tier::TierClassifier;
use crate::roster::RosterStore;
use crate::types::{Adjustment, Grade, ParticipantRecord};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RatingEngine {
    config: RatingConfig,
    classifier: TierClassifier,
}

impl RatingEngine {
    /// Create an engine, validating the configured tier bands
    pub fn new(config: RatingConfig) -> EloResult<Self> {
        if config.decay_amount < 0 {
            return Err(EloError::ConfigurationError {
                message: format!("Decay amount cannot be negative: {}", config.decay_amount),
            });
        }
        let classifier = TierClassifier::new(config.tiers.clone())?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    /// Fresh record with the configured defaults
    pub fn new_participant(&self, name: &str) -> ParticipantRecord {
        let rating = self.config.default_rating;
        ParticipantRecord {
            name: name.to_string(),
            rating,
            tier: self.classifier.classify(rating).to_string(),
            battles_missed: 0,
            placements_remaining: self.config.default_placements,
        }
    }

    /// Bring a record's tier back in line with its rating
    pub fn reclassify(&self, record: &mut ParticipantRecord) {
        record.tier = self.classifier.classify(record.rating).to_string();
    }

    /// Apply a grade given by its label. The participant is resolved before
    /// the label is validated.
    pub fn apply_grade_label(
        &self,
        roster: &mut RosterStore,
        batch: &mut BattleBatch,
        name: &str,
        grade: &str,
    ) -> EloResult<BattleLogEntry> {
        roster.get(name)?;
        let grade: Grade = grade.parse()?;
        self.apply_grade(roster, batch, name, grade)
    }

    /// Score one participant in a battle.
    ///
    /// Adds the grade's delta, spends one placement (never below zero),
    /// resets the missed-battle counter and reclassifies the tier.
    pub fn apply_grade(
        &self,
        roster: &mut RosterStore,
        batch: &mut BattleBatch,
        name: &str,
        grade: Grade,
    ) -> EloResult<BattleLogEntry> {
        let record = roster.get_mut(name)?;

        let rating_before = record.rating;
        record.rating = record.rating.saturating_add(grade.delta());
        record.placements_remaining = record.placements_remaining.saturating_sub(1);
        record.battles_missed = 0;
        self.reclassify(record);

        debug!(
            "{} -> '{}': {} -> {} ({}), {} placements left",
            grade,
            record.name,
            rating_before,
            record.rating,
            record.tier,
            record.placements_remaining
        );

        let entry = BattleLogEntry {
            name: record.name.clone(),
            adjustment: Adjustment::Grade(grade),
            delta: record.rating - rating_before,
            rating_before,
            rating_after: record.rating,
        };
        batch.record(entry.clone());
        Ok(entry)
    }

    /// Apply one decay step to the whole roster.
    ///
    /// Participants below the missed-battle cap lose `decay_amount` and gain a
    /// miss; participants at the cap are skipped.
    pub fn apply_decay(
        &self,
        roster: &mut RosterStore,
        batch: &mut BattleBatch,
    ) -> Vec<BattleLogEntry> {
        let amount = self.config.decay_amount;
        let mut entries = Vec::new();

        for record in roster.records_mut() {
            if record.battles_missed >= self.config.decay_cap {
                continue;
            }

            let rating_before = record.rating;
            record.rating = record.rating.saturating_sub(amount);
            record.battles_missed += 1;
            self.reclassify(record);

            debug!(
                "Decay -> '{}': {} -> {} ({}), missed {}",
                record.name, rating_before, record.rating, record.tier, record.battles_missed
            );

            entries.push(BattleLogEntry {
                name: record.name.clone(),
                adjustment: Adjustment::Decay,
                delta: record.rating - rating_before,
                rating_before,
                rating_after: record.rating,
            });
        }

        for entry in &entries {
            batch.record(entry.clone());
        }
        entries
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
            classifier: TierClassifier::default(),
        }
    }
}
