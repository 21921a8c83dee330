//! In-memory roster store
//!
//! Participant records keyed by unique name. Backed by an [`IndexMap`] so
//! lookups are O(1) and exports come out in insertion order.

use crate::error::{EloError, EloResult};
use crate::types::{LeaderboardRow, ParticipantName, ParticipantRecord};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterStore {
    records: IndexMap<ParticipantName, ParticipantRecord>,
}

/// Names are stored trimmed, matching how CSV import reads them back
fn validate_name(name: &str) -> EloResult<()> {
    if name.trim().is_empty() || name.trim() != name {
        return Err(EloError::InvalidParticipantName);
    }
    Ok(())
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Look up a participant by exact name
    pub fn get(&self, name: &str) -> EloResult<&ParticipantRecord> {
        self.records
            .get(name)
            .ok_or_else(|| EloError::UnknownParticipant {
                name: name.to_string(),
            })
    }

    /// Mutable lookup, reserved for the rating engine so tiers stay in sync
    pub(crate) fn get_mut(&mut self, name: &str) -> EloResult<&mut ParticipantRecord> {
        self.records
            .get_mut(name)
            .ok_or_else(|| EloError::UnknownParticipant {
                name: name.to_string(),
            })
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut ParticipantRecord> {
        self.records.values_mut()
    }

    /// Records in store order
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.records.values()
    }

    /// Insert a new participant. Names must be non-empty, trimmed and unique.
    pub fn insert(&mut self, record: ParticipantRecord) -> EloResult<()> {
        validate_name(&record.name)?;
        if self.records.contains_key(&record.name) {
            return Err(EloError::DuplicateParticipant { name: record.name });
        }

        debug!(
            "Inserted participant '{}' at {} ({})",
            record.name, record.rating, record.tier
        );
        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    /// Replace the whole roster. Either every record is accepted or the
    /// store is left unchanged.
    pub fn replace_all(&mut self, records: Vec<ParticipantRecord>) -> EloResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            validate_name(&record.name)?;
            if !seen.insert(record.name.as_str()) {
                return Err(EloError::DuplicateParticipant {
                    name: record.name.clone(),
                });
            }
        }

        let previous = self.records.len();
        self.records = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();

        info!(
            "Roster replaced: {} participants (previously {})",
            self.records.len(),
            previous
        );
        Ok(())
    }

    /// Add every name not already present, building records with `make_record`.
    /// Names are trimmed first. Existing participants are left untouched and
    /// blank names are skipped.
    /// Returns the names that were actually inserted, in order.
    pub fn add_missing<I, S, F>(&mut self, names: I, mut make_record: F) -> Vec<ParticipantName>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> ParticipantRecord,
    {
        let mut added = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                debug!("Skipping blank participant name");
                continue;
            }
            if self.records.contains_key(name) {
                debug!("Participant '{}' already on roster, leaving untouched", name);
                continue;
            }

            let record = make_record(name);
            self.records.insert(name.to_string(), record);
            added.push(name.to_string());
        }

        if !added.is_empty() {
            info!("Added {} new participants to roster", added.len());
        }
        added
    }

    /// Leaderboard projection: rating descending, ties alphabetical by name
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self.records.values().map(LeaderboardRow::from).collect();
        rows.sort_by(|a, b| b.elo.cmp(&a.elo).then_with(|| a.name.cmp(&b.name)));
        rows
    }
}
