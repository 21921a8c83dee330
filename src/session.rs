//! Rating session
//!
//! [`EloSession`] owns the roster, the battle log and the rating engine. It
//! is the explicit state object every admin action goes through; there is no
//! process-wide state, so independent sessions can run side by side.

use crate::config::RatingConfig;
use crate::error::{EloError, EloResult};
use crate::history::{BattleLog, BattleLogEntry};
use crate::import::csv::{read_rows, rows_to_records, roster_to_rows, RosterRow};
use crate::import::names::extract_names;
use crate::rating::RatingEngine;
use crate::roster::RosterStore;
use crate::types::{BattleResult, LeaderboardRow, ParticipantName};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::{info, warn};

/// A result that could not be applied within a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionFailure {
    pub name: ParticipantName,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip)]
    pub error: EloError,
}

impl ActionFailure {
    fn new(name: &str, error: EloError) -> Self {
        Self {
            name: name.to_string(),
            kind: error.kind(),
            message: error.to_string(),
            error,
        }
    }
}

/// Outcome of one admin batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Changes applied, in order
    pub applied: Vec<BattleLogEntry>,
    /// Results that were rejected; earlier changes are kept regardless
    pub failures: Vec<ActionFailure>,
    /// Sequence number of the committed battle, if anything changed
    pub battle: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EloSession {
    roster: RosterStore,
    log: BattleLog,
    engine: RatingEngine,
}

impl EloSession {
    pub fn new(engine: RatingEngine) -> Self {
        Self {
            roster: RosterStore::new(),
            log: BattleLog::new(),
            engine,
        }
    }

    /// Create a session from rating configuration
    pub fn with_config(config: RatingConfig) -> EloResult<Self> {
        Ok(Self::new(RatingEngine::new(config)?))
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    /// Run one admin batch: every result in order, then optionally a decay
    /// step across the whole roster. A rejected result is reported and the
    /// rest of the batch still applies. The batch is committed to the log
    /// only if something changed.
    pub fn run_battle(&mut self, results: &[BattleResult], decay: bool) -> BatchOutcome {
        let mut batch = self.log.begin_batch();
        let mut outcome = BatchOutcome::default();

        for result in results {
            match self.engine.apply_grade_label(
                &mut self.roster,
                &mut batch,
                &result.name,
                &result.grade,
            ) {
                Ok(entry) => outcome.applied.push(entry),
                Err(error) => {
                    warn!(
                        "Could not apply '{}' to '{}': {}",
                        result.grade, result.name, error
                    );
                    outcome.failures.push(ActionFailure::new(&result.name, error));
                }
            }
        }

        if decay {
            let decayed = self.engine.apply_decay(&mut self.roster, &mut batch);
            info!("Decay applied to {} participants", decayed.len());
            outcome.applied.extend(decayed);
        }

        outcome.battle = self.log.commit(batch).map(|event| event.sequence());
        outcome
    }

    /// Decay-only batch
    pub fn apply_decay(&mut self) -> BatchOutcome {
        self.run_battle(&[], true)
    }

    /// Replace the roster with validated rows. Nothing changes on error.
    ///
    /// Rows are numbered as they would appear in a CSV file with a header.
    pub fn import_rows(&mut self, rows: Vec<RosterRow>) -> EloResult<usize> {
        let mut seen = HashSet::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let line = index + 2;
            if row.name.trim().is_empty() {
                return Err(EloError::MalformedImportRow {
                    line,
                    reason: "missing Name".to_string(),
                });
            }
            if row.name.trim() != row.name {
                return Err(EloError::MalformedImportRow {
                    line,
                    reason: format!("Name has surrounding whitespace: '{}'", row.name),
                });
            }
            if !seen.insert(row.name.as_str()) {
                return Err(EloError::MalformedImportRow {
                    line,
                    reason: format!("duplicate participant '{}'", row.name),
                });
            }
        }

        let records = rows_to_records(rows, &self.engine);
        let count = records.len();
        self.roster.replace_all(records)?;
        info!("Imported {} participants from table", count);
        Ok(count)
    }

    /// Parse CSV and replace the roster
    pub fn import_csv<R: Read>(&mut self, reader: R) -> EloResult<usize> {
        let rows = read_rows(reader)?;
        self.import_rows(rows)
    }

    /// Add names not yet on the roster with default ratings
    pub fn import_names<I, S>(&mut self, names: I) -> Vec<ParticipantName>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let engine = &self.engine;
        self.roster
            .add_missing(names, |name| engine.new_participant(name))
    }

    /// Add names from extracted text, one per non-blank line
    pub fn import_extracted_text(&mut self, text: &str) -> Vec<ParticipantName> {
        self.import_names(extract_names(text))
    }

    pub fn export_rows(&self) -> Vec<RosterRow> {
        roster_to_rows(&self.roster)
    }

    pub fn export_csv(&self) -> Result<String> {
        crate::import::csv::export_csv(&self.roster)
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        self.roster.leaderboard()
    }
}
