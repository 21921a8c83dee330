//! Append-only battle log
//!
//! Admin actions are grouped into a [`BattleBatch`]. Committing a batch that
//! recorded at least one change appends an immutable [`BattleEvent`] with the
//! next sequence number and the commit time.

use crate::types::{Adjustment, ParticipantName, Rating};
use crate::utils::{current_timestamp, generate_batch_id};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// A single rating change caused by a grade or a decay step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleLogEntry {
    pub name: ParticipantName,
    pub adjustment: Adjustment,
    /// Change actually applied, which differs from the nominal amount only at the `i64` bounds
    pub delta: Rating,
    pub rating_before: Rating,
    pub rating_after: Rating,
}

/// Committed, immutable group of entries from one admin batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleEvent {
    sequence: u64,
    timestamp: DateTime<Utc>,
    entries: Vec<BattleLogEntry>,
}

impl BattleEvent {
    /// 1-based position in the log
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn entries(&self) -> &[BattleLogEntry] {
        &self.entries
    }
}

/// In-progress buffer of entries for one admin batch
#[derive(Debug)]
pub struct BattleBatch {
    id: Uuid,
    opened_at: DateTime<Utc>,
    entries: Vec<BattleLogEntry>,
}

impl BattleBatch {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn record(&mut self, entry: BattleLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[BattleLogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new batch buffer
    pub fn begin_batch(&self) -> BattleBatch {
        let batch = BattleBatch {
            id: generate_batch_id(),
            opened_at: current_timestamp(),
            entries: Vec::new(),
        };
        debug!("Opened battle batch {}", batch.id);
        batch
    }

    /// Commit a batch. Empty batches produce no event and return `None`.
    pub fn commit(&mut self, batch: BattleBatch) -> Option<&BattleEvent> {
        if batch.is_empty() {
            debug!("Battle batch {} was empty, nothing committed", batch.id);
            return None;
        }

        let event = BattleEvent {
            sequence: self.events.len() as u64 + 1,
            timestamp: current_timestamp(),
            entries: batch.entries,
        };

        info!(
            "Committed battle #{} with {} entries (batch {})",
            event.sequence,
            event.entries.len(),
            batch.id
        );

        self.events.push(event);
        self.events.last()
    }

    /// All events in commit order
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn latest(&self) -> Option<&BattleEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
