//! Tabular roster import and export
//!
//! The CSV shape is `Name, ELO, Rank, Battles Missed, Placements Remaining`.
//! Rows are validated into [`RosterRow`] at the boundary; anything missing or
//! non-numeric becomes [`EloError::MalformedImportRow`] with its line number.

use crate::error::{EloError, EloResult};
use crate::rating::RatingEngine;
use crate::roster::RosterStore;
use crate::types::{ParticipantRecord, Rating};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};
use tracing::warn;

/// File name offered for roster downloads
pub const EXPORT_FILE_NAME: &str = "elo_data.csv";

const COLUMNS: [&str; 5] = [
    "Name",
    "ELO",
    "Rank",
    "Battles Missed",
    "Placements Remaining",
];

const REQUIRED_COLUMNS: [&str; 4] = ["Name", "ELO", "Battles Missed", "Placements Remaining"];

/// One roster line in tabular form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ELO")]
    pub elo: Rating,
    #[serde(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "Battles Missed")]
    pub battles_missed: u32,
    #[serde(rename = "Placements Remaining")]
    pub placements_remaining: u32,
}

impl From<&ParticipantRecord> for RosterRow {
    fn from(record: &ParticipantRecord) -> Self {
        Self {
            name: record.name.clone(),
            elo: record.rating,
            rank: record.tier.clone(),
            battles_missed: record.battles_missed,
            placements_remaining: record.placements_remaining,
        }
    }
}

/// Loosely typed row as it appears in the file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRosterRow {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "ELO")]
    elo: Option<String>,
    #[serde(rename = "Rank")]
    rank: Option<String>,
    #[serde(rename = "Battles Missed")]
    battles_missed: Option<String>,
    #[serde(rename = "Placements Remaining")]
    placements_remaining: Option<String>,
}

fn malformed(line: usize, reason: impl Into<String>) -> EloError {
    EloError::MalformedImportRow {
        line,
        reason: reason.into(),
    }
}

fn required(line: usize, column: &str, value: Option<String>) -> EloResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| malformed(line, format!("missing {}", column)))
}

/// Parse a whole number, accepting integral decimals such as `1000.0`
fn parse_whole(line: usize, column: &str, value: &str) -> EloResult<i64> {
    if let Ok(parsed) = value.parse::<i64>() {
        return Ok(parsed);
    }

    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed.fract() == 0.0 && parsed.abs() < 9.0e15 => {
            Ok(parsed as i64)
        }
        _ => Err(malformed(
            line,
            format!("{} is not a whole number: '{}'", column, value),
        )),
    }
}

fn parse_counter(line: usize, column: &str, value: &str) -> EloResult<u32> {
    let parsed = parse_whole(line, column, value)?;
    u32::try_from(parsed).map_err(|_| {
        malformed(
            line,
            format!("{} must be a non-negative integer: '{}'", column, value),
        )
    })
}

impl RosterRow {
    fn from_raw(raw: RawRosterRow, line: usize) -> EloResult<Self> {
        let name = required(line, "Name", raw.name)?;
        let elo = required(line, "ELO", raw.elo)?;
        let battles_missed = required(line, "Battles Missed", raw.battles_missed)?;
        let placements_remaining = required(line, "Placements Remaining", raw.placements_remaining)?;

        Ok(Self {
            name,
            elo: parse_whole(line, "ELO", &elo)?,
            rank: raw.rank.unwrap_or_default(),
            battles_missed: parse_counter(line, "Battles Missed", &battles_missed)?,
            placements_remaining: parse_counter(line, "Placements Remaining", &placements_remaining)?,
        })
    }
}

/// Read and validate every row. Fails on the first malformed row.
pub fn read_rows<R: Read>(reader: R) -> EloResult<Vec<RosterRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| malformed(1, e.to_string()))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(malformed(1, format!("missing {} column", column)));
        }
    }

    let mut rows: Vec<RosterRow> = Vec::new();
    let mut seen = HashSet::new();
    for (index, result) in reader.records().enumerate() {
        let fallback_line = index + 2;
        let record = result.map_err(|e| malformed(fallback_line, e.to_string()))?;
        let line = record
            .position()
            .map_or(fallback_line, |position| position.line() as usize);

        let raw: RawRosterRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(line, e.to_string()))?;
        let row = RosterRow::from_raw(raw, line)?;
        if !seen.insert(row.name.clone()) {
            return Err(malformed(
                line,
                format!("duplicate participant '{}'", row.name),
            ));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Write rows with a header line. The header is written even when there are
/// no rows so an empty export can be imported again.
pub fn write_rows<W: Write>(writer: W, rows: &[RosterRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer
        .write_record(COLUMNS)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row for '{}'", row.name))?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Roster in store order as tabular rows
pub fn roster_to_rows(roster: &RosterStore) -> Vec<RosterRow> {
    roster.iter().map(RosterRow::from).collect()
}

/// Turn imported rows into records. The tier is always recomputed from the
/// rating; a differing `Rank` column is reported and ignored.
pub fn rows_to_records(rows: Vec<RosterRow>, engine: &RatingEngine) -> Vec<ParticipantRecord> {
    rows.into_iter()
        .map(|row| {
            let mut record = ParticipantRecord {
                name: row.name,
                rating: row.elo,
                tier: String::new(),
                battles_missed: row.battles_missed,
                placements_remaining: row.placements_remaining,
            };
            engine.reclassify(&mut record);

            if !row.rank.is_empty() && row.rank != record.tier {
                warn!(
                    "Imported rank '{}' for '{}' does not match rating {}, using '{}'",
                    row.rank, record.name, record.rating, record.tier
                );
            }
            record
        })
        .collect()
}

/// Serialize the whole roster to CSV text
pub fn export_csv(roster: &RosterStore) -> Result<String> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, &roster_to_rows(roster))?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}
