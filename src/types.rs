//! Common types used throughout the rating service

use crate::error::EloError;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

/// Unique, case-sensitive participant name
pub type ParticipantName = String;

/// Participant rating ("ELO"). Whole points only, so every rating falls
/// into exactly one inclusive tier band.
pub type Rating = i64;

/// Categorical battle outcome assigned by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Red,
    Orange,
    White,
    Green,
    Brown,
    Winner,
}

impl Grade {
    /// Every grade, in the order admins pick from
    pub const ALL: [Grade; 6] = [
        Grade::Red,
        Grade::Orange,
        Grade::White,
        Grade::Green,
        Grade::Brown,
        Grade::Winner,
    ];

    /// Fixed rating delta for this grade
    pub fn delta(self) -> Rating {
        match self {
            Grade::Red => 50,
            Grade::Orange => 25,
            Grade::White => 0,
            Grade::Green => -25,
            Grade::Brown => -50,
            Grade::Winner => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Red => "Red",
            Grade::Orange => "Orange",
            Grade::White => "White",
            Grade::Green => "Green",
            Grade::Brown => "Brown",
            Grade::Winner => "Winner",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grade {
    type Err = EloError;

    /// Grade labels are matched exactly, the same way admins see them
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|grade| grade.as_str() == s)
            .ok_or_else(|| EloError::InvalidGrade {
                grade: s.to_string(),
            })
    }
}

/// What caused a rating change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    Grade(Grade),
    Decay,
}

impl Adjustment {
    pub fn label(&self) -> &'static str {
        match self {
            Adjustment::Grade(grade) => grade.as_str(),
            Adjustment::Decay => "Decay",
        }
    }
}

impl std::fmt::Display for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Adjustment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Current rating state of one roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub name: ParticipantName,
    pub rating: Rating,
    /// Always the classifier's label for `rating`
    pub tier: String,
    pub battles_missed: u32,
    pub placements_remaining: u32,
}

/// Public leaderboard line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    #[serde(rename = "Name")]
    pub name: ParticipantName,
    #[serde(rename = "ELO")]
    pub elo: Rating,
    #[serde(rename = "Rank")]
    pub rank: String,
}

impl From<&ParticipantRecord> for LeaderboardRow {
    fn from(record: &ParticipantRecord) -> Self {
        Self {
            name: record.name.clone(),
            elo: record.rating,
            rank: record.tier.clone(),
        }
    }
}

/// One admin-submitted result inside a battle batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub name: ParticipantName,
    /// Raw grade label, validated when the result is applied
    pub grade: String,
}

impl BattleResult {
    pub fn new(name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grade: grade.into(),
        }
    }
}
