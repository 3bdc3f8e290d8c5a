// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Subject model and difficulty levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty level of a subject.
///
/// Labels read back from storage that are not one of the three known levels
/// fall back to [`Difficulty::Easy`]; labels supplied by API clients are parsed
/// strictly through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Study hours budgeted for one subject at this level.
    pub fn hour_allowance(self) -> u64 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 35,
            Difficulty::Hard => 50,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a difficulty label outside Easy/Medium/Hard.
#[derive(Debug, thiserror::Error)]
#[error("Unknown difficulty '{0}': expected Easy, Medium or Hard")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::warn!(label = %label, "Unrecognized stored difficulty, using Easy");
            Difficulty::Easy
        })
    }
}

/// A topic a user studies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    /// Record ID (also used as document ID)
    pub id: u64,
    /// Owner
    pub user_id: u64,
    /// Display name, non-empty; not unique per user
    pub name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" Medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        let err = "Brutal".parse::<Difficulty>().unwrap_err();
        assert_eq!(err.0, "Brutal");
    }

    #[test]
    fn test_stored_unknown_label_falls_back_to_easy() {
        let subject: Subject = serde_json::from_str(
            r#"{"id": 1, "user_id": 2, "name": "Latin", "difficulty": "Legendary"}"#,
        )
        .unwrap();
        assert_eq!(subject.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_stored_missing_label_defaults_to_easy() {
        let subject: Subject =
            serde_json::from_str(r#"{"id": 1, "user_id": 2, "name": "Latin"}"#).unwrap();
        assert_eq!(subject.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"Hard\"");
    }
}
