// src/models/difficulty.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Difficulty tier of a quiz. Each tier is backed by its own question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Average,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Average, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Average => "average",
            Difficulty::Hard => "hard",
        }
    }

    /// File name of the question source for this tier, e.g. `questions_easy.txt`.
    pub fn file_name(&self) -> String {
        format!("questions_{}.txt", self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    /// Case-insensitive. `facile` is accepted as an alias of `easy`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "facile" => Ok(Difficulty::Easy),
            "average" => Ok(Difficulty::Average),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(AppError::InvalidDifficulty(s.to_string())),
        }
    }
}
