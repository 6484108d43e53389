// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::models::difficulty::Difficulty;

/// A single multiple-choice question as loaded from a question source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt shown to the player, as sanitized HTML: inline markup is kept
    /// and `&`, `<`, `>` in plain text arrive entity-escaped.
    pub text: String,

    /// Distinct choices, at least two. Order is shuffled once per session.
    pub options: Vec<String>,

    /// Always equal to exactly one entry of `options`. Compared by value, never by position.
    pub correct_answer: String,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Builds the answer-free view of this question.
    /// `number` is 1-based.
    pub fn to_public(&self, number: usize, total: usize) -> PublicQuestion {
        PublicQuestion {
            number,
            total,
            text: self.text.clone(),
            options: self.options.clone(),
        }
    }
}

/// DTO for sending a question to the client (excludes the correct answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
}

/// The questions of one difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
