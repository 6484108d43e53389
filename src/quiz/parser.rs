// src/quiz/parser.rs

use std::collections::HashSet;

use crate::{
    error::AppError,
    models::{
        difficulty::Difficulty,
        question::{Question, QuestionBank},
    },
    quiz::source::QuestionSource,
    utils::html::clean_html,
};

/// Reads and parses the bank for `difficulty`. Question order is the source order.
pub async fn load_bank(
    source: &dyn QuestionSource,
    difficulty: Difficulty,
) -> Result<QuestionBank, AppError> {
    let raw = source.read(difficulty).await?;
    parse_bank(difficulty, &raw)
}

/// Parses a question source.
///
/// Records are blocks of `key:value` lines separated by blank lines. Keys are
/// `text` (once), `option` (repeated, in order) and `answer` (once). The final
/// record does not need a trailing blank line.
pub fn parse_bank(difficulty: Difficulty, input: &str) -> Result<QuestionBank, AppError> {
    let mut questions = Vec::new();
    let mut record = RecordBuilder::default();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.trim().is_empty() {
            if let Some(question) = record.finish()? {
                questions.push(question);
            }
            record = RecordBuilder::default();
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(AppError::MalformedRecord {
                line: line_no,
                reason: format!("missing ':' separator in '{}'", line),
            });
        };

        record.push(line_no, key, value)?;
    }

    if let Some(question) = record.finish()? {
        questions.push(question);
    }

    if questions.is_empty() {
        return Err(AppError::EmptyBank(difficulty));
    }

    tracing::debug!("Parsed {} questions for '{}'", questions.len(), difficulty);

    Ok(QuestionBank {
        difficulty,
        questions,
    })
}

#[derive(Default)]
struct RecordBuilder {
    first_line: Option<usize>,
    text: Option<String>,
    options: Vec<String>,
    answer: Option<String>,
}

impl RecordBuilder {
    fn push(&mut self, line: usize, key: &str, value: &str) -> Result<(), AppError> {
        self.first_line.get_or_insert(line);

        match key {
            "text" => {
                if self.text.is_some() {
                    return Err(duplicate_key(line, key));
                }
                self.text = Some(value.to_string());
            }
            "option" => self.options.push(value.to_string()),
            "answer" => {
                if self.answer.is_some() {
                    return Err(duplicate_key(line, key));
                }
                self.answer = Some(value.to_string());
            }
            other => {
                tracing::warn!("Ignoring unknown key '{}' at line {}", other, line);
            }
        }
        Ok(())
    }

    /// `Ok(None)` when no line was seen since the last blank line.
    fn finish(self) -> Result<Option<Question>, AppError> {
        let Some(line) = self.first_line else {
            return Ok(None);
        };

        let text = self.text.as_deref().map(clean_html).unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AppError::MalformedRecord {
                line,
                reason: "record has no question text".to_string(),
            });
        }

        if self.options.len() < 2 {
            return Err(AppError::MalformedRecord {
                line,
                reason: format!("expected at least 2 options, found {}", self.options.len()),
            });
        }

        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(AppError::MalformedRecord {
                line,
                reason: "blank option".to_string(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.options.iter().find(|o| !seen.insert(o.as_str())) {
            return Err(AppError::MalformedRecord {
                line,
                reason: format!("duplicate option '{}'", dup),
            });
        }

        // A blank answer can never be submitted, so it counts as matching nothing.
        let answer = self.answer.unwrap_or_default();
        if answer.trim().is_empty() || !self.options.contains(&answer) {
            return Err(AppError::InconsistentAnswer { line, answer });
        }

        Ok(Some(Question {
            text,
            options: self.options,
            correct_answer: answer,
        }))
    }
}

fn duplicate_key(line: usize, key: &str) -> AppError {
    AppError::MalformedRecord {
        line,
        reason: format!("'{}' given more than once in the same record", key),
    }
}
