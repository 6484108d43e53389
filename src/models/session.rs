// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        difficulty::Difficulty,
        question::{Question, QuestionBank},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Finished,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    /// True when the submitted answer was for the last question of the bank.
    pub is_final: bool,
    /// Score after this answer was applied.
    pub score: usize,
}

/// One player's play-through.
///
/// Owns its bank snapshot exclusively. `state` is `Finished` exactly when
/// `current_index == bank.len()`; both counters move together inside
/// [`Session::submit_answer`].
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    bank: QuestionBank,
    current_index: usize,
    score: usize,
    state: SessionState,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, bank: QuestionBank) -> Self {
        let now = Utc::now();
        let state = if bank.is_empty() {
            SessionState::Finished
        } else {
            SessionState::InProgress
        };

        Self {
            id,
            bank,
            current_index: 0,
            score: 0,
            state,
            started_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.bank.difficulty
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.bank.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.bank.questions
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn current_question(&self) -> Result<&Question, AppError> {
        if self.is_finished() {
            return Err(AppError::SessionFinished(self.id));
        }
        self.bank
            .questions
            .get(self.current_index)
            .ok_or(AppError::SessionFinished(self.id))
    }

    /// Scores `answer` against the current question and advances.
    ///
    /// The last question ends the session whether or not it was answered correctly.
    /// On error nothing is mutated.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, AppError> {
        if answer.trim().is_empty() {
            return Err(AppError::EmptyAnswer);
        }

        let question = self.current_question()?;
        let correct = question.is_correct(answer);
        let correct_answer = question.correct_answer.clone();
        let is_final = self.current_index + 1 == self.bank.len();

        if correct {
            self.score += 1;
        }
        self.current_index += 1;
        if is_final {
            self.state = SessionState::Finished;
        }

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            is_final,
            score: self.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], answer: &str) -> Question {
        Question {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: answer.to_string(),
        }
    }

    fn two_question_session() -> Session {
        let bank = QuestionBank {
            difficulty: Difficulty::Easy,
            questions: vec![
                question("Q1", &["A", "B", "C"], "B"),
                question("Q2", &["X", "Y"], "X"),
            ],
        };
        Session::new(Uuid::new_v4(), bank)
    }

    #[test]
    fn test_walkthrough_one_right_one_wrong() {
        let mut session = two_question_session();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.state(), SessionState::InProgress);

        let first = session.submit_answer("B").unwrap();
        assert!(first.correct);
        assert!(!first.is_final);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_question().unwrap().text, "Q2");

        let second = session.submit_answer("Y").unwrap();
        assert!(!second.correct);
        assert_eq!(second.correct_answer, "X");
        assert!(second.is_final);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.score(), 1);
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn test_empty_answer_leaves_session_untouched() {
        let mut session = two_question_session();
        assert!(matches!(session.submit_answer(""), Err(AppError::EmptyAnswer)));
        assert!(matches!(session.submit_answer("   "), Err(AppError::EmptyAnswer)));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_finished_session_rejects_answers_and_reads() {
        let mut session = two_question_session();
        session.submit_answer("A").unwrap();
        session.submit_answer("X").unwrap();

        assert!(matches!(
            session.submit_answer("X"),
            Err(AppError::SessionFinished(_))
        ));
        assert!(matches!(
            session.current_question(),
            Err(AppError::SessionFinished(_))
        ));
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_empty_answer_checked_before_finished() {
        let mut session = two_question_session();
        session.submit_answer("B").unwrap();
        session.submit_answer("X").unwrap();
        assert!(matches!(session.submit_answer(""), Err(AppError::EmptyAnswer)));
    }

    #[test]
    fn test_answer_comparison_is_exact() {
        let mut session = two_question_session();
        let outcome = session.submit_answer("b").unwrap();
        assert!(!outcome.correct);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let session = two_question_session();
        let a = session.current_question().unwrap().clone();
        let b = session.current_question().unwrap().clone();
        assert_eq!(a, b);
        assert_eq!(session.score(), session.score());
    }

    #[test]
    fn test_score_monotonic_and_finishes_after_exactly_n_answers() {
        let bank = QuestionBank {
            difficulty: Difficulty::Hard,
            questions: (0..5)
                .map(|i| question(&format!("Q{}", i), &["yes", "no"], "yes"))
                .collect(),
        };
        let mut session = Session::new(Uuid::new_v4(), bank);
        let answers = ["yes", "no", "yes", "yes", "no"];

        let mut previous = 0;
        for (i, answer) in answers.iter().enumerate() {
            assert!(!session.is_finished());
            let outcome = session.submit_answer(answer).unwrap();
            let expected_gain = usize::from(*answer == "yes");
            assert_eq!(outcome.score, previous + expected_gain);
            assert_eq!(outcome.is_final, i == answers.len() - 1);
            previous = outcome.score;
        }

        assert!(session.is_finished());
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn test_empty_bank_is_born_finished() {
        let bank = QuestionBank {
            difficulty: Difficulty::Easy,
            questions: Vec::new(),
        };
        let session = Session::new(Uuid::new_v4(), bank);
        assert!(session.is_finished());
        assert_eq!(session.current_index(), session.total());
    }
}
