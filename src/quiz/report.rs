// src/quiz/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{difficulty::Difficulty, session::Session};

/// Read-only score snapshot of a session, finished or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub session_id: Uuid,
    pub difficulty: Difficulty,
    pub score: usize,
    pub total: usize,
    /// Number of questions answered so far.
    pub answered: usize,
    pub finished: bool,
    pub started_at: DateTime<Utc>,
}

impl From<&Session> for ScoreReport {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            difficulty: session.difficulty(),
            score: session.score(),
            total: session.total(),
            answered: session.current_index(),
            finished: session.is_finished(),
            started_at: session.started_at,
        }
    }
}
