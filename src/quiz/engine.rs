// src/quiz/engine.rs

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        difficulty::Difficulty,
        question::{PublicQuestion, QuestionBank},
        session::{AnswerOutcome, Session},
    },
    quiz::{
        parser::load_bank, report::ScoreReport, shuffle::shuffle_bank, source::QuestionSource,
        store::SessionStore,
    },
};

/// Response payload for a freshly started session.
#[derive(Debug, Clone, Serialize)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub difficulty: Difficulty,
    pub total: usize,
    pub question: PublicQuestion,
}

/// Entry point for every quiz operation. Sessions are addressed by id only.
pub struct QuizEngine {
    source: Arc<dyn QuestionSource>,
    store: SessionStore,
    /// Parsed, unshuffled banks. Only populated when caching is enabled; never mutated
    /// in place, every session shuffles its own copy.
    cache: Option<DashMap<Difficulty, Arc<QuestionBank>>>,
}

impl QuizEngine {
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            store: SessionStore::new(),
            cache: None,
        }
    }

    pub fn with_bank_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(DashMap::new);
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Loads and shuffles a fresh bank for `difficulty` and opens a session on it.
    pub async fn start(&self, difficulty: &str) -> Result<StartedSession, AppError> {
        let difficulty: Difficulty = difficulty.parse()?;

        let mut bank = self.bank_for(difficulty).await?;
        shuffle_bank(&mut bank);

        let session = Session::new(Uuid::new_v4(), bank);
        let question = public_question(&session)?;
        let started = StartedSession {
            session_id: session.id(),
            difficulty,
            total: session.total(),
            question,
        };

        self.store.create(session);
        tracing::info!(
            session = %started.session_id,
            difficulty = %difficulty,
            "Quiz session started with {} questions",
            started.total
        );

        Ok(started)
    }

    pub fn current_question(&self, id: &Uuid) -> Result<PublicQuestion, AppError> {
        self.store.read(id, public_question)?
    }

    /// Not idempotent: every accepted call advances the session.
    pub fn submit_answer(&self, id: &Uuid, answer: &str) -> Result<AnswerOutcome, AppError> {
        let outcome = self.store.mutate(id, |session| session.submit_answer(answer))?;
        if outcome.is_final {
            tracing::info!(session = %id, "Quiz session finished with score {}", outcome.score);
        }
        Ok(outcome)
    }

    pub fn score(&self, id: &Uuid) -> Result<usize, AppError> {
        self.store.read(id, Session::score)
    }

    pub fn report(&self, id: &Uuid) -> Result<ScoreReport, AppError> {
        self.store.read(id, |session| ScoreReport::from(session))
    }

    pub fn end(&self, id: &Uuid) -> Result<(), AppError> {
        self.store.delete(id)?;
        tracing::debug!(session = %id, "Quiz session ended by client");
        Ok(())
    }

    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.store.evict_idle(Utc::now(), max_idle)
    }

    async fn bank_for(&self, difficulty: Difficulty) -> Result<QuestionBank, AppError> {
        let Some(cache) = &self.cache else {
            return load_bank(self.source.as_ref(), difficulty).await;
        };

        if let Some(bank) = cache.get(&difficulty) {
            return Ok(QuestionBank::clone(&bank));
        }

        let bank = load_bank(self.source.as_ref(), difficulty).await?;
        cache.insert(difficulty, Arc::new(bank.clone()));
        tracing::debug!("Cached question bank for '{}'", difficulty);
        Ok(bank)
    }
}

fn public_question(session: &Session) -> Result<PublicQuestion, AppError> {
    let question = session.current_question()?;
    Ok(question.to_public(session.current_index() + 1, session.total()))
}

/// Periodically drops sessions idle for longer than `max_idle`. Runs until the task is aborted.
pub async fn run_session_reaper(engine: Arc<QuizEngine>, every: Duration, max_idle: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        let evicted = engine.evict_idle(max_idle);
        if evicted > 0 {
            tracing::info!(
                "Evicted {} idle sessions, {} remaining",
                evicted,
                engine.store().len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::session::SessionState, quiz::source::StaticSource};

    const EASY: &str = "\
text:Q1
option:A
option:B
option:C
answer:B

text:Q2
option:X
option:Y
answer:X
";

    fn engine() -> QuizEngine {
        let source = StaticSource::new().with_bank(Difficulty::Easy, EASY);
        QuizEngine::new(Arc::new(source))
    }

    fn correct_for(text: &str) -> &'static str {
        if text == "Q1" { "B" } else { "X" }
    }

    fn wrong_for(text: &str) -> &'static str {
        if text == "Q1" { "C" } else { "Y" }
    }

    #[tokio::test]
    async fn test_play_through_right_then_wrong() {
        let engine = engine();
        let started = engine.start("easy").await.unwrap();
        assert_eq!(started.total, 2);
        assert_eq!(started.question.number, 1);
        let id = started.session_id;

        let first = engine.current_question(&id).unwrap();
        assert_eq!(first, started.question);

        let outcome = engine.submit_answer(&id, correct_for(&first.text)).unwrap();
        assert!(outcome.correct);
        assert!(!outcome.is_final);
        assert_eq!(engine.score(&id).unwrap(), 1);

        let second = engine.current_question(&id).unwrap();
        assert_eq!(second.number, 2);
        assert_ne!(second.text, first.text);

        let outcome = engine.submit_answer(&id, wrong_for(&second.text)).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer, correct_for(&second.text));
        assert!(outcome.is_final);

        let snapshot = engine.store().get(&id).unwrap();
        assert_eq!(snapshot.state(), SessionState::Finished);

        let report = engine.report(&id).unwrap();
        assert_eq!((report.score, report.total), (1, 2));
        assert_eq!(report.difficulty, Difficulty::Easy);
        assert!(report.finished);

        assert!(matches!(
            engine.submit_answer(&id, "X"),
            Err(AppError::SessionFinished(_))
        ));
        assert!(matches!(
            engine.current_question(&id),
            Err(AppError::SessionFinished(_))
        ));
    }

    #[tokio::test]
    async fn test_options_are_a_permutation() {
        let engine = engine();
        let started = engine.start("facile").await.unwrap();
        let mut options = started.question.options.clone();
        options.sort();
        let expected: Vec<String> = if started.question.text == "Q1" {
            vec!["A".into(), "B".into(), "C".into()]
        } else {
            vec!["X".into(), "Y".into()]
        };
        assert_eq!(options, expected);
    }

    #[tokio::test]
    async fn test_start_errors_propagate() {
        let engine = engine();
        assert!(matches!(
            engine.start("legendary").await,
            Err(AppError::InvalidDifficulty(_))
        ));
        assert!(matches!(
            engine.start("hard").await,
            Err(AppError::SourceUnavailable { .. })
        ));

        let broken = StaticSource::new().with_bank(Difficulty::Average, "text:Q\nno separator\n");
        let engine = QuizEngine::new(Arc::new(broken));
        assert!(matches!(
            engine.start("average").await,
            Err(AppError::MalformedRecord { line: 2, .. })
        ));
        assert!(engine.store().is_empty());
    }

    #[tokio::test]
    async fn test_reads_do_not_advance() {
        let engine = engine();
        let id = engine.start("easy").await.unwrap().session_id;
        let a = engine.current_question(&id).unwrap();
        let b = engine.current_question(&id).unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.score(&id).unwrap(), 0);
        assert_eq!(engine.score(&id).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_sessions_do_not_interfere() {
        let engine = Arc::new(engine());
        let (a, b) = tokio::join!(engine.start("easy"), engine.start("easy"));
        let (a, b) = (a.unwrap().session_id, b.unwrap().session_id);
        assert_ne!(a, b);

        let q = engine.current_question(&a).unwrap();
        engine.submit_answer(&a, correct_for(&q.text)).unwrap();

        let report_b = engine.report(&b).unwrap();
        assert_eq!((report_b.score, report_b.answered), (0, 0));
        let report_a = engine.report(&a).unwrap();
        assert_eq!((report_a.score, report_a.answered), (1, 1));
    }

    #[tokio::test]
    async fn test_end_removes_session() {
        let engine = engine();
        let id = engine.start("easy").await.unwrap().session_id;
        engine.end(&id).unwrap();
        assert!(matches!(
            engine.current_question(&id),
            Err(AppError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_bank_is_reused_but_not_shared() {
        let engine = engine().with_bank_cache(true);
        let a = engine.start("easy").await.unwrap().session_id;
        let b = engine.start("easy").await.unwrap().session_id;

        let q = engine.current_question(&a).unwrap();
        engine.submit_answer(&a, correct_for(&q.text)).unwrap();

        assert_eq!(engine.report(&a).unwrap().answered, 1);
        assert_eq!(engine.report(&b).unwrap().answered, 0);
        assert_eq!(engine.report(&b).unwrap().total, 2);
    }
}
