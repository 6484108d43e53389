use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    quiz::{engine::QuizEngine, source::QuestionSource},
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuizEngine>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn QuestionSource>) -> Self {
        let engine = QuizEngine::new(source).with_bank_cache(config.cache_question_banks);
        Self {
            engine: Arc::new(engine),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuizEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
