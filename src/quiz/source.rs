// src/quiz/source.rs

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::{error::AppError, models::difficulty::Difficulty};

/// Where the raw text of a question bank comes from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Returns the full source text for `difficulty`.
    async fn read(&self, difficulty: Difficulty) -> Result<String, AppError>;
}

/// Reads `questions_<tier>.txt` from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, difficulty: Difficulty) -> PathBuf {
        self.root.join(difficulty.file_name())
    }
}

#[async_trait]
impl QuestionSource for DirectorySource {
    async fn read(&self, difficulty: Difficulty) -> Result<String, AppError> {
        let path = self.path_for(difficulty);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            tracing::error!("Failed to read question source {}: {:?}", path.display(), e);
            AppError::SourceUnavailable {
                difficulty,
                reason: format!("{}: {}", path.display(), e),
            }
        })
    }
}

/// In-memory banks, keyed by tier. Tiers without an entry are unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    banks: HashMap<Difficulty, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bank(mut self, difficulty: Difficulty, text: impl Into<String>) -> Self {
        self.banks.insert(difficulty, text.into());
        self
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    async fn read(&self, difficulty: Difficulty) -> Result<String, AppError> {
        self.banks
            .get(&difficulty)
            .cloned()
            .ok_or_else(|| AppError::SourceUnavailable {
                difficulty,
                reason: "no bank registered for this tier".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_source_reports_missing_file() {
        let source = DirectorySource::new("/definitely/not/a/real/dir");
        let err = source.read(Difficulty::Hard).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::SourceUnavailable {
                difficulty: Difficulty::Hard,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn directory_source_reads_tier_file() {
        let dir = std::env::temp_dir().join(format!("quiz-source-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("questions_average.txt"), "text:Q\n")
            .await
            .unwrap();

        let source = DirectorySource::new(&dir);
        assert_eq!(source.read(Difficulty::Average).await.unwrap(), "text:Q\n");
        assert!(source.read(Difficulty::Easy).await.is_err());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn static_source_serves_registered_tiers_only() {
        let source = StaticSource::new().with_bank(Difficulty::Easy, "text:Q\n");
        assert_eq!(source.read(Difficulty::Easy).await.unwrap(), "text:Q\n");
        assert!(matches!(
            source.read(Difficulty::Average).await,
            Err(AppError::SourceUnavailable { .. })
        ));
    }
}
