use async_trait::async_trait;
use quiz_core::model::{CategoryName, Question};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::{JsonFileRepository, JsonInitError};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("category already exists")]
    AlreadyExists,

    #[error("category not found")]
    CategoryNotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Persisted shape for a question record.
///
/// This mirrors the domain `Question` so repositories can serialize and
/// deserialize without leaking storage concerns into the domain layer. The
/// field order is the on-disk field order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            question: question.question().to_owned(),
            answer: question.answer().to_owned(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// Stored records are accepted verbatim; presence validation happens at
    /// the add boundary, never on read.
    #[must_use]
    pub fn into_question(self) -> Question {
        Question::from_persisted(self.question, self.answer)
    }
}

/// Repository contract for category-keyed question collections.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// True iff a durable unit for the category exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn category_exists(&self, name: &CategoryName) -> Result<bool, StorageError>;

    /// Fetch the stored questions for a category, in insertion order.
    ///
    /// A category with no durable unit yet yields an empty list, never an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the unit exists but cannot be read.
    async fn load_questions(&self, name: &CategoryName) -> Result<Vec<Question>, StorageError>;

    /// Create or overwrite the durable unit with the full question list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the unit cannot be written.
    async fn save_questions(
        &self,
        name: &CategoryName,
        questions: &[Question],
    ) -> Result<(), StorageError>;

    /// Create an empty category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the category exists under
    /// any casing.
    async fn create_category(&self, name: &CategoryName) -> Result<(), StorageError>;

    /// Append one question to an existing category.
    ///
    /// Load-append-save with no concurrent-writer guard; acceptable for a
    /// single-process, single-user tool.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CategoryNotFound` if the category does not
    /// exist; the category is not created as a side effect.
    async fn add_question(
        &self,
        name: &CategoryName,
        question: Question,
    ) -> Result<(), StorageError>;

    /// Enumerate all existing categories, sorted by normalized key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be enumerated.
    async fn list_categories(&self) -> Result<Vec<CategoryName>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    categories: Arc<Mutex<HashMap<String, Vec<Question>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<Question>>>, StorageError> {
        self.categories
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn category_exists(&self, name: &CategoryName) -> Result<bool, StorageError> {
        Ok(self.lock()?.contains_key(name.as_key()))
    }

    async fn load_questions(&self, name: &CategoryName) -> Result<Vec<Question>, StorageError> {
        Ok(self.lock()?.get(name.as_key()).cloned().unwrap_or_default())
    }

    async fn save_questions(
        &self,
        name: &CategoryName,
        questions: &[Question],
    ) -> Result<(), StorageError> {
        self.lock()?
            .insert(name.as_key().to_owned(), questions.to_vec());
        Ok(())
    }

    async fn create_category(&self, name: &CategoryName) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.contains_key(name.as_key()) {
            return Err(StorageError::AlreadyExists);
        }
        guard.insert(name.as_key().to_owned(), Vec::new());
        Ok(())
    }

    async fn add_question(
        &self,
        name: &CategoryName,
        question: Question,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        match guard.get_mut(name.as_key()) {
            Some(questions) => {
                questions.push(question);
                Ok(())
            }
            None => Err(StorageError::CategoryNotFound),
        }
    }

    async fn list_categories(&self) -> Result<Vec<CategoryName>, StorageError> {
        let guard = self.lock()?;
        let mut names: Vec<CategoryName> = guard
            .keys()
            .filter_map(|key| CategoryName::new(key.as_str()).ok())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Aggregates the category repository behind a trait object for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub categories: Arc<dyn CategoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            categories: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Build a `Storage` backed by per-category JSON files under `root`.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the storage root cannot be created.
    pub fn json(root: impl Into<std::path::PathBuf>) -> Result<Self, JsonInitError> {
        let repo = JsonFileRepository::open(root)?;
        Ok(Self {
            categories: Arc::new(repo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> CategoryName {
        CategoryName::new(raw).unwrap()
    }

    #[tokio::test]
    async fn create_then_exists_round_trip() {
        let repo = InMemoryRepository::new();
        repo.create_category(&name("Linux")).await.unwrap();
        assert!(repo.category_exists(&name("linux")).await.unwrap());
        assert!(!repo.category_exists(&name("chess")).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_create_fails_regardless_of_casing() {
        let repo = InMemoryRepository::new();
        repo.create_category(&name("Linux")).await.unwrap();
        let err = repo.create_category(&name("LINUX")).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists));
    }

    #[tokio::test]
    async fn load_missing_category_is_empty() {
        let repo = InMemoryRepository::new();
        let questions = repo.load_questions(&name("nowhere")).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn add_to_missing_category_fails_without_creating_it() {
        let repo = InMemoryRepository::new();
        let question = Question::new("Q", "A").unwrap();
        let err = repo.add_question(&name("ghost"), question).await.unwrap_err();
        assert!(matches!(err, StorageError::CategoryNotFound));
        assert!(!repo.category_exists(&name("ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_content() {
        let repo = InMemoryRepository::new();
        let questions = vec![
            Question::new("What command lists files?", "ls").unwrap(),
            Question::new("Default shell?", "bash").unwrap(),
        ];
        repo.save_questions(&name("Linux"), &questions).await.unwrap();
        let loaded = repo.load_questions(&name("linux")).await.unwrap();
        assert_eq!(loaded, questions);
    }

    #[tokio::test]
    async fn list_is_sorted_by_key() {
        let repo = InMemoryRepository::new();
        for raw in ["Python", "Chess", "Linux"] {
            repo.create_category(&name(raw)).await.unwrap();
        }
        let listed = repo.list_categories().await.unwrap();
        let keys: Vec<&str> = listed.iter().map(CategoryName::as_key).collect();
        assert_eq!(keys, ["chess", "linux", "python"]);
    }
}
