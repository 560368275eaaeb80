use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{CategoryName, Question};
use serde::Serialize;
use thiserror::Error;
use tokio::fs;

use crate::repository::{CategoryRepository, QuestionRecord, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonInitError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// File-backed repository: one `<key>.json` per category under a root
/// directory, each holding an array of `{question, answer}` records in
/// insertion order.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    root: PathBuf,
}

impl JsonFileRepository {
    /// Open (and create if absent) the storage root.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, JsonInitError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn category_path(&self, name: &CategoryName) -> PathBuf {
        self.root.join(format!("{}.json", name.as_key()))
    }
}

/// Serialize records as pretty JSON with a four-space indent, matching the
/// established on-disk format so files stay human-readable and diffable.
fn to_pretty_json(records: &[QuestionRecord]) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(buf)
}

#[async_trait]
impl CategoryRepository for JsonFileRepository {
    async fn category_exists(&self, name: &CategoryName) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.category_path(name)).await?)
    }

    async fn load_questions(&self, name: &CategoryName) -> Result<Vec<Question>, StorageError> {
        let path = self.category_path(name);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<QuestionRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect())
    }

    async fn save_questions(
        &self,
        name: &CategoryName,
        questions: &[Question],
    ) -> Result<(), StorageError> {
        // The root can disappear between open() and a later save.
        fs::create_dir_all(&self.root).await?;

        let records: Vec<QuestionRecord> =
            questions.iter().map(QuestionRecord::from_question).collect();
        let buf = to_pretty_json(&records)?;
        fs::write(self.category_path(name), buf).await?;
        Ok(())
    }

    async fn create_category(&self, name: &CategoryName) -> Result<(), StorageError> {
        if self.category_exists(name).await? {
            return Err(StorageError::AlreadyExists);
        }
        self.save_questions(name, &[]).await
    }

    async fn add_question(
        &self,
        name: &CategoryName,
        question: Question,
    ) -> Result<(), StorageError> {
        if !self.category_exists(name).await? {
            return Err(StorageError::CategoryNotFound);
        }
        let mut questions = self.load_questions(name).await?;
        questions.push(question);
        self.save_questions(name, &questions).await
    }

    async fn list_categories(&self) -> Result<Vec<CategoryName>, StorageError> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            // Foreign files with unusable names are skipped, not fatal.
            if let Ok(name) = CategoryName::new(stem) {
                names.push(name);
            }
        }

        // Directory enumeration order is OS-dependent; sort for stable display.
        names.sort();
        Ok(names)
    }
}
