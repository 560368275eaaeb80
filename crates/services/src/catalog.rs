use std::sync::Arc;

use quiz_core::model::{CategoryName, Question};
use storage::repository::CategoryRepository;

use crate::error::CatalogError;

/// Sample data for a category, seeded when the category does not exist yet.
#[derive(Debug, Clone, Copy)]
pub struct SeedCategory {
    pub name: &'static str,
    pub questions: &'static [(&'static str, &'static str)],
}

/// Thin domain service over the category repository: validates input,
/// normalizes names, and delegates persistence.
#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Create a new, empty category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Category` for an empty name and
    /// `StorageError::AlreadyExists` (wrapped) for a duplicate under any
    /// casing.
    pub async fn create_category(&self, raw_name: &str) -> Result<CategoryName, CatalogError> {
        let name = CategoryName::new(raw_name)?;
        self.categories.create_category(&name).await?;
        tracing::info!(category = name.as_key(), "category created");
        Ok(name)
    }

    /// Append a question to an existing category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Question` for empty question/answer text and
    /// `StorageError::CategoryNotFound` (wrapped) when the category is
    /// missing; the category is never created as a side effect.
    pub async fn add_question(
        &self,
        raw_name: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), CatalogError> {
        let name = CategoryName::new(raw_name)?;
        let question = Question::new(question, answer)?;
        self.categories.add_question(&name, question).await?;
        tracing::debug!(category = name.as_key(), "question added");
        Ok(())
    }

    /// All existing categories, sorted by normalized key.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the store cannot be enumerated.
    pub async fn categories(&self) -> Result<Vec<CategoryName>, CatalogError> {
        Ok(self.categories.list_categories().await?)
    }

    /// Seed sample categories, skipping any that already exist.
    ///
    /// Returns how many categories were created.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a seed entry is malformed or the store
    /// cannot be written.
    pub async fn seed_defaults(&self, seeds: &[SeedCategory]) -> Result<usize, CatalogError> {
        let mut created = 0;
        for seed in seeds {
            let name = CategoryName::new(seed.name)?;
            if self.categories.category_exists(&name).await? {
                continue;
            }

            let questions = seed
                .questions
                .iter()
                .map(|(question, answer)| Question::new(*question, *answer))
                .collect::<Result<Vec<_>, _>>()?;
            self.categories.save_questions(&name, &questions).await?;
            tracing::info!(category = name.as_key(), "seeded default category");
            created += 1;
        }
        Ok(created)
    }
}
