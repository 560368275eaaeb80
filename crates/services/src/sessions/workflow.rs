use std::sync::Arc;

use quiz_core::model::{CategoryName, Question};
use storage::repository::CategoryRepository;

use crate::error::SessionError;

use super::control::SessionControls;
use super::plan::{PlaybackBuilder, PlaybackPlan, Selection};
use super::service::QuizSession;

/// Orchestrates playback building and session start over the category store.
#[derive(Clone)]
pub struct QuizService {
    categories: Arc<dyn CategoryRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Categories available for selection, sorted by normalized key.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be enumerated.
    pub async fn available_categories(&self) -> Result<Vec<CategoryName>, SessionError> {
        Ok(self.categories.list_categories().await?)
    }

    /// Gather the selected questions and shuffle them into a playback plan.
    ///
    /// `Selection::All` concatenates every category's questions in listing
    /// order before the shuffle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the selection holds no questions
    /// and `SessionError::Storage` for store failures.
    pub async fn build_playback(&self, selection: &Selection) -> Result<PlaybackPlan, SessionError> {
        let questions = self.collect(selection).await?;
        PlaybackBuilder::new().build(questions)
    }

    async fn collect(&self, selection: &Selection) -> Result<Vec<Question>, SessionError> {
        match selection {
            Selection::Category(name) => Ok(self.categories.load_questions(name).await?),
            Selection::All => {
                let mut questions = Vec::new();
                for name in self.categories.list_categories().await? {
                    questions.extend(self.categories.load_questions(&name).await?);
                }
                Ok(questions)
            }
        }
    }

    /// Build a playback plan and start a session over it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` as for `build_playback`.
    pub async fn start_session(
        &self,
        selection: &Selection,
        controls: SessionControls,
    ) -> Result<QuizSession, SessionError> {
        let plan = self.build_playback(selection).await?;
        tracing::info!(total = plan.total(), "quiz session started");
        Ok(QuizSession::new(plan, controls))
    }
}
