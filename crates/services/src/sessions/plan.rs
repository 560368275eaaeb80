use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{CategoryName, Question};

use crate::error::SessionError;

/// Which questions a session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one category's questions.
    Category(CategoryName),
    /// Every category's questions, concatenated in listing order before the
    /// shuffle.
    All,
}

/// The shuffled, session-scoped question order. Not persisted; consumed by
/// exactly one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackPlan {
    questions: Vec<Question>,
}

impl PlaybackPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub(crate) fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

/// Builds a playback plan by applying a uniform shuffle to the selected
/// questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackBuilder;

impl PlaybackBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Shuffle the given questions into a playback plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no questions were selected; a
    /// session must not start on an empty plan.
    pub fn build(
        self,
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<PlaybackPlan, SessionError> {
        let mut rng = rng();
        self.build_with_rng(questions, &mut rng)
    }

    /// Deterministic variant: callers supply the random source, tests use a
    /// seeded one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no questions were selected.
    pub fn build_with_rng<R: Rng + ?Sized>(
        self,
        questions: impl IntoIterator<Item = Question>,
        rng: &mut R,
    ) -> Result<PlaybackPlan, SessionError> {
        let mut questions: Vec<Question> = questions.into_iter().collect();
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        questions.as_mut_slice().shuffle(rng);
        Ok(PlaybackPlan { questions })
    }
}
