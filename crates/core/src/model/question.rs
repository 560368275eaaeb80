use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("answer text cannot be empty")]
    EmptyAnswer,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single question/answer pair.
///
/// Questions have no identity of their own; they live inside a category in
/// insertion order and compare structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    question: String,
    answer: String,
}

impl Question {
    /// Creates a new question, trimming both parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyQuestion` or `QuestionError::EmptyAnswer`
    /// if the respective text is empty or whitespace-only.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        Ok(Self {
            question: question.trim().to_owned(),
            answer: answer.trim().to_owned(),
        })
    }

    /// Rehydrate a question from persisted storage.
    ///
    /// Stored records are taken verbatim: presence is enforced when a
    /// question is added, not when a category file is read back, so a
    /// hand-edited file never fails to load.
    #[must_use]
    pub fn from_persisted(question: String, answer: String) -> Self {
        Self { question, answer }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
