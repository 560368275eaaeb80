use std::collections::VecDeque;
use std::time::Duration;

use quiz_core::model::Question;

use super::control::{CancelToken, SessionControls, SkipSignals};
use super::plan::PlaybackPlan;

/// Default bound on how long a question waits before the answer is shown.
pub const DEFAULT_REVEAL_AFTER: Duration = Duration::from_secs(7);

//
// ─── STATES AND EVENTS ─────────────────────────────────────────────────────────
//

/// Lifecycle of a single question within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    /// The question text is available for display.
    Showing,
    /// The reveal race is running: timer vs skip vs cancel.
    Waiting,
    /// The answer has been emitted.
    Revealed,
}

/// What resolved the wait for a question. Informational only; both causes
/// lead to the same reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealCause {
    Skipped,
    TimedOut,
}

/// The paired emission of a question and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealEvent {
    pub question: String,
    pub answer: String,
    pub cause: RevealCause,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A single quiz run over a consumed playback plan.
///
/// Finite and not restartable: once the queue is drained (or the session is
/// cancelled) a fresh plan must be built to play again, which also yields a
/// fresh shuffle.
pub struct QuizSession {
    queue: VecDeque<Question>,
    skip: SkipSignals,
    cancel: CancelToken,
    reveal_after: Duration,
}

impl QuizSession {
    #[must_use]
    pub fn new(plan: PlaybackPlan, controls: SessionControls) -> Self {
        Self {
            queue: plan.into_questions().into(),
            skip: controls.skip,
            cancel: controls.cancel,
            reveal_after: DEFAULT_REVEAL_AFTER,
        }
    }

    /// Override the reveal bound. Tests use short or paused-clock waits.
    #[must_use]
    pub fn with_reveal_after(mut self, reveal_after: Duration) -> Self {
        self.reveal_after = reveal_after;
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.queue.is_empty() || self.cancel.is_cancelled()
    }

    /// Advance to the next question, entering `Showing`.
    ///
    /// Returns `None` once the playback is exhausted or the session has been
    /// cancelled.
    pub fn next_question(&mut self) -> Option<ActiveQuestion<'_>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let question = self.queue.pop_front()?;
        Some(ActiveQuestion {
            question,
            skip: &mut self.skip,
            cancel: &self.cancel,
            reveal_after: self.reveal_after,
            state: QuestionState::Showing,
        })
    }
}

/// A question mid-presentation. Created in `Showing`; consumed by `reveal`.
pub struct ActiveQuestion<'s> {
    question: Question,
    skip: &'s mut SkipSignals,
    cancel: &'s CancelToken,
    reveal_after: Duration,
    state: QuestionState,
}

impl ActiveQuestion<'_> {
    /// The question text to display.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.question.question()
    }

    #[must_use]
    pub fn state(&self) -> QuestionState {
        self.state
    }

    /// Enter `Waiting` and resolve to `Revealed`.
    ///
    /// Races the reveal timer against an explicit skip signal and the cancel
    /// token; whichever fires first wins. Returns `None` iff the session was
    /// cancelled, in which case the caller must stop iterating.
    pub async fn reveal(mut self) -> Option<RevealEvent> {
        self.state = QuestionState::Waiting;
        // A skip pressed before this question went live must not apply to it.
        self.skip.drain();

        let cause = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::debug!("session cancelled during wait");
                return None;
            }
            () = self.skip.recv() => RevealCause::Skipped,
            () = tokio::time::sleep(self.reveal_after) => RevealCause::TimedOut,
        };

        self.state = QuestionState::Revealed;
        tracing::debug!(?cause, "question revealed");
        Some(RevealEvent {
            question: self.question.question().to_owned(),
            answer: self.question.answer().to_owned(),
            cause,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::control::SkipHandle;
    use crate::sessions::plan::PlaybackBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::time::Instant;

    fn build_session(count: usize) -> (QuizSession, SkipHandle, CancelToken) {
        let questions: Vec<Question> = (0..count)
            .map(|i| Question::new(format!("Q{i}"), format!("A{i}")).unwrap())
            .collect();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = PlaybackBuilder::new()
            .build_with_rng(questions, &mut rng)
            .unwrap();
        let (controls, skip, cancel) = SessionControls::new();
        (QuizSession::new(plan, controls), skip, cancel)
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_times_out_at_the_bound() {
        let (mut session, _skip, _cancel) = build_session(1);

        let active = session.next_question().unwrap();
        assert_eq!(active.state(), QuestionState::Showing);

        let started = Instant::now();
        let event = active.reveal().await.unwrap();

        assert_eq!(started.elapsed(), DEFAULT_REVEAL_AFTER);
        assert_eq!(event.cause, RevealCause::TimedOut);
        assert!(session.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn skip_reveals_before_the_bound() {
        let (mut session, skip, _cancel) = build_session(1);

        let skipper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            skip.skip();
        });

        let active = session.next_question().unwrap();
        let started = Instant::now();
        let event = active.reveal().await.unwrap();
        skipper.await.unwrap();

        assert!(started.elapsed() < DEFAULT_REVEAL_AFTER);
        assert_eq!(event.cause, RevealCause::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_skip_does_not_reveal_the_next_question() {
        let (mut session, skip, _cancel) = build_session(1);

        // Queued before the question enters Waiting, so it must be drained.
        skip.skip();

        let active = session.next_question().unwrap();
        let event = active.reveal().await.unwrap();
        assert_eq!(event.cause, RevealCause::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_wait_ends_the_session() {
        let (mut session, _skip, cancel) = build_session(3);

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(2)).await;
                cancel.cancel();
            })
        };

        let active = session.next_question().unwrap();
        assert!(active.reveal().await.is_none());
        canceller.await.unwrap();

        assert!(session.next_question().is_none());
        assert!(session.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn session_yields_one_event_per_question_then_ends() {
        let (mut session, _skip, _cancel) = build_session(3);
        assert_eq!(session.remaining(), 3);

        let mut events = Vec::new();
        while let Some(active) = session.next_question() {
            events.push(active.reveal().await.unwrap());
        }

        assert_eq!(events.len(), 3);
        assert_eq!(session.remaining(), 0);
        assert!(session.is_complete());
    }

    #[tokio::test]
    async fn custom_reveal_bound_is_honored() {
        let (session, _skip, _cancel) = build_session(1);
        let mut session = session.with_reveal_after(Duration::from_millis(5));

        let active = session.next_question().unwrap();
        let event = active.reveal().await.unwrap();
        assert_eq!(event.cause, RevealCause::TimedOut);
    }
}
