use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{CategoryName, Question};
use services::{QuizService, RevealCause, Selection, SessionControls};
use storage::repository::{CategoryRepository, InMemoryRepository};

fn name(raw: &str) -> CategoryName {
    CategoryName::new(raw).unwrap()
}

async fn seed_linux(repo: &InMemoryRepository) -> Vec<Question> {
    let questions = vec![
        Question::new("ls", "list files").unwrap(),
        Question::new("bash", "default shell").unwrap(),
    ];
    repo.save_questions(&name("Linux"), &questions).await.unwrap();
    questions
}

#[tokio::test(start_paused = true)]
async fn quiz_run_pairs_every_question_with_its_answer() {
    let repo = InMemoryRepository::new();
    let questions = seed_linux(&repo).await;
    let quiz = QuizService::new(Arc::new(repo));

    let (controls, _skip, _cancel) = SessionControls::new();
    let mut session = quiz
        .start_session(&Selection::Category(name("Linux")), controls)
        .await
        .unwrap();

    let expected: HashMap<&str, &str> = questions
        .iter()
        .map(|q| (q.question(), q.answer()))
        .collect();

    let mut events = Vec::new();
    while let Some(active) = session.next_question() {
        events.push(active.reveal().await.unwrap());
    }

    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(expected[event.question.as_str()], event.answer);
    }
    assert!(session.is_complete());
    assert!(session.next_question().is_none());
}

#[tokio::test(start_paused = true)]
async fn skip_signal_drives_an_immediate_reveal() {
    let repo = InMemoryRepository::new();
    seed_linux(&repo).await;
    let quiz = QuizService::new(Arc::new(repo));

    let (controls, skip, _cancel) = SessionControls::new();
    let mut session = quiz
        .start_session(&Selection::All, controls)
        .await
        .unwrap();

    let active = session.next_question().unwrap();
    let skipper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        skip.skip();
    });

    let started = tokio::time::Instant::now();
    let event = active.reveal().await.unwrap();
    skipper.await.unwrap();

    assert_eq!(event.cause, RevealCause::Skipped);
    assert!(started.elapsed() < Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_run_returns_control_cleanly() {
    let repo = InMemoryRepository::new();
    seed_linux(&repo).await;
    let quiz = QuizService::new(Arc::new(repo));

    let (controls, _skip, cancel) = SessionControls::new();
    let mut session = quiz
        .start_session(&Selection::All, controls)
        .await
        .unwrap();

    // First question completes normally.
    let active = session.next_question().unwrap();
    assert!(active.reveal().await.is_some());

    // Interrupt while the second question is waiting.
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        })
    };

    let active = session.next_question().unwrap();
    assert!(active.reveal().await.is_none());
    canceller.await.unwrap();

    assert!(session.next_question().is_none());
    assert!(session.is_complete());
}

#[tokio::test]
async fn replaying_requires_a_fresh_plan() {
    let repo = InMemoryRepository::new();
    seed_linux(&repo).await;
    let quiz = QuizService::new(Arc::new(repo));

    let (controls, _skip, _cancel) = SessionControls::new();
    let mut session = quiz
        .start_session(&Selection::All, controls)
        .await
        .unwrap()
        .with_reveal_after(Duration::from_millis(1));

    while let Some(active) = session.next_question() {
        active.reveal().await.unwrap();
    }
    assert!(session.is_complete());

    // A consumed session stays consumed; starting over builds a new shuffle.
    assert!(session.next_question().is_none());
    let (controls, _skip, _cancel) = SessionControls::new();
    let fresh = quiz
        .start_session(&Selection::All, controls)
        .await
        .unwrap();
    assert_eq!(fresh.remaining(), 2);
}
