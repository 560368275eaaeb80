use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Notify, mpsc};

//
// ─── CANCELLATION ──────────────────────────────────────────────────────────────
//

/// Cooperative cancellation flag shared between a session and its caller.
///
/// Cancelling ends the session, not the process: the session observes the
/// token at each iteration boundary and inside the reveal wait, then returns
/// control cleanly.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the token. Idempotent; wakes every pending `cancelled()` wait.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once the token has been cancelled.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            // Re-check after registering so a cancel between the first check
            // and registration is not missed.
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

//
// ─── SKIP SIGNAL ───────────────────────────────────────────────────────────────
//

const SKIP_BUFFER: usize = 8;

/// Caller-side sender for "continue" signals (e.g. an Enter press).
#[derive(Clone)]
pub struct SkipHandle {
    tx: mpsc::Sender<()>,
}

impl SkipHandle {
    /// Signal the session to reveal the current answer now.
    ///
    /// A full buffer means a skip is already pending; the extra press is
    /// dropped.
    pub fn skip(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Session-side receiver for skip signals.
pub struct SkipSignals {
    rx: mpsc::Receiver<()>,
}

impl SkipSignals {
    /// Wait for the next skip signal.
    ///
    /// If every `SkipHandle` has been dropped no skip can ever arrive, so
    /// the wait pends forever and the reveal timer wins the race.
    pub(crate) async fn recv(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    /// Discard signals queued before the current question went live.
    pub(crate) fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Create a connected skip handle/receiver pair.
#[must_use]
pub fn skip_channel() -> (SkipHandle, SkipSignals) {
    let (tx, rx) = mpsc::channel(SKIP_BUFFER);
    (SkipHandle { tx }, SkipSignals { rx })
}

//
// ─── SESSION CONTROLS ──────────────────────────────────────────────────────────
//

/// The control surface a session consumes: skip signals plus cancellation.
pub struct SessionControls {
    pub skip: SkipSignals,
    pub cancel: CancelToken,
}

impl SessionControls {
    /// Build controls together with the caller-side handles that drive them.
    #[must_use]
    pub fn new() -> (Self, SkipHandle, CancelToken) {
        let (skip_handle, skip) = skip_channel();
        let cancel = CancelToken::new();
        let controls = Self {
            skip,
            cancel: cancel.clone(),
        };
        (controls, skip_handle, cancel)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
