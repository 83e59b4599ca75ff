use tokio::sync::{mpsc, watch};

use lantern_core::models::AnswerEvent;

/// Cooperative cancellation token.
///
/// Clones share state. Backed by a watch channel so waiters are woken
/// without polling and without a lost-wakeup race.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: watch::Sender<bool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once cancellation is requested.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow() {
                return;
            }
            // The sender lives inside self, so `changed` cannot error
            // while we hold it; treat closure as cancellation anyway.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// The ordered event sequence for one answer.
///
/// Zero or more fragments, then exactly one terminal event. Dropping the
/// stream (or calling [`AnswerStream::cancel`]) cancels the in-flight
/// generation; tokens already consumed remain billed.
pub struct AnswerStream {
    rx: mpsc::Receiver<AnswerEvent>,
    cancel: CancellationToken,
}

impl AnswerStream {
    /// Next event, or `None` once the terminal event has been delivered
    /// and the channel is drained.
    pub async fn next(&mut self) -> Option<AnswerEvent> {
        self.rx.recv().await
    }

    /// Stop the in-flight generation (client disconnect).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the generation task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Wire up the channel between the generation task and the caller.
pub(crate) fn answer_channel(buffer: usize) -> (mpsc::Sender<AnswerEvent>, AnswerStream) {
    let (tx, rx) = mpsc::channel(buffer);
    let cancel = CancellationToken::new();
    (tx, AnswerStream { rx, cancel })
}
