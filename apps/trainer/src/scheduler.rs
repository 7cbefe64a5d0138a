//! Cancellable delayed advance after a correct answer.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use vocab_core::AdvanceTicket;

/// Sends a ticket back to the event loop once the delay has passed.
///
/// At most one advance is pending. Scheduling a new one or calling
/// [`cancel`](Self::cancel) aborts the previous task.
pub struct AdvanceScheduler {
    delay: Duration,
    tx: UnboundedSender<AdvanceTicket>,
    pending: Option<JoinHandle<()>>,
}

impl AdvanceScheduler {
    pub fn new(delay: Duration, tx: UnboundedSender<AdvanceTicket>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn schedule(&mut self, ticket: AdvanceTicket) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The loop may already be gone on shutdown.
            let _ = tx.send(ticket);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AdvanceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
