//! Settle scheduler backed by tokio timers.

use std::time::Duration;

use matching_core::{SettleScheduler, SettleTicket};
use tokio::sync::mpsc::UnboundedSender;

/// Sends each ticket down a channel once its delay has elapsed.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: UnboundedSender<SettleTicket>,
}

impl TokioScheduler {
    pub fn new(tx: UnboundedSender<SettleTicket>) -> Self {
        Self { tx }
    }
}

impl SettleScheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, ticket: SettleTicket) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver is gone once the session has been dropped.
            let _ = tx.send(ticket);
        });
    }
}
