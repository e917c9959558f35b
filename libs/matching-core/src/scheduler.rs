//! Settle-delay scheduling.
//!
//! After a pair is evaluated the engine hands a [`SettleTicket`] to its
//! scheduler. Whoever drives the scheduler passes the ticket back to
//! [`MatchEngine::settle`](crate::engine::MatchEngine::settle) once the delay
//! has elapsed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies one pending pair resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettleTicket {
    /// Session generation the pair was evaluated in.
    pub generation: u64,
    /// Monotonic pairing counter across the engine's lifetime.
    pub pairing: u64,
}

/// Arranges for a ticket to be returned to the engine after a delay.
pub trait SettleScheduler {
    fn schedule(&mut self, delay: Duration, ticket: SettleTicket);
}

/// Scheduler driven by hand, for tests and for hosts with their own clock.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: Vec<(Duration, SettleTicket)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and return every ticket now due, oldest first.
    pub fn advance(&mut self, by: Duration) -> Vec<SettleTicket> {
        self.now += by;
        let now = self.now;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|(deadline, _)| *deadline <= now);
        self.queue = waiting;
        due.into_iter().map(|(_, ticket)| ticket).collect()
    }

    /// Number of tickets not yet due.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl SettleScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, ticket: SettleTicket) {
        self.queue.push((self.now + delay, ticket));
    }
}
