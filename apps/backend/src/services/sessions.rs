//! In-memory store of running test sessions.
//!
//! Each session sits behind its own mutex. Settle tickets come back through
//! a per-session task that only holds a weak reference, so dropping a
//! session from the store also ends its task. Sessions idle for longer than
//! the configured TTL are dropped whenever a new one is created.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use matching_core::{
    EngineEvent, EventLog, Flashcard, MatchEngine, SessionController, SettleTicket, Subject,
    TestParams, TileSetBuilder,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::TestSessionResponse;
use crate::services::scheduler::TokioScheduler;

pub type Controller = SessionController<EventLog, TokioScheduler>;
pub type SharedSession = Arc<Mutex<TestSession>>;

/// One player's matching test.
pub struct TestSession {
    pub id: Uuid,
    pub subject: Subject,
    pub started_at: DateTime<Utc>,
    /// Last time a request touched this session.
    pub last_access: DateTime<Utc>,
    pub controller: Controller,
}

impl TestSession {
    /// Events the engine emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.controller.engine_mut().renderer_mut().drain()
    }

    pub fn response(&mut self) -> Result<TestSessionResponse> {
        let board = self.controller.snapshot()?;
        Ok(TestSessionResponse {
            session_id: self.id,
            subject: self.subject.clone(),
            params: self.controller.params(),
            started_at: self.started_at,
            board,
            events: self.drain_events(),
        })
    }
}

/// Lock a session for a request and mark it as recently used.
pub fn lock_session(session: &SharedSession) -> Result<MutexGuard<'_, TestSession>> {
    let mut guard = session
        .lock()
        .map_err(|_| ApiError::Internal("test session lock poisoned".to_string()))?;
    guard.last_access = Utc::now();
    Ok(guard)
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal a new board from `deck` and register it.
    ///
    /// Expired sessions are evicted first. Fails with
    /// `ApiError::TooManySessions` if the store is still at capacity.
    /// Must be called from inside a tokio runtime.
    pub fn create(
        &self,
        subject: Subject,
        deck: Vec<Flashcard>,
        params: TestParams,
        config: &Config,
    ) -> Result<SharedSession> {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = MatchEngine::new(EventLog::new(), TokioScheduler::new(tx))
            .with_settle_delay(config.settle_delay);
        let mut controller = SessionController::new(engine)
            .with_builder(TileSetBuilder::new(config.line_break.as_str()));
        controller.start(deck, params)?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        let session = Arc::new(Mutex::new(TestSession {
            id,
            subject,
            started_at: now,
            last_access: now,
            controller,
        }));

        {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|_| ApiError::Internal("session store lock poisoned".to_string()))?;
            let evicted = evict_expired(&mut sessions, now, config.session_ttl);
            if evicted > 0 {
                tracing::info!("Evicted {} idle test sessions", evicted);
            }
            if sessions.len() >= config.max_sessions {
                tracing::warn!(limit = config.max_sessions, "test session limit reached");
                return Err(ApiError::TooManySessions);
            }
            sessions.insert(id, session.clone());
        }

        spawn_settle_loop(id, Arc::downgrade(&session), rx);
        Ok(session)
    }

    pub fn get(&self, id: Uuid) -> Result<SharedSession> {
        self.sessions
            .read()
            .map_err(|_| ApiError::Internal("session store lock poisoned".to_string()))?
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("test session {id}")))
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .write()
            .map_err(|_| ApiError::Internal("session store lock poisoned".to_string()))?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("test session {id}")))
    }

    /// Drop sessions not touched within `ttl` of `now`. Returns how many
    /// were removed.
    pub fn evict_expired(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| ApiError::Internal("session store lock poisoned".to_string()))?;
        Ok(evict_expired(&mut sessions, now, ttl))
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_expired(
    sessions: &mut HashMap<Uuid, SharedSession>,
    now: DateTime<Utc>,
    ttl: Duration,
) -> usize {
    // A TTL too large to represent never expires anything.
    let Some(expiry) = TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_sub_signed(ttl))
    else {
        return 0;
    };

    let before = sessions.len();
    // Poisoned sessions can never be served again.
    sessions.retain(|_, session| {
        session
            .lock()
            .map(|guard| guard.last_access > expiry)
            .unwrap_or(false)
    });
    before - sessions.len()
}

fn spawn_settle_loop(
    id: Uuid,
    session: Weak<Mutex<TestSession>>,
    mut rx: UnboundedReceiver<SettleTicket>,
) {
    tokio::spawn(async move {
        while let Some(ticket) = rx.recv().await {
            let Some(session) = session.upgrade() else {
                break;
            };
            let Ok(mut guard) = session.lock() else {
                tracing::error!(session_id = %id, "test session lock poisoned");
                break;
            };
            let outcome = guard.controller.settle(ticket);
            tracing::debug!(session_id = %id, ?ticket, ?outcome, "settle ticket processed");
        }
        tracing::debug!(session_id = %id, "settle loop finished");
    });
}
