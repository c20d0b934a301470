//! Preview scheduling: debounce rapid slider changes and drop stale results.
//!
//! Each client session owns a generation counter. A submission bumps the
//! counter, waits out the debounce interval and is only dispatched if no
//! newer submission arrived meanwhile. A result that finishes after a newer
//! submission is discarded as well.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::JoinError;

/// Sessions kept before idle ones are evicted.
const MAX_SESSIONS: usize = 1024;

/// Sessions unused for this long are dropped on the next insert.
const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Generation tracking for one client.
#[derive(Debug)]
pub struct PreviewSession {
    generation: AtomicU64,
    debounce: Duration,
    last_used: Mutex<Instant>,
}

impl PreviewSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            debounce,
            last_used: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self, now: Instant) {
        *self
            .last_used
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    fn last_used(&self) -> Instant {
        *self
            .last_used
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Latest generation handed out.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Debounce, run `job` on the blocking pool and return its result.
    ///
    /// Returns `Ok(None)` when a newer submission superseded this one,
    /// either before dispatch or while `job` was running.
    pub async fn submit<F, T>(&self, job: F) -> Result<Option<T>, JoinError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.is_current(generation) {
            tracing::debug!(generation, "Preview superseded before dispatch");
            return Ok(None);
        }

        let result = tokio::task::spawn_blocking(job).await?;

        if !self.is_current(generation) {
            tracing::debug!(generation, "Preview superseded while running");
            return Ok(None);
        }
        Ok(Some(result))
    }
}

/// Preview sessions keyed by client-chosen id.
///
/// Sessions are dropped once idle past the timeout, or when the map is full.
/// A session evicted while a request is in flight keeps serving that request
/// through its own handle; the next request for the id starts a new session.
#[derive(Debug)]
pub struct PreviewRegistry {
    sessions: Mutex<HashMap<String, Arc<PreviewSession>>>,
    debounce: Duration,
    idle_timeout: Duration,
}

impl PreviewRegistry {
    pub fn new(debounce: Duration) -> Self {
        Self::with_idle_timeout(debounce, SESSION_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(debounce: Duration, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            debounce,
            idle_timeout,
        }
    }

    /// Session for `id`, created on first use.
    pub fn session(&self, id: &str) -> Arc<PreviewSession> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Instant::now();
        if let Some(session) = sessions.get(id) {
            session.touch(now);
            return session.clone();
        }

        let before = sessions.len();
        sessions.retain(|_, s| {
            Arc::strong_count(s) > 1 || now.duration_since(s.last_used()) < self.idle_timeout
        });

        if sessions.len() >= MAX_SESSIONS {
            sessions.retain(|_, s| Arc::strong_count(s) > 1);
        }

        if sessions.len() >= MAX_SESSIONS {
            // Every session is in flight: drop the least recently used
            let mut by_age: Vec<(Instant, String)> = sessions
                .iter()
                .map(|(id, s)| (s.last_used(), id.clone()))
                .collect();
            by_age.sort();
            let excess = sessions.len() + 1 - MAX_SESSIONS;
            for (_, id) in by_age.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        if sessions.len() < before {
            tracing::debug!(
                evicted = before - sessions.len(),
                remaining = sessions.len(),
                "Evicted preview sessions"
            );
        }

        let session = Arc::new(PreviewSession::new(self.debounce));
        sessions.insert(id.to_string(), session.clone());
        session
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
