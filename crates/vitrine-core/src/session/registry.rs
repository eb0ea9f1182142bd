//! Registry of live sessions.
//!
//! One entry per connected viewer, keyed by session id. Each entry holds its
//! state behind a per-session mutex, which realizes the serialization
//! guarantee: no two events mutate one session concurrently, while events for
//! different sessions proceed in parallel. Sessions are fully isolated; no
//! state is shared across entries.
//!
//! The registry owns the [`UpdateBus`] and publishes each update before the
//! session's lock is released, so subscribers observe one session's updates
//! in application order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use vitrine_types::error::SessionError;
use vitrine_types::event::SessionEvent;
use vitrine_types::session::{Session, SessionUpdate};

use crate::session::state::SessionState;
use crate::update::UpdateBus;

/// Owns every live session and the lifecycle around them.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Mutex<SessionState>>>,
    updates: UpdateBus,
    events_applied: AtomicU64,
}

impl SessionRegistry {
    /// Create an empty registry publishing to the given bus.
    pub fn new(updates: UpdateBus) -> Self {
        Self {
            sessions: DashMap::new(),
            updates,
            events_applied: AtomicU64::new(0),
        }
    }

    /// The bus carrying this registry's re-render updates.
    pub fn updates(&self) -> &UpdateBus {
        &self.updates
    }

    /// Create a new session and return its initial snapshot.
    pub fn create(&self) -> Session {
        let state = SessionState::new();
        let snapshot = state.session().clone();
        self.sessions
            .insert(snapshot.id, Arc::new(Mutex::new(state)));
        tracing::info!(session_id = %snapshot.id, "session created");
        snapshot
    }

    /// Snapshot a session's full state (counter + transcript).
    pub async fn snapshot(&self, id: &Uuid) -> Result<Session, SessionError> {
        let state = self.get(id)?;
        let guard = state.lock().await;
        Ok(guard.session().clone())
    }

    /// Apply one host event to a session and broadcast the resulting update.
    ///
    /// The session's mutex is held through both the transition and the
    /// publish: no concurrent reader sees a half-applied state, and the bus
    /// carries updates in the order they were applied.
    pub async fn apply(
        &self,
        id: &Uuid,
        event: &SessionEvent,
    ) -> Result<SessionUpdate, SessionError> {
        let state = self.get(id)?;
        let mut guard = state.lock().await;
        let patch = guard.apply(event)?;
        self.events_applied.fetch_add(1, Ordering::Relaxed);
        let update = SessionUpdate {
            session_id: *id,
            patch,
        };
        self.updates.publish(update.clone());
        Ok(update)
    }

    /// Destroy a session explicitly (viewer disconnect).
    pub fn remove(&self, id: &Uuid) -> Result<(), SessionError> {
        match self.sessions.remove(id) {
            Some(_) => {
                tracing::info!(session_id = %id, "session removed");
                Ok(())
            }
            None => Err(SessionError::NotFound),
        }
    }

    /// True if the session exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Total events applied across all sessions since startup.
    pub fn events_applied(&self) -> u64 {
        self.events_applied.load(Ordering::Relaxed)
    }

    /// Remove every session idle for longer than `idle_timeout`.
    ///
    /// Staleness is re-checked under the session's lock inside `remove_if`,
    /// so an event applied between candidate collection and removal keeps
    /// its session alive. A session whose lock is held has an event in
    /// flight and is live by definition.
    ///
    /// Returns the number of sessions destroyed.
    pub fn sweep_idle(&self, idle_timeout: Duration) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(idle_timeout).unwrap_or(chrono::Duration::zero());

        let candidates: Vec<Uuid> = self.sessions.iter().map(|entry| *entry.key()).collect();

        let mut removed = 0;
        for id in candidates {
            let expired = self.sessions.remove_if(&id, |_, state| match state.try_lock() {
                Ok(guard) => guard.session().last_active_at < cutoff,
                Err(_) => false,
            });
            if expired.is_some() {
                tracing::info!(session_id = %id, "session expired after idle timeout");
                removed += 1;
            }
        }
        removed
    }

    fn get(&self, id: &Uuid) -> Result<Arc<Mutex<SessionState>>, SessionError> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SessionError::NotFound)
    }
}

/// Spawn the background task that sweeps idle sessions until cancelled.
pub fn spawn_idle_sweeper(
    registry: Arc<SessionRegistry>,
    idle_timeout: Duration,
    sweep_interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::debug!("idle sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = registry.sweep_idle(idle_timeout);
                    if removed > 0 {
                        tracing::debug!(removed, "idle sweep pass complete");
                    }
                }
            }
        }
    })
}
