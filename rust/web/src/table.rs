use crate::events::{EventBus, EventSubscription, TableEvent};
use crate::metrics::MetricsCollector;
use ratscrew_engine::engine::Match;
use ratscrew_engine::game::{MatchState, Outcome};
use ratscrew_engine::logger::{ActionLogger, Intent};
pub use ratscrew_engine::seats::SessionId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Result of an intent, returned to the caller that sent it.
#[derive(Debug, Clone, Serialize)]
pub struct IntentResponse {
    pub session_id: SessionId,
    pub outcome: Outcome,
    pub state: MatchState,
}

/// Transport-side owner of the single match.
///
/// All intents go through one mutex, so transitions never interleave and
/// observers see states in the order they were produced.
#[derive(Debug)]
pub struct TableService {
    inner: Mutex<TableInner>,
    event_bus: Arc<EventBus>,
    metrics: MetricsCollector,
    session_ttl: Duration,
}

#[derive(Debug)]
struct TableInner {
    game: Match,
    /// Every issued session, seated or spectating, with its last activity.
    sessions: HashMap<SessionId, Instant>,
    action_log: Option<ActionLogger>,
}

impl TableService {
    pub fn new(game: Match, event_bus: Arc<EventBus>, metrics: MetricsCollector) -> Self {
        Self {
            inner: Mutex::new(TableInner {
                game,
                sessions: HashMap::new(),
                action_log: None,
            }),
            event_bus,
            metrics,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_action_log(mut self, logger: ActionLogger) -> Self {
        match self.inner.get_mut() {
            Ok(inner) => inner.action_log = Some(logger),
            Err(poisoned) => poisoned.into_inner().action_log = Some(logger),
        }
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Issues a new session and tries to seat it. When both seats are taken
    /// the session still exists and may observe, but cannot play or slap.
    pub fn join(&self) -> Result<IntentResponse, TableError> {
        let session_id = Uuid::new_v4().to_string();
        self.join_with(&session_id)
    }

    pub fn join_with(&self, session_id: &str) -> Result<IntentResponse, TableError> {
        let mut inner = self.lock()?;
        if inner
            .sessions
            .insert(session_id.to_string(), Instant::now())
            .is_none()
        {
            self.metrics.increment_active_sessions();
        }
        tracing::info!(session_id = %session_id, "session joined table");
        Ok(self.apply(&mut inner, session_id, Intent::Join))
    }

    pub fn leave(&self, session_id: &str) -> Result<IntentResponse, TableError> {
        let mut inner = self.lock()?;
        if inner.sessions.remove(session_id).is_none() {
            return Err(TableError::NotFound(session_id.to_string()));
        }
        self.metrics.decrement_active_sessions();
        tracing::info!(session_id = %session_id, "session left table");
        Ok(self.apply(&mut inner, session_id, Intent::Leave))
    }

    pub fn play(&self, session_id: &str) -> Result<IntentResponse, TableError> {
        let mut inner = self.lock()?;
        Self::touch(&mut inner, session_id)?;
        Ok(self.apply(&mut inner, session_id, Intent::Play))
    }

    pub fn slap(&self, session_id: &str) -> Result<IntentResponse, TableError> {
        let mut inner = self.lock()?;
        Self::touch(&mut inner, session_id)?;
        Ok(self.apply(&mut inner, session_id, Intent::Slap))
    }

    pub fn current_state(&self) -> Result<MatchState, TableError> {
        Ok(self.lock()?.game.snapshot())
    }

    /// Subscribes an observer and hands it the current state, taken under the
    /// table lock so no transition can slip between the two.
    pub fn observe(&self) -> Result<(MatchState, EventSubscription), TableError> {
        let inner = self.lock()?;
        let subscription = self.event_bus.subscribe();
        Ok((inner.game.snapshot(), subscription))
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.inner.lock() {
            Ok(inner) => inner.sessions.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Departs every session idle for longer than the TTL, as if it had
    /// disconnected. Returns the expired session ids.
    pub fn cleanup_expired_sessions(&self) -> Result<Vec<SessionId>, TableError> {
        let mut inner = self.lock()?;
        let expired: Vec<SessionId> = inner
            .sessions
            .iter()
            .filter(|(_, last_active)| last_active.elapsed() > self.session_ttl)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            inner.sessions.remove(id);
            self.metrics.decrement_active_sessions();
            tracing::info!(session_id = %id, "session expired due to inactivity");
            self.publish(TableEvent::SessionEnded {
                session_id: id.clone(),
                reason: "expired".into(),
            });
            self.apply(&mut inner, id, Intent::Leave);
        }
        Ok(expired)
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    fn lock(&self) -> Result<MutexGuard<'_, TableInner>, TableError> {
        self.inner.lock().map_err(|_| TableError::StoragePoisoned)
    }

    fn touch(inner: &mut TableInner, session_id: &str) -> Result<(), TableError> {
        match inner.sessions.get_mut(session_id) {
            Some(last_active) => {
                *last_active = Instant::now();
                Ok(())
            }
            None => Err(TableError::NotFound(session_id.to_string())),
        }
    }

    /// Runs one intent through the engine and broadcasts the result while
    /// still holding the table lock. The transition has already happened by
    /// the time it is logged, so a failed log write is reported and counted
    /// but never fails the intent.
    fn apply(&self, inner: &mut TableInner, session_id: &str, intent: Intent) -> IntentResponse {
        let outcome = inner.game.apply(session_id, intent);
        let records = inner.game.drain_history();
        self.metrics.record_outcome(&outcome);

        if let Outcome::Ignored { reason } = &outcome {
            tracing::debug!(
                session_id = %session_id,
                intent = ?intent,
                reason = ?reason,
                "intent ignored"
            );
        } else {
            self.log_outcome(session_id, &outcome);
            if let Some(logger) = inner.action_log.as_mut() {
                for record in &records {
                    if let Err(err) = logger.write(record) {
                        tracing::error!(
                            session_id = %session_id,
                            seq = record.seq,
                            error = %err,
                            "failed to write action log"
                        );
                        self.metrics.record_action_log_failure();
                    }
                }
            }
        }

        let state = inner.game.snapshot();
        if !outcome.is_ignored() {
            self.publish(TableEvent::StateUpdated {
                state: state.clone(),
            });
        }
        if let Some(message) = outcome.notification() {
            self.publish(TableEvent::Notification { message });
        }

        IntentResponse {
            session_id: session_id.to_string(),
            outcome,
            state,
        }
    }

    fn log_outcome(&self, session_id: &str, outcome: &Outcome) {
        match outcome {
            Outcome::SlapWon { seat, rule, cards } => tracing::info!(
                session_id = %session_id,
                seat = seat.number(),
                rule = ?rule,
                cards = cards,
                "slap won"
            ),
            Outcome::Joined { seat, dealt: true } => tracing::info!(
                session_id = %session_id,
                seat = seat.number(),
                "table full, cards dealt"
            ),
            Outcome::Left { seat, discarded } if *discarded > 0 => tracing::info!(
                session_id = %session_id,
                seat = seat.number(),
                discarded = discarded,
                "pile discarded after departure"
            ),
            other => tracing::debug!(
                session_id = %session_id,
                outcome = ?other,
                "intent applied"
            ),
        }
    }

    fn publish(&self, event: TableEvent) {
        self.event_bus.broadcast(event);
        self.metrics.record_event_broadcast();
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Table storage poisoned")]
    StoragePoisoned,
}

impl crate::errors::IntoErrorResponse for TableError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            TableError::NotFound(_) => StatusCode::NOT_FOUND,
            TableError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TableError::NotFound(_) => "session_not_found",
            TableError::StoragePoisoned => "storage_poisoned",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            TableError::NotFound(id) => Some(serde_json::json!({ "session_id": id })),
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        match self {
            TableError::StoragePoisoned => crate::errors::ErrorSeverity::Critical,
            TableError::NotFound(_) => crate::errors::ErrorSeverity::Client,
        }
    }
}
