use ratscrew_engine::game::Outcome;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for table activity
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    joins: AtomicU64,
    departures: AtomicU64,
    plays: AtomicU64,
    slaps_won: AtomicU64,
    burns: AtomicU64,
    ignored_intents: AtomicU64,
    active_sessions: AtomicU64,
    total_events_broadcast: AtomicU64,
    action_log_failures: AtomicU64,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Counts one engine outcome under its kind.
    pub fn record_outcome(&self, outcome: &Outcome) {
        let counter = match outcome {
            Outcome::Joined { .. } => &self.inner.joins,
            Outcome::Left { .. } => &self.inner.departures,
            Outcome::Played { .. } => &self.inner.plays,
            Outcome::SlapWon { .. } => &self.inner.slaps_won,
            Outcome::Burned { .. } => &self.inner.burns,
            Outcome::Ignored { .. } => &self.inner.ignored_intents,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(outcome = outcome.kind(), "recorded outcome");
    }

    pub fn increment_active_sessions(&self) {
        let count = self.inner.active_sessions.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(active_sessions = count, "session count increased");
    }

    pub fn decrement_active_sessions(&self) {
        let mut current = self.inner.active_sessions.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                tracing::warn!("attempted to decrement active_sessions below zero");
                return;
            }

            match self.inner.active_sessions.compare_exchange(
                current,
                current - 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    tracing::debug!(active_sessions = current - 1, "session count decreased");
                    return;
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn record_event_broadcast(&self) {
        self.inner
            .total_events_broadcast
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_action_log_failure(&self) {
        self.inner
            .action_log_failures
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            joins: self.inner.joins.load(Ordering::Relaxed),
            departures: self.inner.departures.load(Ordering::Relaxed),
            plays: self.inner.plays.load(Ordering::Relaxed),
            slaps_won: self.inner.slaps_won.load(Ordering::Relaxed),
            burns: self.inner.burns.load(Ordering::Relaxed),
            ignored_intents: self.inner.ignored_intents.load(Ordering::Relaxed),
            active_sessions: self.inner.active_sessions.load(Ordering::Relaxed),
            total_events_broadcast: self.inner.total_events_broadcast.load(Ordering::Relaxed),
            action_log_failures: self.inner.action_log_failures.load(Ordering::Relaxed),
        }
    }

    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        tracing::info!(
            joins = snapshot.joins,
            departures = snapshot.departures,
            plays = snapshot.plays,
            slaps_won = snapshot.slaps_won,
            burns = snapshot.burns,
            ignored_intents = snapshot.ignored_intents,
            active_sessions = snapshot.active_sessions,
            total_events_broadcast = snapshot.total_events_broadcast,
            action_log_failures = snapshot.action_log_failures,
            "table metrics"
        );
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub joins: u64,
    pub departures: u64,
    pub plays: u64,
    pub slaps_won: u64,
    pub burns: u64,
    pub ignored_intents: u64,
    pub active_sessions: u64,
    pub total_events_broadcast: u64,
    pub action_log_failures: u64,
}

impl MetricsSnapshot {
    /// Share of delivered intents the engine ignored.
    pub fn ignored_ratio(&self) -> f64 {
        let total = self.joins
            + self.departures
            + self.plays
            + self.slaps_won
            + self.burns
            + self.ignored_intents;
        if total == 0 {
            0.0
        } else {
            self.ignored_intents as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratscrew_engine::game::IgnoreReason;
    use ratscrew_engine::seats::Seat;

    #[test]
    fn outcomes_land_in_their_counters() {
        let metrics = MetricsCollector::new();
        metrics.record_outcome(&Outcome::Joined {
            seat: Seat::First,
            dealt: false,
        });
        metrics.record_outcome(&Outcome::Ignored {
            reason: IgnoreReason::NotYourTurn,
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.joins, 1);
        assert_eq!(snapshot.ignored_intents, 1);
        assert!((snapshot.ignored_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn active_sessions_never_underflow() {
        let metrics = MetricsCollector::new();
        metrics.decrement_active_sessions();
        metrics.increment_active_sessions();
        metrics.decrement_active_sessions();
        metrics.decrement_active_sessions();
        assert_eq!(metrics.snapshot().active_sessions, 0);
    }
}
