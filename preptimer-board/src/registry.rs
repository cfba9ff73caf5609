//! Per-order countdown tasks keyed by order id.
//!
//! Each preparing order gets one periodic task that recomputes its countdown
//! and broadcasts the result. Reconciling against a fresh order list starts
//! tasks for newly preparing orders, restarts tasks whose snapshot changed,
//! and aborts tasks for orders that left the preparing phase. Aborting is the
//! whole cancellation story: the engine keeps no state to clean up.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use preptimer::core::clock::Clock;
use preptimer::core::countdown::calculate_timer_state;
use preptimer::core::format::format_timer;
use preptimer::core::preparing::is_order_preparing;
use preptimer::core::snapshot::OrderSnapshot;
use preptimer::core::types::TimerState;
use preptimer::io::snapshot_store::OrderRecord;

/// One recomputed countdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerTick {
    pub order_id: String,
    pub display: String,
    pub state: TimerState,
}

/// Changes applied by a reconcile pass. Ids are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub started: Vec<String>,
    pub restarted: Vec<String>,
    pub stopped: Vec<String>,
}

impl ReconcileSummary {
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.restarted.is_empty() && self.stopped.is_empty()
    }
}

struct ActiveTimer {
    snapshot: OrderSnapshot,
    handle: JoinHandle<()>,
}

pub struct TimerRegistry {
    timers: HashMap<String, ActiveTimer>,
    tick_interval: Duration,
    clock: Arc<dyn Clock>,
    tick_tx: broadcast::Sender<TimerTick>,
}

impl TimerRegistry {
    pub fn new(tick_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let (tick_tx, _) = broadcast::channel(256);
        Self {
            timers: HashMap::new(),
            tick_interval,
            clock,
            tick_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerTick> {
        self.tick_tx.subscribe()
    }

    /// Sorted ids of orders with a running countdown task.
    pub fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.timers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Align running tasks with the preparing orders in `records`.
    ///
    /// Must be called from within a tokio runtime. When an id appears more
    /// than once, the last record wins.
    pub fn reconcile(&mut self, records: &[OrderRecord]) -> ReconcileSummary {
        let preparing: BTreeMap<&str, &OrderSnapshot> = records
            .iter()
            .filter(|record| is_order_preparing(Some(&record.snapshot)))
            .map(|record| (record.id.as_str(), &record.snapshot))
            .collect();

        let mut summary = ReconcileSummary::default();

        let mut gone: Vec<String> = self
            .timers
            .keys()
            .filter(|id| !preparing.contains_key(id.as_str()))
            .cloned()
            .collect();
        gone.sort();
        for id in gone {
            self.stop(&id);
            summary.stopped.push(id);
        }

        for (id, snapshot) in preparing {
            let unchanged = self
                .timers
                .get(id)
                .map(|active| active.snapshot == *snapshot);
            match unchanged {
                Some(true) => continue,
                Some(false) => {
                    self.stop(id);
                    summary.restarted.push(id.to_string());
                }
                None => summary.started.push(id.to_string()),
            }
            self.start(id, snapshot.clone());
        }

        if !summary.is_empty() {
            info!(
                started = summary.started.len(),
                restarted = summary.restarted.len(),
                stopped = summary.stopped.len(),
                active = self.timers.len(),
                "reconciled order timers"
            );
        }
        summary
    }

    /// Abort the countdown task for `id`. Returns false if none was running.
    pub fn stop(&mut self, id: &str) -> bool {
        match self.timers.remove(id) {
            Some(active) => {
                active.handle.abort();
                debug!(order_id = id, "timer stopped");
                true
            }
            None => false,
        }
    }

    /// Abort every countdown task.
    pub fn shutdown(&mut self) {
        for (_, active) in self.timers.drain() {
            active.handle.abort();
        }
    }

    fn start(&mut self, id: &str, snapshot: OrderSnapshot) {
        debug!(order_id = id, "timer started");
        let handle = spawn_ticker(
            id.to_string(),
            snapshot.clone(),
            self.tick_interval,
            Arc::clone(&self.clock),
            self.tick_tx.clone(),
        );
        self.timers
            .insert(id.to_string(), ActiveTimer { snapshot, handle });
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_ticker(
    order_id: String,
    snapshot: OrderSnapshot,
    period: Duration,
    clock: Arc<dyn Clock>,
    tick_tx: broadcast::Sender<TimerTick>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let state = calculate_timer_state(Some(&snapshot), clock.now());
            let tick = TimerTick {
                order_id: order_id.clone(),
                display: format_timer(&state),
                state,
            };
            // No subscribers is fine; the tick is simply dropped.
            let _ = tick_tx.send(tick);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use preptimer::core::clock::FixedClock;
    use preptimer::test_support::{
        base_instant, completed_snapshot, preparing_snapshot, record, seconds_ago,
    };

    fn registry(clock: FixedClock) -> TimerRegistry {
        TimerRegistry::new(Duration::from_millis(10), Arc::new(clock))
    }

    #[tokio::test]
    async fn reconcile_starts_restarts_and_stops() {
        let mut timers = registry(FixedClock::new(base_instant()));

        let first = timers.reconcile(&[
            record("a", preparing_snapshot(15.0, seconds_ago(60))),
            record("b", preparing_snapshot(10.0, seconds_ago(60))),
            record("c", completed_snapshot(10.0, seconds_ago(3600), TimeDelta::minutes(9))),
        ]);
        assert_eq!(first.started, vec!["a", "b"]);
        assert!(first.restarted.is_empty() && first.stopped.is_empty());
        assert_eq!(timers.active_ids(), vec!["a", "b"]);

        let unchanged = timers.reconcile(&[
            record("a", preparing_snapshot(15.0, seconds_ago(60))),
            record("b", preparing_snapshot(10.0, seconds_ago(60))),
        ]);
        assert!(unchanged.is_empty());

        let second = timers.reconcile(&[
            record("a", preparing_snapshot(25.0, seconds_ago(60))),
            record("d", preparing_snapshot(5.0, seconds_ago(10))),
        ]);
        assert_eq!(second.started, vec!["d"]);
        assert_eq!(second.restarted, vec!["a"]);
        assert_eq!(second.stopped, vec!["b"]);
        assert_eq!(timers.active_ids(), vec!["a", "d"]);

        timers.shutdown();
        assert!(timers.active_ids().is_empty());
    }

    #[tokio::test]
    async fn ticks_carry_engine_state_for_each_order() {
        let clock = FixedClock::new(base_instant());
        let mut timers = registry(clock);
        let mut ticks = timers.subscribe();
        let cooking = preparing_snapshot(15.0, seconds_ago(600));
        timers.reconcile(&[record("a", cooking.clone())]);

        let tick = tokio::time::timeout(Duration::from_secs(5), ticks.recv())
            .await
            .expect("tick before timeout")
            .expect("channel open");
        assert_eq!(tick.order_id, "a");
        assert_eq!(tick.display, "05:00");
        assert_eq!(
            tick.state,
            calculate_timer_state(Some(&cooking), base_instant())
        );
    }

    #[tokio::test]
    async fn stop_reports_whether_a_timer_ran() {
        let mut timers = registry(FixedClock::new(base_instant()));
        timers.reconcile(&[record("a", preparing_snapshot(15.0, seconds_ago(60)))]);
        assert!(timers.stop("a"));
        assert!(!timers.stop("a"));
    }
}
