//! Periodic countdown refresh bound to the lifetime of its owner.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::remaining::{compute_remaining, TimeRemaining};
use crate::models::event::Event;

/// Default refresh cadence for live countdowns.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One event's countdown at a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownSnapshot {
    pub event_id: Option<i64>,
    pub title: String,
    pub remaining: TimeRemaining,
}

/// Compute a snapshot for every event, preserving input order.
pub fn snapshot_all(events: &[Event], now: DateTime<Local>) -> Vec<CountdownSnapshot> {
    events
        .iter()
        .map(|event| CountdownSnapshot {
            event_id: event.id,
            title: event.title.clone(),
            remaining: compute_remaining(event.target, now),
        })
        .collect()
}

/// Handle to a running refresh loop. The loop stops when this is dropped.
pub struct CountdownTicker {
    handle: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// Spawn a loop that recomputes snapshots of the latest event list every
    /// `period` and publishes them on the returned receiver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        mut events: watch::Receiver<Vec<Event>>,
        period: Duration,
    ) -> (Self, watch::Receiver<Vec<CountdownSnapshot>>) {
        let initial = snapshot_all(&events.borrow_and_update(), Local::now());
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    changed = events.changed() => {
                        if changed.is_err() {
                            log::debug!("Event list closed; countdown ticker exiting");
                            break;
                        }
                    }
                }

                let snapshots = snapshot_all(&events.borrow_and_update(), Local::now());
                if tx.send(snapshots).is_err() {
                    log::debug!("No countdown subscribers left; ticker exiting");
                    break;
                }
            }
        });

        (
            Self {
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Stop the loop now instead of waiting for drop.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
