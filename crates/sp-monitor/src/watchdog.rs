//! Overdue detection.
//!
//! [`Watchdog::tick`] is the pure per-poll step.  [`spawn`] drives it from a
//! `tokio` interval by sending `Tick` commands to the monitor task, which owns
//! the queue.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use sp_circuit::CheckIn;
use sp_core::Epoch;

use crate::CheckInQueue;
use crate::actor::Command;

/// Result of one watchdog poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Alarm active: the queue was not inspected.
    Suppressed,
    /// Front entry is still inside its window.
    Waiting,
    /// Front entry elapsed after being checked; removed silently.
    Cleared(CheckIn),
    /// Front entry elapsed unchecked; removed and must be reported.
    Overdue(CheckIn),
    /// Nothing left to check.
    Complete,
}

#[derive(Copy, Clone, Debug)]
pub struct Watchdog {
    window_secs: u32,
}

impl Watchdog {
    pub fn new(window_secs: u32) -> Self {
        Self { window_secs }
    }

    /// Inspect the front of the queue and pop it once its window has closed.
    /// At most one entry is removed per tick.
    pub fn tick(&self, queue: &mut CheckInQueue, alarm_active: bool, now: Epoch) -> TickOutcome {
        if alarm_active {
            return TickOutcome::Suppressed;
        }
        let Some(front) = queue.front() else {
            return TickOutcome::Complete;
        };
        if !now.is_past_window(front.time, self.window_secs) {
            return TickOutcome::Waiting;
        }
        match queue.pop_front() {
            Some(entry) if entry.checked => TickOutcome::Cleared(entry),
            Some(entry) => TickOutcome::Overdue(entry),
            None => TickOutcome::Complete,
        }
    }
}

/// Spawn the polling task for shift `generation`.
///
/// The task holds only a weak sender so it never keeps the monitor alive.  It
/// exits when the monitor answers a tick with `false` (stale generation,
/// shift no longer active, or complete) or when the monitor is gone.
pub(crate) fn spawn(
    commands:   mpsc::WeakSender<Command>,
    generation: u64,
    period:     Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(tx) = commands.upgrade() else { break };
            let (reply, keep_running) = oneshot::channel();
            if tx.send(Command::Tick { generation, reply }).await.is_err() {
                break;
            }
            drop(tx);
            if !keep_running.await.unwrap_or(false) {
                break;
            }
        }
        debug!(generation, "watchdog stopped");
    })
}
