//! `ShiftMonitor`: the handle through which everything talks to the monitor task.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use sp_circuit::Shift;
use sp_core::Clock;

use crate::actor::{Command, MonitorActor};
use crate::{Classification, MessageBus, MonitorConfig, MonitorError, MonitorResult, ScanEvent};

/// Lifecycle of the monitored shift.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftState {
    Inactive,
    Active,
    Completed,
}

/// Result of [`ShiftMonitor::activate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Watchdog running with `pending` check-ins queued.
    Started { pending: usize },
    /// No future check-ins were left, so the shift completed on the spot.
    Completed,
}

/// Point-in-time view of the monitor, including the shift record with its
/// checked flags and alarm log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub state:   ShiftState,
    pub alarm:   bool,
    pub pending: usize,
    pub shift:   Option<Shift>,
}

/// Cloneable handle to the monitor task.
///
/// The task exits once every handle is dropped.
#[derive(Clone)]
pub struct ShiftMonitor {
    commands: mpsc::Sender<Command>,
}

impl ShiftMonitor {
    /// Validate `config` and spawn the monitor task on the current runtime.
    pub fn spawn(
        config: MonitorConfig,
        bus:    Arc<dyn MessageBus>,
        clock:  Arc<dyn Clock>,
    ) -> MonitorResult<(Self, JoinHandle<()>)> {
        config.validate()?;
        let (tx, rx) = mpsc::channel(config.command_buffer);
        let actor = MonitorActor::new(config, bus, clock, tx.downgrade());
        let task = tokio::spawn(actor.run(rx));
        Ok((Self { commands: tx }, task))
    }

    /// Load `shift` into a fresh check-in queue and start the watchdog.
    /// Replaces any shift already being monitored.
    pub async fn activate(&self, shift: Shift) -> MonitorResult<Activation> {
        self.request(|reply| Command::Activate { shift, reply }).await?
    }

    /// Stop monitoring and discard the queue.  Returns `false` if no shift
    /// was active.
    pub async fn deactivate(&self) -> MonitorResult<bool> {
        self.request(|reply| Command::Deactivate { reply }).await?
    }

    /// Classify a scan.  `None` if no shift is active.
    pub async fn handle_scan(&self, scan: ScanEvent) -> MonitorResult<Option<Classification>> {
        self.request(|reply| Command::Scan { scan, reply }).await?
    }

    /// Returns `true` if the alarm was previously off.
    pub async fn raise_alarm(&self) -> MonitorResult<bool> {
        self.request(|reply| Command::Alarm { on: true, reply }).await
    }

    /// Returns `true` if the alarm was previously on.
    pub async fn silence_alarm(&self) -> MonitorResult<bool> {
        self.request(|reply| Command::Alarm { on: false, reply }).await
    }

    pub async fn snapshot(&self) -> MonitorResult<MonitorStatus> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> MonitorResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands.send(command(reply)).await.map_err(|_| MonitorError::Stopped)?;
        response.await.map_err(|_| MonitorError::Stopped)
    }
}
