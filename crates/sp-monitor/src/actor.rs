//! The monitor task: sole owner of the check-in queue and shift state.
//!
//! Scans, lifecycle changes, and watchdog ticks all arrive as [`Command`]s on
//! one channel and are applied one at a time, so a watchdog pop can never
//! interleave with a scan marking the same entry.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sp_circuit::Shift;
use sp_core::Clock;

use crate::monitor::{Activation, MonitorStatus, ShiftState};
use crate::watchdog::{self, TickOutcome, Watchdog};
use crate::{
    CheckInQueue, Classification, Message, MessageBus, MonitorConfig, MonitorResult, ScanEvent,
    ScanOutcome, ScanValidator, topics,
};

pub(crate) enum Command {
    Activate   { shift: Shift, reply: oneshot::Sender<MonitorResult<Activation>> },
    Deactivate { reply: oneshot::Sender<MonitorResult<bool>> },
    Scan       { scan: ScanEvent, reply: oneshot::Sender<MonitorResult<Option<Classification>>> },
    Alarm      { on: bool, reply: oneshot::Sender<bool> },
    Snapshot   { reply: oneshot::Sender<MonitorStatus> },
    /// Sent by the watchdog task.  The reply says whether to keep polling.
    Tick       { generation: u64, reply: oneshot::Sender<bool> },
}

pub(crate) struct MonitorActor {
    config:     MonitorConfig,
    bus:        Arc<dyn MessageBus>,
    clock:      Arc<dyn Clock>,
    commands:   mpsc::WeakSender<Command>,
    validator:  ScanValidator,
    watchdog:   Watchdog,

    state:      ShiftState,
    alarm:      bool,
    queue:      CheckInQueue,
    shift:      Option<Shift>,
    /// Bumped whenever the running watchdog must stop.
    generation: u64,
    poller:     Option<JoinHandle<()>>,
}

impl MonitorActor {
    pub(crate) fn new(
        config:   MonitorConfig,
        bus:      Arc<dyn MessageBus>,
        clock:    Arc<dyn Clock>,
        commands: mpsc::WeakSender<Command>,
    ) -> Self {
        let window = config.check_in_window_secs;
        Self {
            config,
            bus,
            clock,
            commands,
            validator:  ScanValidator::new(window),
            watchdog:   Watchdog::new(window),
            state:      ShiftState::Inactive,
            alarm:      false,
            queue:      CheckInQueue::default(),
            shift:      None,
            generation: 0,
            poller:     None,
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(client = %self.config.client_id, window_secs = self.config.check_in_window_secs, "shift monitor started");
        while let Some(cmd) = commands.recv().await {
            self.handle(cmd).await;
        }
        self.stop_watchdog();
        info!(client = %self.config.client_id, "shift monitor stopped");
    }

    async fn handle(&mut self, cmd: Command) {
        // A dropped reply receiver only means the caller stopped waiting.
        match cmd {
            Command::Activate { shift, reply } => {
                let _ = reply.send(self.activate(shift).await);
            }
            Command::Deactivate { reply } => {
                let _ = reply.send(self.deactivate().await);
            }
            Command::Scan { scan, reply } => {
                let _ = reply.send(self.scan(scan).await);
            }
            Command::Alarm { on, reply } => {
                let _ = reply.send(self.set_alarm(on));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.status());
            }
            Command::Tick { generation, reply } => {
                let _ = reply.send(self.tick(generation).await);
            }
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    async fn activate(&mut self, shift: Shift) -> MonitorResult<Activation> {
        self.stop_watchdog();
        self.queue = CheckInQueue::assemble(&shift.routes, self.clock.now());
        let pending = self.queue.len();
        info!(sentries = shift.routes.len(), pending, "shift activated");
        self.shift = Some(shift);
        self.state = ShiftState::Active;
        self.bus.publish(Message::shift_status(true)).await?;

        if self.queue.is_empty() && !self.alarm {
            self.complete().await?;
            return Ok(Activation::Completed);
        }
        self.start_watchdog();
        Ok(Activation::Started { pending })
    }

    async fn deactivate(&mut self) -> MonitorResult<bool> {
        if self.state != ShiftState::Active {
            return Ok(false);
        }
        self.stop_watchdog();
        self.queue = CheckInQueue::default();
        self.state = ShiftState::Inactive;
        info!("shift deactivated");
        self.bus.publish(Message::shift_status(false)).await?;
        Ok(true)
    }

    async fn complete(&mut self) -> MonitorResult<()> {
        self.stop_watchdog();
        self.state = ShiftState::Completed;
        if let Some(shift) = self.shift.as_mut() {
            shift.completed = true;
        }
        info!("circuit complete");
        self.bus.publish(Message::shift_status(false)).await?;
        self.bus.publish(Message::circuit_complete()).await
    }

    fn start_watchdog(&mut self) {
        self.poller = Some(watchdog::spawn(self.commands.clone(), self.generation, self.config.poll_interval));
    }

    fn stop_watchdog(&mut self) {
        self.generation += 1;
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }

    // ── Alarm ─────────────────────────────────────────────────────────────

    /// Returns `true` if the flag changed.
    fn set_alarm(&mut self, on: bool) -> bool {
        if self.alarm == on {
            return false;
        }
        self.alarm = on;
        if on {
            let now = self.clock.now();
            warn!(at = %now, "alarm raised");
            if self.state == ShiftState::Active {
                if let Some(shift) = self.shift.as_mut() {
                    shift.record_alarm(now);
                }
            }
        } else {
            info!("alarm silenced");
        }
        true
    }

    // ── Scans ─────────────────────────────────────────────────────────────

    async fn scan(&mut self, scan: ScanEvent) -> MonitorResult<Option<Classification>> {
        if self.state != ShiftState::Active {
            debug!(card = %scan.card, checkpoint = %scan.checkpoint, "scan ignored: no active shift");
            return Ok(None);
        }

        let mut outcome = self.validator.classify(&mut self.queue, &scan);
        // A re-delivered scan whose check-in the watchdog already cleared.
        let window = self.config.check_in_window_secs;
        if !outcome.is_valid()
            && self.shift.as_ref().is_some_and(|s| s.was_recorded(&scan.card, &scan.checkpoint, scan.time, window))
        {
            debug!(card = %scan.card, checkpoint = %scan.checkpoint, time = %scan.time, "duplicate of a recorded scan");
            outcome = ScanOutcome::Valid;
        }
        if outcome.is_valid() {
            if let Some(shift) = self.shift.as_mut() {
                shift.record_scan(&scan.card, &scan.checkpoint, scan.time, window);
            }
            info!(card = %scan.card, checkpoint = %scan.checkpoint, time = %scan.time, "valid scan");
        } else {
            warn!(card = %scan.card, checkpoint = %scan.checkpoint, time = %scan.time, reason = ?outcome, "invalid scan");
            self.set_alarm(true);
        }

        let classification = Classification::new(outcome, scan);
        self.bus.publish(Message::new(topics::ALERTS, &classification)?).await?;
        Ok(Some(classification))
    }

    // ── Watchdog ──────────────────────────────────────────────────────────

    async fn tick(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != ShiftState::Active {
            return false;
        }
        match self.watchdog.tick(&mut self.queue, self.alarm, self.clock.now()) {
            TickOutcome::Suppressed | TickOutcome::Waiting => true,
            TickOutcome::Cleared(entry) => {
                debug!(card = %entry.card, checkpoint = %entry.checkpoint, "check-in satisfied");
                true
            }
            TickOutcome::Overdue(entry) => {
                warn!(card = %entry.card, checkpoint = %entry.checkpoint, expected = %entry.time, "check-in overdue");
                self.set_alarm(true);
                let sent = match Message::new(topics::overdue_topic(entry.checkpoint.as_str()), &entry) {
                    Ok(msg) => self.bus.publish(msg).await,
                    Err(e) => Err(e.into()),
                };
                if let Err(e) = sent {
                    warn!(error = %e, "failed to publish overdue check-in");
                }
                true
            }
            TickOutcome::Complete => {
                if let Err(e) = self.complete().await {
                    warn!(error = %e, "failed to publish circuit completion");
                }
                false
            }
        }
    }

    fn status(&self) -> MonitorStatus {
        MonitorStatus {
            state:   self.state,
            alarm:   self.alarm,
            pending: self.queue.len(),
            shift:   self.shift.clone(),
        }
    }
}
