//! Inbound dispatch: turns bus messages into monitor calls.
//!
//! The dispatcher owns the shift switch and the most recent circuit.  A shift
//! is activated whenever both are present, whichever arrives last.

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use sp_circuit::{Route, Shift};

use crate::{Message, MonitorError, MonitorResult, ScanEvent, ShiftMonitor, topics};

/// A parsed inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundEvent {
    Circuit(Shift),
    ShiftSwitch(bool),
    Scan(ScanEvent),
    Alarm(bool),
}

/// A circuit arrives either as a bare list of routes or as a full shift record.
#[derive(Deserialize)]
#[serde(untagged)]
enum CircuitPayload {
    Shift(Shift),
    Routes(Vec<Route>),
}

impl InboundEvent {
    /// Parse `msg`.  `Ok(None)` for topics the monitor does not handle.
    pub fn parse(msg: &Message) -> MonitorResult<Option<Self>> {
        let event = match msg.topic.as_str() {
            topics::SENTRY_CIRCUIT => match msg.decode::<CircuitPayload>()? {
                CircuitPayload::Shift(shift) => Self::Circuit(shift),
                CircuitPayload::Routes(routes) => Self::Circuit(Shift::from_routes(routes)),
            },
            topics::SHIFT_STATUS => Self::ShiftSwitch(on_off(msg)?),
            topics::SCAN_INFO => Self::Scan(msg.decode()?),
            topics::ALARM => Self::Alarm(on_off(msg)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

fn on_off(msg: &Message) -> MonitorResult<bool> {
    match msg.as_str() {
        Some("ON") => Ok(true),
        Some("OFF") => Ok(false),
        _ => Err(MonitorError::UnexpectedPayload {
            topic:  msg.topic.clone(),
            detail: format!("expected \"ON\" or \"OFF\", got {}", msg.payload),
        }),
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

pub struct Dispatcher {
    monitor:   ShiftMonitor,
    switch_on: bool,
    pending:   Option<Shift>,
}

impl Dispatcher {
    pub fn new(monitor: ShiftMonitor) -> Self {
        Self { monitor, switch_on: false, pending: None }
    }

    pub fn monitor(&self) -> &ShiftMonitor {
        &self.monitor
    }

    /// Parse and apply one message.  Unknown topics are ignored.
    pub async fn dispatch(&mut self, msg: &Message) -> MonitorResult<()> {
        match InboundEvent::parse(msg)? {
            Some(event) => self.apply(event).await,
            None => {
                debug!(topic = %msg.topic, "ignoring message on unhandled topic");
                Ok(())
            }
        }
    }

    pub async fn apply(&mut self, event: InboundEvent) -> MonitorResult<()> {
        match event {
            InboundEvent::Circuit(shift) => {
                self.pending = Some(shift);
                if self.switch_on {
                    self.activate_pending().await?;
                }
            }
            InboundEvent::ShiftSwitch(true) => {
                if self.switch_on {
                    debug!("shift switch already on");
                    return Ok(());
                }
                self.switch_on = true;
                self.activate_pending().await?;
            }
            InboundEvent::ShiftSwitch(false) => {
                self.switch_on = false;
                self.monitor.deactivate().await?;
            }
            InboundEvent::Scan(scan) => {
                self.monitor.handle_scan(scan).await?;
            }
            InboundEvent::Alarm(true) => {
                self.monitor.raise_alarm().await?;
            }
            InboundEvent::Alarm(false) => {
                self.monitor.silence_alarm().await?;
            }
        }
        Ok(())
    }

    async fn activate_pending(&mut self) -> MonitorResult<()> {
        match &self.pending {
            Some(shift) => {
                self.monitor.activate(shift.clone()).await?;
            }
            None => debug!("shift switched on with no circuit yet"),
        }
        Ok(())
    }

    /// Apply messages until `inbound` closes or the monitor stops.  Bad
    /// messages are logged and dropped.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<Message>) {
        while let Some(msg) = inbound.recv().await {
            match self.dispatch(&msg).await {
                Ok(()) => {}
                Err(MonitorError::Stopped) => {
                    error!("shift monitor stopped; dispatcher exiting");
                    break;
                }
                Err(e) => warn!(topic = %msg.topic, error = %e, "dropped inbound message"),
            }
        }
    }
}
