//! JSON-lines transport over stdin/stdout.
//!
//! Inbound:  `{"topic": "...", "payload": <json>}` per line on stdin.
//! Outbound: `{"topic", "payload", "qos", "retained"}` per line on stdout.

use std::io::{self, BufRead};

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, warn};

use sp_monitor::{Message, MessageBus, MonitorError, MonitorResult};

/// Publishes each message as one JSON line on stdout.
pub struct StdoutBus {
    out: Mutex<Stdout>,
}

impl StdoutBus {
    pub fn new() -> Self {
        Self { out: Mutex::new(tokio::io::stdout()) }
    }
}

#[async_trait]
impl MessageBus for StdoutBus {
    async fn publish(&self, message: Message) -> MonitorResult<()> {
        let mut line = serde_json::to_vec(&message)?;
        line.push(b'\n');
        let mut out = self.out.lock().await;
        out.write_all(&line).await.map_err(|e| MonitorError::Bus(e.to_string()))?;
        out.flush().await.map_err(|e| MonitorError::Bus(e.to_string()))
    }
}

/// Forward stdin lines to `inbound` until end of input.  Lines that are not
/// valid envelopes are logged and skipped.
///
/// Lines are read on a detached OS thread; a blocked read there never holds
/// up runtime shutdown.
pub async fn forward_stdin(inbound: mpsc::Sender<Message>) -> io::Result<()> {
    let (done_tx, done_rx) = oneshot::channel();
    std::thread::Builder::new().name("stdin-reader".into()).spawn(move || {
        let _ = done_tx.send(forward_lines(io::stdin().lock(), &inbound));
    })?;
    // A dropped sender means the reader thread panicked.
    done_rx.await.unwrap_or_else(|_| Err(io::Error::other("stdin reader stopped")))
}

/// Blocking loop behind [`forward_stdin`].  Stops early once `inbound` closes.
fn forward_lines<R: BufRead>(input: R, inbound: &mpsc::Sender<Message>) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Message>(line) {
            Ok(msg) => {
                debug!(topic = %msg.topic, "inbound message");
                if inbound.blocking_send(msg).is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "skipping malformed input line"),
        }
    }
    Ok(())
}
