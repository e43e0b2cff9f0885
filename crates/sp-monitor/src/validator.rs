//! Scan classification against the live check-in queue.

use serde::{Deserialize, Serialize};

use sp_core::{CardId, CheckpointId, Epoch};

use crate::CheckInQueue;

/// A raw scan reported by a checkpoint reader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub checkpoint: CheckpointId,
    #[serde(rename = "sentry-id")]
    pub card: CardId,
    #[serde(rename = "scan-time")]
    pub time: Epoch,
}

/// Closed set of scan classifications.  Serializes as the `reason` string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    #[serde(rename = "")]
    Valid,
    /// Card is not assigned to the shift.  Whether it is unknown or stolen is
    /// for the card registry to decide.
    #[serde(rename = "card not on duty")]
    CardNotOnDuty,
    #[serde(rename = "wrong checkpoint")]
    WrongCheckpoint,
    #[serde(rename = "wrong time of scan")]
    WrongTimeOfScan,
}

impl ScanOutcome {
    pub fn is_valid(self) -> bool {
        self == ScanOutcome::Valid
    }
}

/// Outbound classification: `{valid, reason, checkpoint, sentry-id, scan-time}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub valid:  bool,
    pub reason: ScanOutcome,
    #[serde(flatten)]
    pub scan:   ScanEvent,
}

impl Classification {
    pub fn new(outcome: ScanOutcome, scan: ScanEvent) -> Self {
        Self { valid: outcome.is_valid(), reason: outcome, scan }
    }
}

// ── ScanValidator ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct ScanValidator {
    window_secs: u32,
}

impl ScanValidator {
    pub fn new(window_secs: u32) -> Self {
        Self { window_secs }
    }

    /// Classify `scan` and mark at most one entry checked.
    ///
    /// Entries are visited front to back.  The first entry with the same card
    /// and checkpoint whose window contains the scan wins.  A same-card entry
    /// in window at another checkpoint makes a miss "wrong checkpoint".  The
    /// walk stops at the first entry whose window opens after the scan.
    pub fn classify(&self, queue: &mut CheckInQueue, scan: &ScanEvent) -> ScanOutcome {
        if !queue.is_on_duty(&scan.card) {
            return ScanOutcome::CardNotOnDuty;
        }

        let w = self.window_secs;
        let mut wrong_checkpoint = false;
        for entry in queue.iter_mut() {
            if scan.time.is_before_window(entry.time, w) {
                break;
            }
            if entry.card != scan.card || !scan.time.within(entry.time, w) {
                continue;
            }
            if entry.checkpoint == scan.checkpoint {
                entry.checked = true;
                return ScanOutcome::Valid;
            }
            wrong_checkpoint = true;
        }

        if wrong_checkpoint {
            ScanOutcome::WrongCheckpoint
        } else {
            ScanOutcome::WrongTimeOfScan
        }
    }
}
