//! Time-ordered queue of pending check-ins for the monitored shift.
//!
//! The queue is owned by the monitor task.  The scan validator may only set
//! `checked` on an entry; only the watchdog removes entries, and only from the
//! front.

use std::collections::VecDeque;

use sp_circuit::{CheckIn, Route};
use sp_core::{CardId, Epoch};

#[cfg(feature = "fx-hash")]
pub type CardSet = rustc_hash::FxHashSet<CardId>;
#[cfg(not(feature = "fx-hash"))]
pub type CardSet = std::collections::HashSet<CardId>;

#[derive(Debug, Default)]
pub struct CheckInQueue {
    entries: VecDeque<CheckIn>,
    cards:   CardSet,
}

impl CheckInQueue {
    /// Flatten `routes` into one queue sorted by expected time, keeping only
    /// check-ins strictly after `now`.  The on-duty card set covers every
    /// route, including sentries with nothing left to do.
    pub fn assemble(routes: &[Route], now: Epoch) -> Self {
        let mut pending: Vec<CheckIn> = routes
            .iter()
            .flat_map(|r| r.check_ins.iter())
            .filter(|c| c.time > now)
            .cloned()
            .collect();
        // Stable: equal times keep route order.
        pending.sort_by_key(|c| c.time);

        Self {
            entries: pending.into(),
            cards:   routes.iter().map(|r| r.card.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_on_duty(&self, card: &CardId) -> bool {
        self.cards.contains(card)
    }

    pub fn front(&self) -> Option<&CheckIn> {
        self.entries.front()
    }

    pub(crate) fn pop_front(&mut self) -> Option<CheckIn> {
        self.entries.pop_front()
    }

    /// Entries in expected-time order.
    pub fn iter(&self) -> impl Iterator<Item = &CheckIn> + '_ {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CheckIn> + '_ {
        self.entries.iter_mut()
    }
}
