//! Circuit records: check-ins, routes, path frequencies, and the shift.
//!
//! Field names follow the JSON the rest of the platform exchanges, so these
//! types serialize straight onto the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sp_core::{CardId, CheckpointId, Epoch};

// ── CheckIn ───────────────────────────────────────────────────────────────────

/// One scheduled check-in: sentry `card` is due at `checkpoint` at `time`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    #[serde(rename = "id")]
    pub card:       CardId,
    pub checkpoint: CheckpointId,
    pub time:       Epoch,
    /// Set once a valid scan has matched this check-in.
    #[serde(default)]
    pub checked:    bool,
}

impl CheckIn {
    pub fn new(card: CardId, checkpoint: CheckpointId, time: Epoch) -> Self {
        Self { card, checkpoint, time, checked: false }
    }
}

// ── SentryAssignment ──────────────────────────────────────────────────────────

/// A sentry put on duty for a shift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryAssignment {
    pub name: String,
    /// Human-readable card label printed on the badge.
    #[serde(rename = "card")]
    pub card_alias: String,
    /// Card identifier reported by checkpoint readers.
    #[serde(rename = "id")]
    pub card: CardId,
}

impl SentryAssignment {
    pub fn new(name: impl Into<String>, card_alias: impl Into<String>, card: impl Into<CardId>) -> Self {
        Self { name: name.into(), card_alias: card_alias.into(), card: card.into() }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The ordered check-ins assigned to one sentry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    #[serde(rename = "card")]
    pub card_alias: String,
    #[serde(rename = "id")]
    pub card: CardId,
    #[serde(rename = "route")]
    pub check_ins: Vec<CheckIn>,
}

impl Route {
    /// Start an empty route for `sentry`.
    pub fn for_sentry(sentry: &SentryAssignment) -> Self {
        Self {
            name:       sentry.name.clone(),
            card_alias: sentry.card_alias.clone(),
            card:       sentry.card.clone(),
            check_ins:  Vec::new(),
        }
    }

    /// `true` if check-in times never decrease along the route.
    pub fn is_chronological(&self) -> bool {
        self.check_ins.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Consecutive `(from, to)` checkpoint pairs walked by this route.
    pub fn legs(&self) -> impl Iterator<Item = (&CheckpointId, &CheckpointId)> + '_ {
        self.check_ins.windows(2).map(|w| (&w[0].checkpoint, &w[1].checkpoint))
    }
}

// ── PathFrequency ─────────────────────────────────────────────────────────────

/// How many times a directed path was walked across all routes of a shift.
///
/// Serialized as `[[src, dest], count]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PathFrequencyRepr", into = "PathFrequencyRepr")]
pub struct PathFrequency {
    pub src:   CheckpointId,
    pub dest:  CheckpointId,
    pub count: u32,
}

type PathFrequencyRepr = ((CheckpointId, CheckpointId), u32);

impl From<PathFrequencyRepr> for PathFrequency {
    fn from(((src, dest), count): PathFrequencyRepr) -> Self {
        Self { src, dest, count }
    }
}

impl From<PathFrequency> for PathFrequencyRepr {
    fn from(f: PathFrequency) -> Self {
        ((f.src, f.dest), f.count)
    }
}

// ── Shift ─────────────────────────────────────────────────────────────────────

/// A generated patrol shift: the routes of every sentry plus bookkeeping that
/// accumulates while the shift runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    #[serde(rename = "shift_start")]
    pub start: Epoch,
    #[serde(rename = "shift_end")]
    pub end: Epoch,
    /// Path frequency table, most-walked first.
    pub path_freqs: Vec<PathFrequency>,
    pub routes: Vec<Route>,
    /// Epochs at which the alarm was raised during the shift.
    #[serde(default)]
    pub alarms: Vec<Epoch>,
    #[serde(default)]
    pub completed: bool,
}

impl Shift {
    /// Rebuild a shift record from routes alone, as received from the bus.
    ///
    /// The window spans the earliest to the latest check-in and the frequency
    /// table is recounted from the legs of each route.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let times = routes.iter().flat_map(|r| r.check_ins.iter().map(|c| c.time));
        let start = times.clone().min().unwrap_or_default();
        let end = times.max().unwrap_or_default();

        let mut counts: BTreeMap<(&CheckpointId, &CheckpointId), u32> = BTreeMap::new();
        for leg in routes.iter().flat_map(Route::legs) {
            *counts.entry(leg).or_default() += 1;
        }
        let mut path_freqs: Vec<PathFrequency> = counts
            .into_iter()
            .map(|((src, dest), count)| PathFrequency { src: src.clone(), dest: dest.clone(), count })
            .collect();
        path_freqs.sort_by(|a, b| b.count.cmp(&a.count));

        Self { start, end, path_freqs, routes, alarms: Vec::new(), completed: false }
    }

    /// Iterator over every check-in of every route.
    pub fn check_ins(&self) -> impl Iterator<Item = &CheckIn> + '_ {
        self.routes.iter().flat_map(|r| r.check_ins.iter())
    }

    /// Card identifiers of the sentries on duty, in route order.
    pub fn cards(&self) -> impl Iterator<Item = &CardId> + '_ {
        self.routes.iter().map(|r| &r.card)
    }

    /// `max(count) - min(count)` over the frequency table, or `0` if empty.
    pub fn frequency_spread(&self) -> u32 {
        let max = self.path_freqs.iter().map(|f| f.count).max().unwrap_or(0);
        let min = self.path_freqs.iter().map(|f| f.count).min().unwrap_or(0);
        max - min
    }

    /// Mark the first check-in of `card`'s route at `checkpoint` whose time
    /// window contains `at`.  Returns `false` if nothing matched.
    pub fn record_scan(
        &mut self,
        card:       &CardId,
        checkpoint: &CheckpointId,
        at:         Epoch,
        window_secs: u32,
    ) -> bool {
        let hit = self
            .routes
            .iter_mut()
            .filter(|r| &r.card == card)
            .flat_map(|r| r.check_ins.iter_mut())
            .find(|c| &c.checkpoint == checkpoint && at.within(c.time, window_secs));
        match hit {
            Some(c) => {
                c.checked = true;
                true
            }
            None => false,
        }
    }

    /// `true` if `card` already has a checked check-in at `checkpoint` whose
    /// time window contains `at`.
    pub fn was_recorded(
        &self,
        card:       &CardId,
        checkpoint: &CheckpointId,
        at:         Epoch,
        window_secs: u32,
    ) -> bool {
        self.routes
            .iter()
            .filter(|r| &r.card == card)
            .flat_map(|r| r.check_ins.iter())
            .any(|c| c.checked && &c.checkpoint == checkpoint && at.within(c.time, window_secs))
    }

    /// Append an alarm epoch to the shift record.
    pub fn record_alarm(&mut self, at: Epoch) {
        self.alarms.push(at);
    }
}
