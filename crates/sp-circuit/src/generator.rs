//! Weighted random-walk circuit generator.
//!
//! # Algorithm
//!
//! Each attempt walks every sentry independently from a uniformly random
//! checkpoint.  At each step the next path is drawn from the current
//! checkpoint's outgoing edges with probability proportional to its weight,
//! and the chosen weight is halved, so recently walked paths become less
//! likely.  Weights are shared by all sentries of one attempt.  A sentry stops
//! once its accumulated time reaches the shift end; the final check-in may
//! therefore fall after `shift_end`.
//!
//! An attempt is accepted when every directed edge was walked and the path
//! frequencies differ by at most `sqrt(edge_count)`.  Rejected attempts are
//! discarded whole.
//!
//! # Determinism
//!
//! Attempt `k` draws from `AttemptRng::new(seed, k)`.  The accepted circuit is
//! the lowest-numbered accepted attempt, with or without the `parallel`
//! feature.

use std::collections::HashSet;

use tracing::{debug, info};

use sp_core::{AttemptRng, CheckpointId, Epoch, NodeIdx, ShiftWindow, fresh_seed};
use sp_graph::{CheckpointGraph, validate_connected};

use crate::{CheckIn, CircuitError, CircuitResult, PathFrequency, Route, SentryAssignment, Shift};

/// Weight below which a checkpoint's weights are rescaled.
const WEIGHT_FLOOR: f64 = 1.0;

// ── GeneratorConfig ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Attempts before giving up with `AttemptsExhausted`.  Must be > 0.
    pub max_attempts: u32,

    /// Run seed.  `None` draws one from OS entropy per `generate` call.
    pub seed: Option<u64>,

    /// Starting weight of every directed edge.
    pub initial_weight: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts:   10_000,
            seed:           None,
            initial_weight: i64::MAX as f64,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    fn validate(&self) -> CircuitResult<()> {
        if self.max_attempts == 0 {
            return Err(CircuitError::Config("max_attempts must be at least 1".into()));
        }
        if !(self.initial_weight.is_finite() && self.initial_weight >= WEIGHT_FLOOR) {
            return Err(CircuitError::Config(format!(
                "initial_weight must be finite and >= {WEIGHT_FLOOR}, got {}",
                self.initial_weight
            )));
        }
        Ok(())
    }
}

// ── CircuitGenerator ──────────────────────────────────────────────────────────

/// Generates balanced patrol circuits over one checkpoint graph.
pub struct CircuitGenerator<'g> {
    graph:  &'g CheckpointGraph,
    config: GeneratorConfig,
}

/// Routes and per-edge walk counts of a single attempt.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct Attempt {
    routes: Vec<Route>,
    counts: Vec<u32>,
}

enum Verdict {
    Accepted,
    Uncovered { covered: usize },
    Unbalanced { spread: u32 },
}

impl<'g> CircuitGenerator<'g> {
    /// Validate the graph and configuration up front.
    ///
    /// The graph must be connected and every checkpoint needs at least one
    /// outgoing path, otherwise a walk could strand a sentry.
    pub fn new(graph: &'g CheckpointGraph, config: GeneratorConfig) -> CircuitResult<Self> {
        config.validate()?;
        validate_connected(graph)?;
        for i in 0..graph.node_count() {
            let node = NodeIdx(i as u32);
            if graph.out_degree(node) == 0 {
                return Err(CircuitError::DeadEnd(graph.checkpoint(node).clone()));
            }
        }
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a shift of `duration_secs` starting at `start`.
    pub fn generate(
        &self,
        sentries:      &[SentryAssignment],
        start:         Epoch,
        duration_secs: i64,
    ) -> CircuitResult<Shift> {
        if sentries.is_empty() {
            return Err(CircuitError::NoSentries);
        }
        let mut seen = HashSet::new();
        for s in sentries {
            if !seen.insert(&s.card) {
                return Err(CircuitError::DuplicateCard(s.card.clone()));
            }
        }
        if duration_secs <= 0 {
            return Err(CircuitError::NonPositiveDuration(duration_secs));
        }
        let secs = u32::try_from(duration_secs)
            .map_err(|_| CircuitError::DurationTooLong(duration_secs))?;
        let window = ShiftWindow::new(start, secs);
        let seed = self.config.seed.unwrap_or_else(fresh_seed);

        info!(
            sentries = sentries.len(),
            checkpoints = self.graph.node_count(),
            paths = self.graph.edge_count(),
            duration_secs,
            seed,
            "generating patrol circuit"
        );

        let (attempt_no, attempt) = self
            .search(sentries, window, seed)
            .ok_or(CircuitError::AttemptsExhausted { attempts: self.config.max_attempts })?;

        info!(attempt = attempt_no, "circuit accepted");
        Ok(Shift {
            start:      window.start,
            end:        window.end,
            path_freqs: self.frequency_table(&attempt.counts),
            routes:     attempt.routes,
            alarms:     Vec::new(),
            completed:  false,
        })
    }

    // ── Search ────────────────────────────────────────────────────────────

    #[cfg(not(feature = "parallel"))]
    fn search(&self, sentries: &[SentryAssignment], window: ShiftWindow, seed: u64) -> Option<(u32, Attempt)> {
        self.search_in_order(sentries, window, seed)
    }

    #[cfg(any(test, not(feature = "parallel")))]
    fn search_in_order(&self, sentries: &[SentryAssignment], window: ShiftWindow, seed: u64) -> Option<(u32, Attempt)> {
        (0..self.config.max_attempts).find_map(|k| self.try_attempt(sentries, window, seed, k))
    }

    #[cfg(feature = "parallel")]
    fn search(&self, sentries: &[SentryAssignment], window: ShiftWindow, seed: u64) -> Option<(u32, Attempt)> {
        use rayon::prelude::*;

        let batch = rayon::current_num_threads().max(1) as u32;
        let max = self.config.max_attempts;
        let mut next = 0;
        while next < max {
            let end = next.saturating_add(batch).min(max);
            let found = (next..end)
                .into_par_iter()
                .find_map_first(|k| self.try_attempt(sentries, window, seed, k));
            if found.is_some() {
                return found;
            }
            next = end;
        }
        None
    }

    fn try_attempt(
        &self,
        sentries: &[SentryAssignment],
        window:   ShiftWindow,
        seed:     u64,
        k:        u32,
    ) -> Option<(u32, Attempt)> {
        let mut rng = AttemptRng::new(seed, k);
        let attempt = self.walk_all(sentries, window, &mut rng);
        match self.judge(&attempt.counts) {
            Verdict::Accepted => Some((k, attempt)),
            Verdict::Uncovered { covered } => {
                debug!(attempt = k, covered, paths = self.graph.edge_count(), "rejected: paths not covered");
                None
            }
            Verdict::Unbalanced { spread } => {
                debug!(attempt = k, spread, "rejected: path frequencies unbalanced");
                None
            }
        }
    }

    // ── Walk ──────────────────────────────────────────────────────────────

    fn walk_all(&self, sentries: &[SentryAssignment], window: ShiftWindow, rng: &mut AttemptRng) -> Attempt {
        let mut weights = vec![self.config.initial_weight; self.graph.edge_count()];
        let mut counts = vec![0u32; self.graph.edge_count()];
        let routes = sentries
            .iter()
            .map(|s| self.walk(s, window, rng, &mut weights, &mut counts))
            .collect();
        Attempt { routes, counts }
    }

    fn walk(
        &self,
        sentry:  &SentryAssignment,
        window:  ShiftWindow,
        rng:     &mut AttemptRng,
        weights: &mut [f64],
        counts:  &mut [u32],
    ) -> Route {
        let g = self.graph;
        let mut route = Route::for_sentry(sentry);
        let mut at = NodeIdx(rng.gen_range(0..g.node_count() as u32));
        let mut now = window.start;
        route.check_ins.push(self.check_in(sentry, at, now));

        while now < window.end {
            let first = g.first_out_edge(at).index();
            let local = &mut weights[first..first + g.out_degree(at)];
            let pick = rng
                .weighted_index(local)
                .unwrap_or_else(|| rng.gen_range(0..local.len()));
            halve(local, pick, self.config.initial_weight);

            let edge = first + pick;
            counts[edge] += 1;
            now = now.offset(g.edge_secs[edge]);
            at = g.edge_to[edge];
            route.check_ins.push(self.check_in(sentry, at, now));
        }
        route
    }

    fn check_in(&self, sentry: &SentryAssignment, at: NodeIdx, time: Epoch) -> CheckIn {
        CheckIn::new(sentry.card.clone(), self.graph.checkpoint(at).clone(), time)
    }

    // ── Acceptance ────────────────────────────────────────────────────────

    fn judge(&self, counts: &[u32]) -> Verdict {
        let covered = counts.iter().filter(|&&c| c > 0).count();
        if covered != counts.len() {
            return Verdict::Uncovered { covered };
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        let min = counts.iter().copied().min().unwrap_or(0);
        let spread = max - min;
        if f64::from(spread) <= (counts.len() as f64).sqrt() {
            Verdict::Accepted
        } else {
            Verdict::Unbalanced { spread }
        }
    }

    /// Frequency table sorted by descending count.  Ties keep graph order.
    fn frequency_table(&self, counts: &[u32]) -> Vec<PathFrequency> {
        let g = self.graph;
        let mut table: Vec<PathFrequency> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(e, &count)| PathFrequency {
                src:  label(g, g.edge_from[e]),
                dest: label(g, g.edge_to[e]),
                count,
            })
            .collect();
        table.sort_by(|a, b| b.count.cmp(&a.count));
        table
    }
}

fn label(g: &CheckpointGraph, n: NodeIdx) -> CheckpointId {
    g.checkpoint(n).clone()
}

/// Halve the chosen weight.  If it drops below the floor, scale the whole
/// checkpoint so its largest weight is back at `ceiling`; ratios are kept.
fn halve(weights: &mut [f64], pick: usize, ceiling: f64) {
    weights[pick] /= 2.0;
    if weights[pick] < WEIGHT_FLOOR {
        let max = weights.iter().copied().fold(0.0_f64, f64::max);
        let scale = ceiling / max;
        for w in weights.iter_mut() {
            *w *= scale;
        }
    }
}
