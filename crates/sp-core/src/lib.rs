//! `sp-core` — foundational types for the sentry-patrol workspace.
//!
//! This crate is a dependency of every other `sp-*` crate.  It has no `sp-*`
//! dependencies and only two external ones (`rand`, `serde`).  Nothing here can fail, so
//! there is no error type; each downstream crate defines its own.
//!
//! # What lives here
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`ids`]   | `NodeIdx`, `EdgeIdx`, `CheckpointId`, `CardId`             |
//! | [`time`]  | `Epoch`, `ShiftWindow`, `Clock`, `SystemClock`, `ManualClock` |
//! | [`rng`]   | `AttemptRng` (per generation attempt), `fresh_seed`        |

pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{CardId, CheckpointId, EdgeIdx, NodeIdx};
pub use rng::{AttemptRng, fresh_seed};
pub use time::{Clock, Epoch, ManualClock, ShiftWindow, SystemClock};
