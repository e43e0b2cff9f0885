//! `sp-circuit` — patrol-circuit generation and shift records.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`circuit`]   | `CheckIn`, `Route`, `SentryAssignment`, `PathFrequency`, `Shift` |
//! | [`generator`] | `CircuitGenerator`, `GeneratorConfig`                      |
//! | [`loader`]    | `load_sentries_csv`, `load_sentries_reader`                |
//! | [`error`]     | `CircuitError`, `CircuitResult<T>`                         |
//!
//! # Acceptance rule (summary)
//!
//! A generated circuit is accepted only if every directed edge of the graph
//! was walked at least once and
//!
//! ```text
//! max(count) - min(count) <= sqrt(edge_count)
//! ```
//!
//! Otherwise the whole circuit is discarded and every sentry is walked again.

pub mod circuit;
pub mod error;
pub mod generator;
pub mod loader;


pub use circuit::{CheckIn, PathFrequency, Route, SentryAssignment, Shift};
pub use error::{CircuitError, CircuitResult};
pub use generator::{CircuitGenerator, GeneratorConfig};
pub use loader::{load_sentries_csv, load_sentries_reader};
