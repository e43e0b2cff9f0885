//! `sp-graph` — checkpoint graph, patrol paths, and connectivity validation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `CheckpointGraph` (CSR), `CheckpointGraphBuilder`, `PatrolPath` |
//! | [`validate`] | `validate_connected`, single-circuit check                |
//! | [`loader`]   | `load_paths_csv`, `load_paths_reader`                      |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                             |
//!
//! A patrol path is undirected in meaning but stored as two directed edges so
//! the circuit generator can walk it either way.  Coverage of the generated
//! circuit is measured against the directed edges, so a graph with `P`
//! bidirectional paths requires `2P` distinct traversals.

pub mod error;
pub mod loader;
pub mod network;
pub mod validate;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use loader::{load_paths_csv, load_paths_reader};
pub use network::{AdjacencyMap, CheckpointGraph, CheckpointGraphBuilder, PatrolPath};
pub use validate::validate_connected;
