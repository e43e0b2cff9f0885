//! CSV patrol-path loader.
//!
//! # CSV format
//!
//! One row per patrol path.  `directed` is optional and defaults to `false`,
//! which adds the path in both directions.
//!
//! ```csv
//! src,dest,duration_secs,directed
//! A,B,90,
//! B,C,90,
//! A,D,60,
//! D,A,45,true
//! ```
//!
//! Checkpoints are registered in first-appearance order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{CheckpointGraph, CheckpointGraphBuilder, GraphError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PathRecord {
    src:           String,
    dest:          String,
    duration_secs: u32,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    directed:      Option<bool>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a checkpoint graph from a CSV file.
pub fn load_paths_csv(path: &Path) -> Result<CheckpointGraph, GraphError> {
    let file = std::fs::File::open(path).map_err(GraphError::Io)?;
    load_paths_reader(file)
}

/// Like [`load_paths_csv`] but accepts any `Read` source.
pub fn load_paths_reader<R: Read>(reader: R) -> Result<CheckpointGraph, GraphError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut b = CheckpointGraphBuilder::new();

    for result in csv_reader.deserialize::<PathRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        if row.directed.unwrap_or(false) {
            b.add_directed_path(row.src, row.dest, row.duration_secs)?;
        } else {
            b.add_path(row.src, row.dest, row.duration_secs)?;
        }
    }

    Ok(b.build())
}
