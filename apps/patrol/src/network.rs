//! Demo checkpoint layout.
//!
//! Nine checkpoints on a 3-wide grid, named left-to-right then top-to-bottom:
//!
//! ```text
//!   A ─90─ B ─90─ C
//!   60     60     60
//!   D ─90─ E ─90─ F
//!   70     70     70
//!   G ─90─ H ─90─ I
//! ```

use sp_graph::{CheckpointGraph, CheckpointGraphBuilder, GraphResult};

const GRID_WIDTH:      usize = 3;
const LABELS:          [&str; 9] = ["A", "B", "C", "D", "E", "F", "G", "H", "I"];
const HORIZONTAL_SECS: u32 = 90;
const UPPER_SECS:      u32 = 60; // rows 1–2
const LOWER_SECS:      u32 = 70; // rows 2–3

fn name(i: usize) -> String {
    format!("Checkpoint {}", LABELS[i])
}

/// Build the 3×3 demo grid: 12 bidirectional paths, 24 directed edges.
pub fn demo_grid() -> GraphResult<CheckpointGraph> {
    let mut b = CheckpointGraphBuilder::new();
    for i in 0..LABELS.len() {
        b.add_checkpoint(name(i));
    }
    for i in 0..LABELS.len() {
        if (i + 1) % GRID_WIDTH > 0 {
            b.add_path(name(i), name(i + 1), HORIZONTAL_SECS)?;
        }
        if i + GRID_WIDTH < LABELS.len() {
            let secs = if i < GRID_WIDTH { UPPER_SECS } else { LOWER_SECS };
            b.add_path(name(i), name(i + GRID_WIDTH), secs)?;
        }
    }
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use sp_circuit::{CircuitGenerator, GeneratorConfig, SentryAssignment};
    use sp_core::Epoch;
    use sp_graph::validate_connected;

    use super::demo_grid;

    #[test]
    fn grid_shape() {
        let g = demo_grid().unwrap();
        assert_eq!(g.node_count(), 9);
        assert_eq!(g.edge_count(), 24);
        validate_connected(&g).unwrap();

        let adj = g.to_adjacency();
        let e = &adj["Checkpoint E"];
        assert_eq!(e.len(), 4);
        assert!(e.contains(&("Checkpoint B".into(), 60)));
        assert!(e.contains(&("Checkpoint H".into(), 70)));
        assert_eq!(adj["Checkpoint A"].len(), 2);
    }

    #[test]
    fn grid_yields_balanced_circuit() {
        let g = demo_grid().unwrap();
        let crew: Vec<_> = (1..=3)
            .map(|i| SentryAssignment::new(format!("Sentry {i}"), format!("Card {i}"), format!("0x{i:02X}")))
            .collect();
        let shift = CircuitGenerator::new(&g, GeneratorConfig::default().with_seed(2024))
            .unwrap()
            .generate(&crew, Epoch(1_700_000_000), 3_600)
            .unwrap();

        assert_eq!(shift.path_freqs.len(), 24);
        assert!(f64::from(shift.frequency_spread()) <= 24f64.sqrt());
        assert!(shift.routes.iter().all(|r| r.is_chronological()));
    }
}
