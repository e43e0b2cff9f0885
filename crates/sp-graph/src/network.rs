//! Checkpoint graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeIdx n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays are sorted by source checkpoint with a *stable* sort, so a
//! checkpoint's outgoing edges keep the order in which their paths were added.
//! The circuit generator keeps one weight per outgoing edge in that same order.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use sp_core::{CheckpointId, EdgeIdx, NodeIdx};

use crate::{GraphError, GraphResult};

/// Adjacency view of a graph: checkpoint → `[(neighbour, duration_secs)]`.
///
/// This is the shape in which the external registry supplies the graph.
pub type AdjacencyMap = BTreeMap<CheckpointId, Vec<(CheckpointId, u32)>>;

// ── PatrolPath ────────────────────────────────────────────────────────────────

/// A configured patrol path between two checkpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolPath {
    pub src:           CheckpointId,
    pub dest:          CheckpointId,
    pub duration_secs: u32,
}

impl PatrolPath {
    pub fn new(src: impl Into<CheckpointId>, dest: impl Into<CheckpointId>, duration_secs: u32) -> Self {
        Self { src: src.into(), dest: dest.into(), duration_secs }
    }
}

// ── CheckpointGraph ───────────────────────────────────────────────────────────

/// Directed checkpoint graph in CSR format.
///
/// Do not construct directly; use [`CheckpointGraphBuilder`].
#[derive(Debug, Clone)]
pub struct CheckpointGraph {
    /// External label of each checkpoint.  Indexed by `NodeIdx`.
    pub checkpoints: Vec<CheckpointId>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source checkpoint of each edge.
    pub edge_from: Vec<NodeIdx>,

    /// Destination checkpoint of each edge.
    pub edge_to: Vec<NodeIdx>,

    /// Expected patrol time of each edge in seconds.
    pub edge_secs: Vec<u32>,

    index: HashMap<CheckpointId, NodeIdx>,
}

impl CheckpointGraph {
    /// Construct a graph with no checkpoints or paths.
    pub fn empty() -> Self {
        CheckpointGraphBuilder::new().build()
    }

    /// Build from bidirectional patrol paths, as configured by a supervisor.
    pub fn from_patrol_paths(paths: &[PatrolPath]) -> GraphResult<Self> {
        let mut b = CheckpointGraphBuilder::new();
        for p in paths {
            b.add_path(p.src.clone(), p.dest.clone(), p.duration_secs)?;
        }
        Ok(b.build())
    }

    /// Build from an adjacency map.  Every listed neighbour becomes one
    /// directed edge; checkpoints that only appear as neighbours are added too.
    pub fn from_adjacency(map: &AdjacencyMap) -> GraphResult<Self> {
        let mut b = CheckpointGraphBuilder::new();
        for (src, neighbours) in map {
            b.add_checkpoint(src.clone());
            for (dest, secs) in neighbours {
                b.add_directed_path(src.clone(), dest.clone(), *secs)?;
            }
        }
        Ok(b.build())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Number of directed edges.  This is the coverage target of a circuit.
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Index of the checkpoint labelled `id`, if present.
    pub fn node(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    /// Label of the checkpoint at `node`.
    #[inline]
    pub fn checkpoint(&self, node: NodeIdx) -> &CheckpointId {
        &self.checkpoints[node.index()]
    }

    /// Iterator over the `EdgeIdx`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeIdx(i as u32))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// First `EdgeIdx` of `node`'s outgoing slice.  Adding a local position
    /// in `0..out_degree(node)` yields the edge at that position.
    #[inline]
    pub fn first_out_edge(&self, node: NodeIdx) -> EdgeIdx {
        EdgeIdx(self.node_out_start[node.index()])
    }

    /// All directed edges as labelled patrol paths, in CSR order.
    pub fn directed_paths(&self) -> impl Iterator<Item = PatrolPath> + '_ {
        (0..self.edge_count()).map(|i| PatrolPath {
            src:           self.checkpoints[self.edge_from[i].index()].clone(),
            dest:          self.checkpoints[self.edge_to[i].index()].clone(),
            duration_secs: self.edge_secs[i],
        })
    }

    /// Export the adjacency view.
    pub fn to_adjacency(&self) -> AdjacencyMap {
        let mut map = AdjacencyMap::new();
        for (i, id) in self.checkpoints.iter().enumerate() {
            let node = NodeIdx(i as u32);
            let neighbours = self
                .out_edges(node)
                .map(|e| (self.checkpoint(self.edge_to[e.index()]).clone(), self.edge_secs[e.index()]))
                .collect();
            map.insert(id.clone(), neighbours);
        }
        map
    }
}

// ── CheckpointGraphBuilder ────────────────────────────────────────────────────

/// Construct a [`CheckpointGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sp_graph::CheckpointGraphBuilder;
///
/// let mut b = CheckpointGraphBuilder::new();
/// b.add_path("A", "B", 90).unwrap();
/// b.add_path("B", "C", 60).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 4); // bidirectional
/// ```
pub struct CheckpointGraphBuilder {
    checkpoints: Vec<CheckpointId>,
    index:       HashMap<CheckpointId, NodeIdx>,
    raw_edges:   Vec<RawEdge>,
    seen:        HashSet<(NodeIdx, NodeIdx)>,
}

struct RawEdge {
    from: NodeIdx,
    to:   NodeIdx,
    secs: u32,
}

impl CheckpointGraphBuilder {
    pub fn new() -> Self {
        Self {
            checkpoints: Vec::new(),
            index:       HashMap::new(),
            raw_edges:   Vec::new(),
            seen:        HashSet::new(),
        }
    }

    /// Register a checkpoint and return its index.  Adding the same label
    /// twice returns the existing index.
    pub fn add_checkpoint(&mut self, id: impl Into<CheckpointId>) -> NodeIdx {
        let id = id.into();
        if let Some(&n) = self.index.get(&id) {
            return n;
        }
        let n = NodeIdx(self.checkpoints.len() as u32);
        self.checkpoints.push(id.clone());
        self.index.insert(id, n);
        n
    }

    /// Add a **directed** edge from `src` to `dest`.
    ///
    /// Rejects self-loops, zero durations, and a second edge between the same
    /// ordered pair.
    pub fn add_directed_path(
        &mut self,
        src:  impl Into<CheckpointId>,
        dest: impl Into<CheckpointId>,
        duration_secs: u32,
    ) -> GraphResult<()> {
        let (src, dest) = (src.into(), dest.into());
        if src == dest {
            return Err(GraphError::SelfLoop(src));
        }
        if duration_secs == 0 {
            return Err(GraphError::ZeroDuration { src, dest });
        }
        let from = self.add_checkpoint(src.clone());
        let to   = self.add_checkpoint(dest.clone());
        if !self.seen.insert((from, to)) {
            return Err(GraphError::DuplicatePath { src, dest });
        }
        self.raw_edges.push(RawEdge { from, to, secs: duration_secs });
        Ok(())
    }

    /// Add a patrol path in **both directions** (the normal configuration).
    pub fn add_path(
        &mut self,
        src:  impl Into<CheckpointId>,
        dest: impl Into<CheckpointId>,
        duration_secs: u32,
    ) -> GraphResult<()> {
        let (src, dest) = (src.into(), dest.into());
        self.add_directed_path(src.clone(), dest.clone(), duration_secs)?;
        self.add_directed_path(dest, src, duration_secs)
    }

    pub fn node_count(&self) -> usize { self.checkpoints.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`CheckpointGraph`].
    pub fn build(self) -> CheckpointGraph {
        let node_count = self.checkpoints.len();
        let edge_count = self.raw_edges.len();

        // Stable sort: per-checkpoint insertion order is preserved.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeIdx> = raw.iter().map(|e| e.from).collect();
        let edge_to:   Vec<NodeIdx> = raw.iter().map(|e| e.to).collect();
        let edge_secs: Vec<u32>     = raw.iter().map(|e| e.secs).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        CheckpointGraph {
            checkpoints: self.checkpoints,
            node_out_start,
            edge_from,
            edge_to,
            edge_secs,
            index: self.index,
        }
    }
}

impl Default for CheckpointGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
