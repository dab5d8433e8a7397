//! Graph nodes, produced by merging coincident terminals and collapsing wires.

/// The role a graph node plays once the graph is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphNodeType {
    /// An ordinary node: its pressure is a degree of freedom.
    Dipole,
    /// A node anchored by a `Ground`/`PSource`/`QSource` terminal; eliminated
    /// before the solver ever sees it, since its pressure is imposed by the
    /// element rather than solved for.
    Source,
}

/// One merged graph node: the incident edges, its type, and any probe
/// aggregated from the geometric terminals that were folded into it.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Indices, into the owning [`crate::SolveGraph::edges`], of edges
    /// incident to this node.
    pub edges: Vec<usize>,
    /// Whether this node anchors an external source.
    pub node_type: GraphNodeType,
    /// Whether any merged terminal was pressure-probed.
    pub probed: bool,
    /// Display name for the probe, if any.
    pub probe_name: String,
}

impl Default for GraphNode {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            node_type: GraphNodeType::Dipole,
            probed: false,
            probe_name: String::new(),
        }
    }
}

impl GraphNode {
    /// The node's degree: how many edges touch it.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}
