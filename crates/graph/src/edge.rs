//! Graph edges: one per non-wire element.

/// A pair of graph-node indices plus the element the edge represents.
///
/// `start`/`end` are `None` once source-node elimination has run and the
/// node at that end was a [`crate::GraphNodeType::Source`] — the element
/// imposes that side's pressure directly rather than it being a degree of
/// freedom.
#[derive(Debug, Clone, Copy)]
pub struct GraphEdge {
    /// Start node index, or `None` if the start was an eliminated source node.
    pub start: Option<usize>,
    /// End node index, or `None` if the end was an eliminated source node.
    pub end: Option<usize>,
    /// Index of the underlying element in the originating netlist.
    pub element: usize,
}

/// A maximal non-branching run of edges; each path is exactly one flow
/// unknown in the assembled system.
#[derive(Debug, Clone)]
pub struct Path {
    /// Edge indices, into [`crate::SolveGraph::edges`], in walk order.
    pub edges: Vec<usize>,
    /// Node index at the path's start, or `None` if eliminated.
    pub start: Option<usize>,
    /// Node index at the path's end, or `None` if eliminated.
    pub end: Option<usize>,
}
