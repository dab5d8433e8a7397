//! Builds the circuit graph from a netlist: merges coincident terminals,
//! collapses ideal wires, classifies source-anchored nodes, and enumerates
//! the maximal non-branching edge paths that become the system's flow
//! unknowns.
//!
//! [`SolveGraph`] is an immutable value built once per solve: nothing in
//! this crate mutates a graph in place after [`SolveGraph::build`] returns.

mod builder;
mod edge;
mod node;

pub use edge::{GraphEdge, Path};
pub use node::{GraphNode, GraphNodeType};

/// The merged, path-decomposed view of a netlist, ready for the assembler.
#[derive(Debug, Clone)]
pub struct SolveGraph {
    /// Surviving graph nodes (source nodes already eliminated), in merge
    /// order.
    pub nodes: Vec<GraphNode>,
    /// Every graph edge, one per non-wire element, indexed by the numbers
    /// stored in [`GraphNode::edges`] and [`Path::edges`].
    pub edges: Vec<GraphEdge>,
    /// The maximal non-branching paths, each one flow unknown.
    pub paths: Vec<Path>,
}

#[cfg(test)]
mod tests {
    use model::{Element, ElementKind, Point, Terminal};

    use super::*;

    fn el(kind: ElementKind, p0: (f64, f64), p1: (f64, f64)) -> Element {
        let ctx = calc::CalcContext::default();
        Element::new(
            kind,
            [Terminal::new(Point::new(p0.0, p0.1)), Terminal::new(Point::new(p1.0, p1.1))],
            "",
            None,
            &ctx,
            0,
            "",
        )
        .unwrap()
    }

    /// Two resistors in series between two grounded endpoints form a single
    /// ring once both ground anchors are eliminated: one path stringing
    /// together ground, resistor, resistor, ground.
    #[test]
    fn two_resistors_in_series_is_one_path() {
        let netlist = vec![
            el(ElementKind::Ground, (0.0, 0.0), (0.0, -1.0)),
            el(ElementKind::Resistor, (0.0, 0.0), (1.0, 0.0)),
            el(ElementKind::Resistor, (1.0, 0.0), (2.0, 0.0)),
            el(ElementKind::Ground, (2.0, 0.0), (2.0, -1.0)),
        ];
        let graph = SolveGraph::build(&netlist);
        assert_eq!(graph.nb_q(), 1);
        assert_eq!(graph.paths[0].edges.len(), 4);
        // Both source anchors are eliminated, leaving the three ring nodes.
        assert_eq!(graph.nb_p(), 3);
    }

    /// Same ring, but with the middle joint spliced through an ideal wire.
    /// The wire must vanish without adding an edge or a node.
    #[test]
    fn wire_collapses_into_surrounding_path() {
        let netlist = vec![
            el(ElementKind::Ground, (0.0, 0.0), (0.0, -1.0)),
            el(ElementKind::Resistor, (0.0, 0.0), (1.0, 0.0)),
            el(ElementKind::Wire, (1.0, 0.0), (1.5, 0.0)),
            el(ElementKind::Resistor, (1.5, 0.0), (2.0, 0.0)),
            el(ElementKind::Ground, (2.0, 0.0), (2.0, -1.0)),
        ];
        let graph = SolveGraph::build(&netlist);
        assert_eq!(graph.nb_q(), 1);
        assert_eq!(graph.paths[0].edges.len(), 4);
        assert_eq!(graph.nb_p(), 3);
    }

    #[test]
    fn branching_node_splits_into_multiple_paths() {
        // Node (1,0) with three resistors meeting is a branch point; each
        // resistor continues to its own grounded endpoint.
        let netlist = vec![
            el(ElementKind::Resistor, (1.0, 0.0), (2.0, 0.0)),
            el(ElementKind::Ground, (2.0, 0.0), (2.0, -1.0)),
            el(ElementKind::Resistor, (1.0, 0.0), (2.0, 1.0)),
            el(ElementKind::Ground, (2.0, 1.0), (2.0, 2.0)),
            el(ElementKind::Resistor, (1.0, 0.0), (2.0, -2.0)),
            el(ElementKind::Ground, (2.0, -2.0), (2.0, -3.0)),
        ];
        let graph = SolveGraph::build(&netlist);
        assert_eq!(graph.nb_q(), 3);
        assert!(graph.paths.iter().all(|p| p.edges.len() == 2));
        // The branch node plus the three resistor-ground joints survive.
        assert_eq!(graph.nb_p(), 4);
    }
}
