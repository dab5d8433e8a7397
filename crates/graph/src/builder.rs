//! Builds a [`SolveGraph`] from a netlist: merges coincident terminals,
//! collapses wires, enumerates maximal non-branching paths, and eliminates
//! source-anchored nodes.

use model::{Element, ElementKind, Netlist, Point};

use crate::edge::{GraphEdge, Path};
use crate::node::{GraphNode, GraphNodeType};
use crate::SolveGraph;

/// One terminal as seen by the sort-and-merge pass: its position, and which
/// element/terminal slot it belongs to.
#[derive(Clone, Copy)]
struct GeomRef {
    point: Point,
    element: usize,
    terminal: usize,
}

impl SolveGraph {
    /// Builds the graph from an ordered element list, following the
    /// terminal layout `2i, 2i+1` for element `i`.
    #[must_use]
    pub fn build(netlist: &Netlist) -> Self {
        let (nodes, edges) = convert_to_graph(netlist);
        let (paths, edges) = enumerate_paths_and_dedup(&nodes, edges);
        let mut graph = SolveGraph { nodes, edges, paths };
        graph.eliminate_sources();
        graph
    }

    /// Number of pressure unknowns: surviving graph nodes.
    #[must_use]
    pub fn nb_p(&self) -> usize {
        self.nodes.len()
    }

    /// Number of flow unknowns: enumerated paths.
    #[must_use]
    pub fn nb_q(&self) -> usize {
        self.paths.len()
    }

    fn eliminate_sources(&mut self) {
        let mut sources: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.node_type == GraphNodeType::Source)
            .map(|(i, _)| i)
            .collect();

        for &i in sources.iter().rev() {
            self.nodes.remove(i);
            for edge in &mut self.edges {
                rewrite(&mut edge.start, i);
                rewrite(&mut edge.end, i);
            }
            for path in &mut self.paths {
                rewrite(&mut path.start, i);
                rewrite(&mut path.end, i);
            }
        }
        sources.clear();
    }
}

fn rewrite(slot: &mut Option<usize>, removed: usize) {
    if let Some(idx) = *slot {
        if idx == removed {
            *slot = None;
        } else if idx > removed {
            *slot = Some(idx - 1);
        }
    }
}

fn is_source_like(kind: ElementKind) -> bool {
    matches!(kind, ElementKind::Ground | ElementKind::PSource | ElementKind::QSource)
}

fn other_terminal(t: usize) -> usize {
    1 - t
}

fn convert_to_graph(netlist: &Netlist) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut geoms: Vec<GeomRef> = Vec::with_capacity(netlist.len() * 2);
    for (ei, el) in netlist.iter().enumerate() {
        geoms.push(GeomRef { point: el.terminals[0].point, element: ei, terminal: 0 });
        geoms.push(GeomRef { point: el.terminals[1].point, element: ei, terminal: 1 });
    }
    geoms.sort_by(|a, b| a.point.cmp(&b.point));

    let mut edge_ends: Vec<[Option<usize>; 2]> = vec![[None, None]; netlist.len()];
    let mut nodes: Vec<GraphNode> = Vec::new();

    while !geoms.is_empty() {
        let pivot = geoms[0].point;
        let run_end = geoms.partition_point(|g| g.point <= pivot);
        let mut run: Vec<GeomRef> = geoms.drain(0..run_end).collect();

        let idnode = nodes.len();
        let mut node = GraphNode::default();

        let mut i = 0;
        while i < run.len() {
            let g = run[i];
            let el: &Element = &netlist[g.element];
            let terminal = &el.terminals[g.terminal];
            if terminal.probed {
                node.probed = true;
                node.probe_name.clone_from(&terminal.probe_name);
            }

            if el.kind == ElementKind::Wire {
                let other = other_terminal(g.terminal);
                let other_point = el.terminals[other].point;
                if el.terminals[other].probed {
                    node.probed = true;
                }
                let start = geoms.partition_point(|c| c.point < other_point);
                let end = geoms.partition_point(|c| c.point <= other_point);
                if let Some(pos) = (start..end).find(|&k| geoms[k].element == g.element) {
                    geoms.remove(pos);
                    let siblings_end = end - 1;
                    run.extend(geoms.drain(start..siblings_end));
                }
            } else {
                edge_ends[g.element][g.terminal] = Some(idnode);
                if is_source_like(el.kind) && g.terminal == 1 {
                    node.node_type = GraphNodeType::Source;
                }
            }
            i += 1;
        }

        nodes.push(node);
    }

    let mut edges = Vec::new();
    for (ei, el) in netlist.iter().enumerate() {
        if el.kind == ElementKind::Wire {
            continue;
        }
        let ends = edge_ends[ei];
        let edge_index = edges.len();
        edges.push(GraphEdge {
            start: ends[0],
            end: ends[1],
            element: ei,
        });
        if let Some(s) = ends[0] {
            nodes[s].edges.push(edge_index);
        }
        if let Some(e) = ends[1] {
            nodes[e].edges.push(edge_index);
        }
    }

    (nodes, edges)
}

fn enumerate_paths_and_dedup(
    nodes: &[GraphNode],
    edges: Vec<GraphEdge>,
) -> (Vec<Path>, Vec<GraphEdge>) {
    let mut raw_paths: Vec<Vec<usize>> = Vec::new();
    let mut start_ends: Vec<(usize, usize)> = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        if node.degree() == 2 {
            continue;
        }
        for &edge_idx in &node.edges {
            let edge = &edges[edge_idx];
            let mut path = vec![edge_idx];
            let mut j = if edge.start == Some(i) {
                edge.end.expect("edge endpoint is assigned before source elimination")
            } else {
                edge.start.expect("edge endpoint is assigned before source elimination")
            };
            let mut prev_edge_idx = edge_idx;
            while nodes[j].degree() == 2 {
                let next_idx = nodes[j]
                    .edges
                    .iter()
                    .copied()
                    .find(|&e| e != prev_edge_idx)
                    .expect("degree-2 node has exactly one other edge");
                path.push(next_idx);
                prev_edge_idx = next_idx;
                let next = &edges[next_idx];
                j = if next.start != Some(j) {
                    next.start.expect("edge endpoint is assigned before source elimination")
                } else {
                    next.end.expect("edge endpoint is assigned before source elimination")
                };
            }
            raw_paths.push(path);
            start_ends.push((i, j));
        }
    }

    let mut remove = Vec::new();
    for i in 0..raw_paths.len() {
        let mut reversed = raw_paths[i].clone();
        reversed.reverse();
        if raw_paths[i + 1..].iter().any(|p| *p == reversed) {
            remove.push(i);
        }
    }
    for &i in remove.iter().rev() {
        raw_paths.remove(i);
        start_ends.remove(i);
    }

    let paths = raw_paths
        .into_iter()
        .zip(start_ends)
        .map(|(edges, (start, end))| Path {
            edges,
            start: Some(start),
            end: Some(end),
        })
        .collect();

    (paths, edges)
}
