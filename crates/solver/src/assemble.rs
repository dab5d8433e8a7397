//! Stamps `M0`, `M1`, and the source vector from a [`SolveGraph`], and
//! derives the update registries and probe map alongside.

use std::collections::BTreeMap;

use calc::{deriv_finite_diff, CalcContext};
use graph::SolveGraph;
use model::{Element, ElementKind, Netlist, Value};
use nalgebra::{DMatrix, DVector};

use crate::diode::DiodeRecord;
use crate::error::SolveError;
use crate::registry::UpdateRegistry;

const NOT_A_SOURCE: &str =
    "non-source elements always have both terminals assigned by the graph builder";

/// The three quantities the time integrator steps: order-0 coefficients,
/// order-1 coefficients, and the source vector.
#[derive(Debug, Clone)]
pub struct MatrixSet {
    /// Order-0 (algebraic) coefficient matrix.
    pub m0: DMatrix<f64>,
    /// Order-1 (derivative) coefficient matrix.
    pub m1: DMatrix<f64>,
    /// Source vector `S(t)`.
    pub source: DVector<f64>,
}

/// `{state_index -> display_name}` and the parallel `{state_index -> sign}`
/// used when extracting probed output rows.
#[derive(Debug, Clone, Default)]
pub struct ProbeMap {
    /// Probed row index to display name, in ascending row order.
    pub names: BTreeMap<usize, String>,
    /// Probed row index to sign; absent entries default to `+1`.
    pub signs: BTreeMap<usize, f64>,
}

/// The fully assembled system: matrices, live-update registry, diode
/// records, and the probe map, ready for the time integrator.
pub struct Assembly {
    /// The stamped matrices and source vector.
    pub matrices: MatrixSet,
    /// Update hooks for active (time-varying) stamps.
    pub registry: UpdateRegistry,
    /// One record per diode row.
    pub diodes: Vec<DiodeRecord>,
    /// The probe map.
    pub probes: ProbeMap,
}

/// Assembles `M0`, `M1`, `S`, and the supporting registries from `netlist`
/// and its already-built `graph`.
///
/// # Errors
/// Returns [`SolveError::Overconstrained`] or [`SolveError::Underconstrained`]
/// if the stamped row count does not equal `nbP + nbQ`, and propagates any
/// [`calc::CalcError`] from compiling a value expression.
pub fn assemble(
    netlist: &Netlist,
    graph: &SolveGraph,
    ctx: &CalcContext,
) -> Result<Assembly, SolveError> {
    let nb_p = graph.nb_p();
    let nb_q = graph.nb_q();
    let n = nb_p + nb_q;

    check_dimensions(graph, n)?;

    let mut m0 = DMatrix::<f64>::zeros(n, n);
    let mut m1 = DMatrix::<f64>::zeros(n, n);
    let mut source = DVector::<f64>::zeros(n);
    let mut registry = UpdateRegistry::default();
    let mut diodes = Vec::new();

    let mut row = 0usize;
    for (p, path) in graph.paths.iter().enumerate() {
        let id_q = nb_p + p;
        let mut id_p0 = path.start;
        for &edge_idx in &path.edges {
            let edge = &graph.edges[edge_idx];
            let element = &netlist[edge.element];
            let id_p1_general = if id_p0 == edge.start { edge.end } else { edge.start };

            let next_id_p0 = match element.kind {
                ElementKind::Resistor => {
                    stamp_resistor(element, row, id_p0, id_p1_general, id_q, ctx, &mut m0, &mut registry)?;
                    id_p1_general
                }
                ElementKind::Capacitor => {
                    stamp_capacitor(
                        element, row, id_p0, id_p1_general, id_q, ctx, &mut m0, &mut m1, &mut registry,
                    )?;
                    id_p1_general
                }
                ElementKind::Inductor => {
                    stamp_inductor(
                        element, row, id_p0, id_p1_general, id_q, ctx, &mut m0, &mut m1, &mut registry,
                    )?;
                    id_p1_general
                }
                ElementKind::Diode => {
                    let p0 = id_p0.expect(NOT_A_SOURCE);
                    let p1 = id_p1_general.expect(NOT_A_SOURCE);
                    m0[(row, p1)] = -1.0;
                    m0[(row, p0)] = 1.0;
                    let sign = if id_p0 == edge.start { 1.0 } else { -1.0 };
                    diodes.push(DiodeRecord { row, id_p0: p0, id_p1: p1, id_q, sign });
                    id_p1_general
                }
                ElementKind::Ground | ElementKind::PSource | ElementKind::QSource => {
                    let start = edge.start.expect("a Ground-like edge's terminal 0 is never eliminated");
                    stamp_ground_like(element, row, id_p0, id_q, start, ctx, &mut m0, &mut source, &mut registry)?;
                    Some(start)
                }
                ElementKind::Wire => {
                    return Err(SolveError::UnknownElementKind { kind: ElementKind::Wire });
                }
            };

            id_p0 = next_id_p0;
            row += 1;
        }
    }

    stamp_branching_rows(graph, nb_p, &mut m0, &mut row);
    let probes = set_probes(netlist, graph);

    Ok(Assembly {
        matrices: MatrixSet { m0, m1, source },
        registry,
        diodes,
        probes,
    })
}

fn numeric_value(element: &Element, ctx: &CalcContext) -> Result<f64, SolveError> {
    match &element.value {
        Value::None => Ok(0.0),
        Value::Number(n) => Ok(*n),
        Value::Expr(s) => {
            let compiled = ctx.compile(s)?;
            Ok(compiled.eval(&[])?)
        }
    }
}

#[allow(clippy::too_many_arguments, reason = "mirrors the per-kind stamp table's fixed shape")]
fn stamp_resistor(
    element: &Element,
    row: usize,
    id_p0: Option<usize>,
    id_p1: Option<usize>,
    id_q: usize,
    ctx: &CalcContext,
    m0: &mut DMatrix<f64>,
    registry: &mut UpdateRegistry,
) -> Result<(), SolveError> {
    let p0 = id_p0.expect(NOT_A_SOURCE);
    let p1 = id_p1.expect(NOT_A_SOURCE);
    if element.active() {
        let Value::Expr(expr) = &element.value else {
            unreachable!("active() is only true for Value::Expr")
        };
        registry.update_m0.push((row, id_q, ctx.compile_time_function(expr)?));
    } else {
        m0[(row, id_q)] = numeric_value(element, ctx)?;
    }
    m0[(row, p1)] = 1.0;
    m0[(row, p0)] = -1.0;
    Ok(())
}

#[allow(clippy::too_many_arguments, reason = "mirrors the per-kind stamp table's fixed shape")]
fn stamp_capacitor(
    element: &Element,
    row: usize,
    id_p0: Option<usize>,
    id_p1: Option<usize>,
    id_q: usize,
    ctx: &CalcContext,
    m0: &mut DMatrix<f64>,
    m1: &mut DMatrix<f64>,
    registry: &mut UpdateRegistry,
) -> Result<(), SolveError> {
    let p0 = id_p0.expect(NOT_A_SOURCE);
    let p1 = id_p1.expect(NOT_A_SOURCE);
    if element.active() {
        let Value::Expr(expr) = &element.value else {
            unreachable!("active() is only true for Value::Expr")
        };
        let positive = ctx.compile_time_function(expr)?;
        let negative = ctx.compile_time_function(&format!("-({expr})"))?;
        registry.update_m0.push((row, p1, deriv_finite_diff(negative.clone())));
        registry.update_m0.push((row, p0, deriv_finite_diff(positive.clone())));
        registry.update_m1.push((row, p1, negative));
        registry.update_m1.push((row, p0, positive));
    } else {
        let value = numeric_value(element, ctx)?;
        m1[(row, p1)] = -value;
        m1[(row, p0)] = value;
    }
    m0[(row, id_q)] = -1.0;
    Ok(())
}

#[allow(clippy::too_many_arguments, reason = "mirrors the per-kind stamp table's fixed shape")]
fn stamp_inductor(
    element: &Element,
    row: usize,
    id_p0: Option<usize>,
    id_p1: Option<usize>,
    id_q: usize,
    ctx: &CalcContext,
    m0: &mut DMatrix<f64>,
    m1: &mut DMatrix<f64>,
    registry: &mut UpdateRegistry,
) -> Result<(), SolveError> {
    let p0 = id_p0.expect(NOT_A_SOURCE);
    let p1 = id_p1.expect(NOT_A_SOURCE);
    if element.active() {
        let Value::Expr(expr) = &element.value else {
            unreachable!("active() is only true for Value::Expr")
        };
        let f = ctx.compile_time_function(expr)?;
        registry.update_m0.push((row, id_q, deriv_finite_diff(f.clone())));
        registry.update_m1.push((row, id_q, f));
    } else {
        m1[(row, id_q)] = numeric_value(element, ctx)?;
    }
    m0[(row, p1)] = 1.0;
    m0[(row, p0)] = -1.0;
    Ok(())
}

#[allow(clippy::too_many_arguments, reason = "mirrors the per-kind stamp table's fixed shape")]
fn stamp_ground_like(
    element: &Element,
    row: usize,
    id_p0: Option<usize>,
    id_q: usize,
    start: usize,
    ctx: &CalcContext,
    m0: &mut DMatrix<f64>,
    source: &mut DVector<f64>,
    registry: &mut UpdateRegistry,
) -> Result<(), SolveError> {
    match element.kind {
        ElementKind::Ground | ElementKind::PSource => {
            m0[(row, start)] = 1.0;
        }
        ElementKind::QSource => {
            m0[(row, id_q)] = if id_p0 == Some(start) { -1.0 } else { 1.0 };
        }
        _ => unreachable!("caller only dispatches Ground-like kinds here"),
    }

    if matches!(element.kind, ElementKind::PSource | ElementKind::QSource) {
        if element.active() {
            let Value::Expr(expr) = &element.value else {
                unreachable!("active() is only true for Value::Expr")
            };
            registry.update_s.push((row, ctx.compile_time_function(expr)?));
        } else {
            source[row] = numeric_value(element, ctx)?;
        }
    }
    Ok(())
}

fn stamp_branching_rows(graph: &SolveGraph, nb_p: usize, m0: &mut DMatrix<f64>, row: &mut usize) {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for path in &graph.paths {
        if let Some(s) = path.start {
            *counts.entry(s).or_insert(0) += 1;
        }
        if let Some(e) = path.end {
            *counts.entry(e).or_insert(0) += 1;
        }
    }
    for (&node_idx, &count) in &counts {
        if count <= 1 {
            continue;
        }
        for (p, path) in graph.paths.iter().enumerate() {
            let col = nb_p + p;
            if path.start == Some(node_idx) {
                m0[(*row, col)] = -1.0;
            } else if path.end == Some(node_idx) {
                m0[(*row, col)] = 1.0;
            }
        }
        *row += 1;
    }
}

fn set_probes(netlist: &Netlist, graph: &SolveGraph) -> ProbeMap {
    let mut probes = ProbeMap::default();
    for (i, node) in graph.nodes.iter().enumerate() {
        if node.probed {
            probes.names.insert(i, node.probe_name.clone());
        }
    }
    let nb_p = graph.nodes.len();
    for (p, path) in graph.paths.iter().enumerate() {
        let mut id_p0 = path.start;
        for &edge_idx in &path.edges {
            let edge = &graph.edges[edge_idx];
            let element = &netlist[edge.element];
            let (id_p1, mut sign) = if id_p0 == edge.start {
                (edge.end, 1.0)
            } else {
                (edge.start, -1.0)
            };
            let id_p1 = if matches!(
                element.kind,
                ElementKind::Ground | ElementKind::PSource | ElementKind::QSource
            ) {
                edge.start
            } else {
                id_p1
            };
            if element.flow_probe != 0 {
                let key = nb_p + p;
                sign *= f64::from(element.flow_probe);
                probes.signs.insert(key, sign);
                probes.names.insert(key, element.flow_probe_name.clone());
            }
            id_p0 = id_p1;
        }
    }
    probes
}

fn check_dimensions(graph: &SolveGraph, unknowns: usize) -> Result<(), SolveError> {
    let path_rows: usize = graph.paths.iter().map(|p| p.edges.len()).sum();
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for path in &graph.paths {
        if let Some(s) = path.start {
            *counts.entry(s).or_insert(0) += 1;
        }
        if let Some(e) = path.end {
            *counts.entry(e).or_insert(0) += 1;
        }
    }
    let branching_rows = counts.values().filter(|&&c| c > 1).count();
    let equations = path_rows + branching_rows;

    if equations > unknowns {
        Err(SolveError::Overconstrained { equations, unknowns })
    } else if equations < unknowns {
        Err(SolveError::Underconstrained { equations, unknowns })
    } else {
        Ok(())
    }
}
