//! Time-stepping solver for the assembled circuit system.
//!
//! [`Solver`] owns the parameters (`dt`, `maxtime`, [`Scheme`]) and drives
//! [`assemble::assemble`] once per solve, stepping the linear DAE forward
//! and resolving diode polarity as it goes.

mod assemble;
mod diode;
mod error;
mod registry;
mod scheme;

use calc::CalcContext;
use graph::SolveGraph;
use log::warn;
use model::Netlist;
use nalgebra::{DMatrix, DVector};

pub use assemble::{Assembly, MatrixSet, ProbeMap};
pub use diode::{DiodeRecord, DiodeState, RESISTOR_SUBSTITUTE};
pub use error::SolveError;
pub use registry::UpdateRegistry;
pub use scheme::Scheme;

/// The outcome of a full solve: the stepped solution matrix and enough
/// bookkeeping to export it.
pub struct SolveResult {
    /// Pressure unknown count.
    pub nb_p: usize,
    /// Flow unknown count.
    pub nb_q: usize,
    /// `(nbP + nbQ) x (nb_step + 1)` matrix, one column per time step
    /// including the initial steady-state column.
    pub solution: DMatrix<f64>,
    /// Probe display names, keyed by state row.
    pub probe_names: std::collections::BTreeMap<usize, String>,
    /// Sign to apply to a probed row before export.
    pub signs: std::collections::BTreeMap<usize, f64>,
    /// The time step used.
    pub dt: f64,
    /// The simulated time span.
    pub maxtime: f64,
}

/// Drives a full transient solve of a netlist.
pub struct Solver {
    dt: f64,
    maxtime: f64,
    scheme: Scheme,
    resistor_substitute: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            dt: 0.01,
            maxtime: 10.0,
            scheme: Scheme::Bdf2,
            resistor_substitute: RESISTOR_SUBSTITUTE,
        }
    }
}

impl Solver {
    /// Creates a solver with the given time step, simulated duration, and
    /// integration scheme, using the default diode resistor-substitute.
    #[must_use]
    pub fn new(dt: f64, maxtime: f64, scheme: Scheme) -> Self {
        Self { dt, maxtime, scheme, ..Self::default() }
    }

    /// Overrides the resistance substituted for a diode while its flow
    /// direction is being probed on a singular system.
    #[must_use]
    pub fn with_resistor_substitute(mut self, resistor_substitute: f64) -> Self {
        self.resistor_substitute = resistor_substitute;
        self
    }

    /// Solves `netlist` over `[0, maxtime]`.
    ///
    /// # Errors
    /// Propagates [`SolveError`] from assembly (over/underconstrained
    /// system, or a value expression that fails to compile/evaluate).
    pub fn solve(&self, netlist: &Netlist, ctx: &CalcContext) -> Result<SolveResult, SolveError> {
        let graph = SolveGraph::build(netlist);
        let Assembly { mut matrices, registry, diodes, probes } = assemble::assemble(netlist, &graph, ctx)?;

        let nb_p = graph.nb_p();
        let nb_q = graph.nb_q();
        let n = nb_p + nb_q;
        let nb_step = (self.maxtime / self.dt) as usize;

        let mut solution = DMatrix::<f64>::zeros(n, nb_step + 1);

        registry.apply(0.0, &mut matrices);

        let mut diode_states: Vec<DiodeState> = vec![DiodeState::Open; diodes.len()];
        for (diode, state) in diodes.iter().zip(&diode_states) {
            diode.stamp(*state, self.resistor_substitute, &mut matrices.m0);
        }

        if !diodes.is_empty() {
            // One resistor-substitute probe solve at `t=0`, against an
            // all-zero solution matrix, to settle the diodes' initial
            // polarity before the steady-state solve below.
            for (diode, state) in diodes.iter().zip(diode_states.iter_mut()) {
                *state = DiodeState::Resistor;
                diode.stamp(*state, self.resistor_substitute, &mut matrices.m0);
            }
            let lhs = self.scheme.lhs(&matrices.m0, &matrices.m1, self.dt);
            let rhs = self.scheme.rhs(&matrices.m1, &matrices.source, self.dt, -1, &solution);
            if let Some(probe_solution) = lhs.lu().solve(&rhs) {
                for (diode, state) in diodes.iter().zip(diode_states.iter_mut()) {
                    if let Some(next) = diode.transition(*state, &probe_solution) {
                        *state = next;
                    }
                    diode.stamp(*state, self.resistor_substitute, &mut matrices.m0);
                }
            }
        }

        // Steady-state initial column, falling back to all-zero on a
        // singular system (e.g. a netlist with no resistive path at t=0).
        let steady_state = matrices.m0.clone().lu().solve(&matrices.source);
        match steady_state {
            Some(x0) => {
                for mut col in solution.column_iter_mut() {
                    col.copy_from(&x0);
                }
            }
            None => warn!("steady-state system is singular, starting from an all-zero solution"),
        }

        let mut lhs = self.scheme.lhs(&matrices.m0, &matrices.m1, self.dt);

        for step in 0..nb_step {
            let time = (step + 1) as f64 * self.dt;
            registry.apply(time, &mut matrices);
            if registry.has_updates() {
                lhs = self.scheme.lhs(&matrices.m0, &matrices.m1, self.dt);
            }

            let step_i64 = i64::try_from(step).expect("step count fits in i64");
            let rhs = self.scheme.rhs(&matrices.m1, &matrices.source, self.dt, step_i64, &solution);
            let mut x = solve_or_zero(&lhs, &rhs);
            solution.set_column(step + 1, &x);

            let mut recomputed = false;
            for (diode, state) in diodes.iter().zip(diode_states.iter_mut()) {
                if let Some(next) = diode.transition(*state, &x) {
                    *state = next;
                    diode.stamp(*state, self.resistor_substitute, &mut matrices.m0);
                    recomputed = true;
                }
            }

            if recomputed {
                lhs = self.scheme.lhs(&matrices.m0, &matrices.m1, self.dt);
                let rhs = self.scheme.rhs(&matrices.m1, &matrices.source, self.dt, step_i64, &solution);
                match lhs.clone().lu().solve(&rhs) {
                    Some(resolved) => {
                        x = resolved;
                        solution.set_column(step + 1, &x);
                    }
                    None => {
                        warn!("step {step} went singular after a diode transition, re-solving with resistor substitutes");
                        for (diode, state) in diodes.iter().zip(diode_states.iter_mut()) {
                            *state = DiodeState::Resistor;
                            diode.stamp(*state, self.resistor_substitute, &mut matrices.m0);
                        }
                        lhs = self.scheme.lhs(&matrices.m0, &matrices.m1, self.dt);
                        let rhs = self.scheme.rhs(&matrices.m1, &matrices.source, self.dt, step_i64, &solution);
                        x = solve_or_zero(&lhs, &rhs);
                        solution.set_column(step + 1, &x);
                        for (diode, state) in diodes.iter().zip(diode_states.iter_mut()) {
                            if let Some(next) = diode.transition(*state, &x) {
                                *state = next;
                            }
                        }
                    }
                }
            }
        }

        for (&row, &sign) in &probes.signs {
            let mut scaled = solution.row(row).into_owned();
            scaled *= sign;
            solution.set_row(row, &scaled);
        }

        Ok(SolveResult {
            nb_p,
            nb_q,
            solution,
            probe_names: probes.names,
            signs: probes.signs,
            dt: self.dt,
            maxtime: self.maxtime,
        })
    }
}

fn solve_or_zero(lhs: &DMatrix<f64>, rhs: &DVector<f64>) -> DVector<f64> {
    lhs.clone().lu().solve(rhs).unwrap_or_else(|| DVector::zeros(rhs.len()))
}
