//! LC oscillator: BDF2 should not let the stored energy drift far from its
//! starting value over a long run.

use calc::CalcContext;
use model::{Element, ElementKind, Point, Terminal};
use solver::{Scheme, Solver};

fn el(kind: ElementKind, p0: (f64, f64), p1: (f64, f64), value: Option<&str>, ctx: &CalcContext) -> Element {
    Element::new(
        kind,
        [Terminal::new(Point::new(p0.0, p0.1)), Terminal::new(Point::new(p1.0, p1.1))],
        "",
        value,
        ctx,
        0,
        "",
    )
    .unwrap()
}

/// `(t==0) -> 1-farad Capacitor -> 1-henry Inductor -> GND`. There is no
/// API to hand the solver a nonzero initial condition directly, so the
/// source is a one-instant pulse: it reads as `1` only in the algebraic
/// solve at `t=0` (giving the capacitor an initial charge of `P=1`,
/// `Q=0`), then `0` for the rest of the run, leaving the loop to oscillate
/// freely between the grounded source terminal and the grounded far end
/// of the inductor.
#[test]
fn energy_stays_bounded_over_a_long_free_oscillation() {
    let ctx = CalcContext::default();
    let netlist = vec![
        el(ElementKind::PSource, (0.0, 0.0), (0.0, -1.0), Some("(t==0)"), &ctx),
        el(ElementKind::Capacitor, (0.0, 0.0), (1.0, 0.0), Some("1"), &ctx),
        el(ElementKind::Inductor, (1.0, 0.0), (2.0, 0.0), Some("1"), &ctx),
        el(ElementKind::Ground, (2.0, 0.0), (2.0, -1.0), None, &ctx),
    ];
    let solver = Solver::new(0.01, 10.0, Scheme::Bdf2);
    let result = solver.solve(&netlist, &ctx).unwrap();

    let q_row = result.nb_p;
    let energy_at = |col: usize| {
        let p_drop = result.solution[(0, col)] - result.solution[(1, col)];
        let q = result.solution[(q_row, col)];
        0.5 * p_drop * p_drop + 0.5 * q * q
    };

    // Skip the first half-second: the instantaneous source pulse at t=0
    // is a genuine (if brief) excitation, not a clean initial condition,
    // and needs a moment to settle into the free-oscillation regime.
    let settle_col = 50;
    let last_col = result.solution.ncols() - 1;
    let settled_energy = energy_at(settle_col);
    let final_energy = energy_at(last_col);

    assert!(settled_energy > 0.05, "oscillation died out: {settled_energy}");
    assert!(
        (final_energy - settled_energy).abs() / settled_energy < 0.5,
        "energy drifted from {settled_energy} to {final_energy} over the run"
    );
}
