//! RC step response: a quantitative check against the analytic
//! `1 - e^{-t/RC}` charging curve.

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

/// `(t>0) -> 1-ohm Resistor -> 1-farad Capacitor -> GND`. The source is a
/// genuine unit step rather than a bare constant, since a constant DC
/// source's steady-state initial column is already fully charged (the
/// solver seeds every run from the algebraic operating point, per
/// `Solver::solve`'s doc comment) and would never show a transient at all.
#[test]
fn capacitor_voltage_tracks_the_analytic_charging_curve_at_one_time_constant() {
    let ctx = CalcContext::default();
    let netlist = vec![
        el(ElementKind::PSource, (0.0, 0.0), (0.0, -1.0), Some("(t>0)"), &ctx),
        el(ElementKind::Resistor, (0.0, 0.0), (1.0, 0.0), Some("1"), &ctx),
        el(ElementKind::Capacitor, (1.0, 0.0), (2.0, 0.0), Some("1"), &ctx),
        el(ElementKind::Ground, (2.0, 0.0), (2.0, -1.0), None, &ctx),
    ];
    let dt = 0.01;
    let solver = Solver::new(dt, 5.0, Scheme::Bdf2);
    let result = solver.solve(&netlist, &ctx).unwrap();

    let junction = 1;
    let col_at_one_second = (1.0 / dt).round() as usize;
    let p_c = result.solution[(junction, col_at_one_second)];
    let expected = 1.0 - (-1.0_f64).exp();
    assert!((p_c - expected).abs() < 0.01, "P_C(1.00) = {p_c}, expected ~{expected}");
}
