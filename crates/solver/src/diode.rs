//! Diode polarity state machine.

use nalgebra::{DMatrix, DVector};

/// The resistance substituted for a diode when both `Open` and `Closed`
/// produce a singular system, used only to probe the flow direction.
pub const RESISTOR_SUBSTITUTE: f64 = 0.1;

/// A diode's current row-stamp regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiodeState {
    /// Pressure continuity across the diode; flow is unconstrained here.
    Open,
    /// `Q = 0`.
    Closed,
    /// A weak linear resistor, used only to resolve a singular tie.
    Resistor,
}

/// Bookkeeping for one diode: its row, the three columns its stamp touches,
/// and the sign of its flow relative to the enclosing path's orientation.
#[derive(Debug, Clone, Copy)]
pub struct DiodeRecord {
    /// The diode's row in `M0`/`M1`.
    pub row: usize,
    /// Column of the path-walk's entry pressure.
    pub id_p0: usize,
    /// Column of the path-walk's exit pressure.
    pub id_p1: usize,
    /// Column of the enclosing path's flow unknown.
    pub id_q: usize,
    /// `+1.0` if the diode's intrinsic start coincides with `id_p0`,
    /// `-1.0` otherwise.
    pub sign: f64,
}

impl DiodeRecord {
    /// Stamps `m0` for `state` at this diode's row, substituting
    /// `resistor_substitute` as the resistance for [`DiodeState::Resistor`].
    pub fn stamp(&self, state: DiodeState, resistor_substitute: f64, m0: &mut DMatrix<f64>) {
        match state {
            DiodeState::Open => {
                m0[(self.row, self.id_p1)] = 1.0;
                m0[(self.row, self.id_p0)] = -1.0;
                m0[(self.row, self.id_q)] = 0.0;
            }
            DiodeState::Closed => {
                m0[(self.row, self.id_p1)] = 0.0;
                m0[(self.row, self.id_p0)] = 0.0;
                m0[(self.row, self.id_q)] = 1.0;
            }
            DiodeState::Resistor => {
                m0[(self.row, self.id_p1)] = -1.0;
                m0[(self.row, self.id_p0)] = 1.0;
                m0[(self.row, self.id_q)] = -resistor_substitute;
            }
        }
    }

    /// Applies the per-step transition rule given the just-solved column of
    /// `solution`. Returns the new state if a transition occurred.
    #[must_use]
    pub fn transition(&self, state: DiodeState, solution_col: &DVector<f64>) -> Option<DiodeState> {
        match state {
            DiodeState::Open => {
                let q = solution_col[self.id_q];
                (self.sign * q < 0.0).then_some(DiodeState::Closed)
            }
            DiodeState::Closed | DiodeState::Resistor => {
                let diff = solution_col[self.id_p0] - solution_col[self.id_p1];
                (self.sign * diff > 0.0).then_some(DiodeState::Open)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DiodeRecord {
        DiodeRecord { row: 0, id_p0: 0, id_p1: 1, id_q: 2, sign: 1.0 }
    }

    #[test]
    fn open_transitions_to_closed_on_reverse_flow() {
        let d = record();
        let sol = DVector::from_vec(vec![0.0, 0.0, -0.5]);
        assert_eq!(d.transition(DiodeState::Open, &sol), Some(DiodeState::Closed));
    }

    #[test]
    fn closed_transitions_to_open_when_forward_biased() {
        let d = record();
        let sol = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        assert_eq!(d.transition(DiodeState::Closed, &sol), Some(DiodeState::Open));
    }

    #[test]
    fn stable_states_report_no_transition() {
        let d = record();
        let sol = DVector::from_vec(vec![0.0, 0.0, 0.5]);
        assert_eq!(d.transition(DiodeState::Open, &sol), None);
    }

    #[test]
    fn resistor_transitions_to_open_when_forward_biased() {
        // Resistor state is resolved from P0-P1, same as Closed, never from Q.
        let d = record();
        let sol = DVector::from_vec(vec![1.0, 0.0, -5.0]);
        assert_eq!(d.transition(DiodeState::Resistor, &sol), Some(DiodeState::Open));
    }

    #[test]
    fn resistor_stays_resistor_when_reverse_biased() {
        let d = record();
        let sol = DVector::from_vec(vec![0.0, 1.0, 5.0]);
        assert_eq!(d.transition(DiodeState::Resistor, &sol), None);
    }
}
