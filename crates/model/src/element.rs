//! The element kind table and the [`Element`] carrier type.

use calc::CalcContext;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::point::Point;

/// The kind of two-terminal element. Dispatch on this discriminant recovers
/// exhaustiveness where the original system relied on structural typing
/// across element classes (`Diode` being a subclass of `Wire`, `PSource` a
/// subclass of `Ground`, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// An ideal wire, collapsed away by the graph builder.
    Wire,
    /// A linear resistor.
    Resistor,
    /// A linear capacitor.
    Capacitor,
    /// A linear inductor.
    Inductor,
    /// A polarity-dependent diode.
    Diode,
    /// Anchors its first terminal's pressure to zero.
    Ground,
    /// Imposes a pressure at its first terminal.
    PSource,
    /// Imposes a flow along its enclosing path.
    QSource,
}

impl ElementKind {
    /// Returns `true` if elements of this kind are collapsed by the graph
    /// builder rather than becoming graph edges.
    #[must_use]
    pub fn is_wire_like(self) -> bool {
        matches!(self, ElementKind::Wire)
    }

    /// Returns `true` if a non-`None` value is meaningless for this kind.
    #[must_use]
    pub fn takes_value(self) -> bool {
        !matches!(self, ElementKind::Wire | ElementKind::Diode | ElementKind::Ground)
    }
}

/// A value expression, as entered by the user.
///
/// Invariant: [`Element::active`] is true if and only if this is
/// [`Value::Expr`] and that expression contains at least one free variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value was given.
    None,
    /// A literal numeric value (never re-evaluated).
    Number(f64),
    /// An expression string, evaluated once if it has no free variables or
    /// re-evaluated every step if it does.
    Expr(String),
}

/// One terminal of an element: its geometric position, and whether the
/// user marked it for pressure probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    /// Position of the terminal.
    pub point: Point,
    /// Whether the user placed a pressure probe on this terminal.
    pub probed: bool,
    /// Display name for the probe, if any.
    pub probe_name: String,
}

impl Terminal {
    /// Creates an unprobed terminal at `point`.
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self {
            point,
            probed: false,
            probe_name: String::new(),
        }
    }

    /// Marks this terminal as probed, with the given display name.
    #[must_use]
    pub fn probed(mut self, name: impl Into<String>) -> Self {
        self.probed = true;
        self.probe_name = name.into();
        self
    }
}

/// A two-terminal circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// The element's kind.
    pub kind: ElementKind,
    /// The two geometric terminals, in the element's intrinsic orientation.
    pub terminals: [Terminal; 2],
    /// Display name (not used by the solver).
    pub name: String,
    /// The value expression.
    pub value: Value,
    active: bool,
    /// Flow-probe sign relative to the element's intrinsic orientation:
    /// `0` for unprobed, `1` or `-1` otherwise.
    pub flow_probe: i8,
    /// Display name for the flow probe.
    pub flow_probe_name: String,
}

impl Element {
    /// Builds an element from a raw value string, exactly as the GUI would
    /// hand one in: `raw_value` is tried as a float literal first, then as
    /// an expression. A string that fails to parse as either is kept
    /// verbatim with `active = false`, deferring the error to whatever
    /// later tries to actually evaluate it — this mirrors the original
    /// system's `set_value`, which never raises at construction time.
    ///
    /// # Errors
    /// Returns [`ModelError::ValueNotApplicable`] if `kind` never takes a
    /// value (`Wire`, `Diode`, plain `Ground`) but `raw_value` is `Some`.
    pub fn new(
        kind: ElementKind,
        terminals: [Terminal; 2],
        name: impl Into<String>,
        raw_value: Option<&str>,
        ctx: &CalcContext,
        flow_probe: i8,
        flow_probe_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        if raw_value.is_some() && !kind.takes_value() {
            return Err(ModelError::ValueNotApplicable { kind });
        }

        let (value, active) = match raw_value {
            None => (Value::None, false),
            Some(raw) => match raw.parse::<f64>() {
                Ok(number) => (Value::Number(number), false),
                Err(_) => {
                    let active = ctx
                        .compile(raw)
                        .map(|expr| !expr.ordered_vars().is_empty())
                        .unwrap_or(false);
                    (Value::Expr(raw.to_string()), active)
                }
            },
        };

        Ok(Self {
            kind,
            terminals,
            name: name.into(),
            value,
            active,
            flow_probe,
            flow_probe_name: flow_probe_name.into(),
        })
    }

    /// Whether the value must be re-evaluated every time step.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminals() -> [Terminal; 2] {
        [
            Terminal::new(Point::new(0.0, 0.0)),
            Terminal::new(Point::new(1.0, 0.0)),
        ]
    }

    #[test]
    fn numeric_value_is_never_active() {
        let ctx = CalcContext::default();
        let e = Element::new(
            ElementKind::Resistor,
            terminals(),
            "R1",
            Some("1000"),
            &ctx,
            0,
            "",
        )
        .unwrap();
        assert!(!e.active());
        assert_eq!(e.value, Value::Number(1000.0));
    }

    #[test]
    fn expression_with_t_is_active() {
        let ctx = CalcContext::default();
        let e = Element::new(
            ElementKind::PSource,
            terminals(),
            "V1",
            Some("sin(2*pi*t)"),
            &ctx,
            1,
            "V1",
        )
        .unwrap();
        assert!(e.active());
    }

    #[test]
    fn expression_without_variables_is_not_active() {
        let ctx = CalcContext::default();
        let e = Element::new(
            ElementKind::Resistor,
            terminals(),
            "R1",
            Some("2 * pi"),
            &ctx,
            0,
            "",
        )
        .unwrap();
        assert!(!e.active());
    }

    #[test]
    fn wire_rejects_value() {
        let ctx = CalcContext::default();
        let err = Element::new(
            ElementKind::Wire,
            terminals(),
            "W1",
            Some("1"),
            &ctx,
            0,
            "",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::ValueNotApplicable {
                kind: ElementKind::Wire
            }
        );
    }
}
