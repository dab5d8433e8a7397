//! Reads the CLI's netlist document format: a JSON array of elements, each
//! naming its kind, terminal geometry, raw value string, and probe flags.
//!
//! This format stands in for the out-of-scope GUI's own save format — the
//! GUI's JSON schema, widget panels, and file dialogs are not part of this
//! core, but something has to hand the core an element list, and JSON is
//! the natural on-disk shape for it.

use std::path::Path;

use calc::CalcContext;
use model::{Element, ElementKind, Netlist, Terminal};
use serde::Deserialize;

use crate::error::IoError;

/// One element as it appears in a netlist document: a raw value string
/// rather than the compiled [`model::Value`], since compiling requires a
/// [`CalcContext`] the document format has no business carrying.
#[derive(Debug, Deserialize)]
pub struct ElementDoc {
    /// The element's kind.
    pub kind: ElementKind,
    /// The two terminals, in the element's intrinsic orientation.
    pub terminals: [Terminal; 2],
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Raw value string or number-as-string, absent for kinds that ignore
    /// a value.
    #[serde(default)]
    pub value: Option<String>,
    /// Flow-probe sign, `-1`, `0`, or `1`.
    #[serde(default)]
    pub flow_probe: i8,
    /// Flow-probe display name.
    #[serde(default)]
    pub flow_probe_name: String,
}

/// A netlist document: a flat array of elements, in element-parallel order.
#[derive(Debug, Deserialize)]
pub struct NetlistDocument {
    /// The elements, in netlist order.
    pub elements: Vec<ElementDoc>,
}

impl NetlistDocument {
    /// Parses a document from its JSON text.
    ///
    /// # Errors
    /// Returns [`IoError::Parse`] if `text` is not valid JSON matching the
    /// document shape.
    pub fn parse(text: &str) -> Result<Self, IoError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a document from `path`.
    ///
    /// # Errors
    /// Returns [`IoError::Read`] if the file cannot be read, or
    /// [`IoError::Parse`] if its contents are not valid JSON.
    pub fn read(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path).map_err(|source| IoError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Compiles every element's raw value against `ctx`, producing a
    /// [`Netlist`] ready for [`solver::Solver::solve`].
    ///
    /// # Errors
    /// Returns [`IoError::Model`] if an element's kind rejects a value it
    /// was given, or its value expression fails to compile.
    pub fn into_netlist(self, ctx: &CalcContext) -> Result<Netlist, IoError> {
        self.elements
            .into_iter()
            .map(|doc| {
                Element::new(
                    doc.kind,
                    doc.terminals,
                    doc.name,
                    doc.value.as_deref(),
                    ctx,
                    doc.flow_probe,
                    doc.flow_probe_name,
                )
                .map_err(IoError::from)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_voltage_divider() {
        let text = r#"{
            "elements": [
                {"kind": "PSource", "terminals": [{"point": {"x": 0.0, "y": 0.0}, "probed": false, "probe_name": ""}, {"point": {"x": 0.0, "y": -1.0}, "probed": false, "probe_name": ""}], "value": "5"},
                {"kind": "Resistor", "terminals": [{"point": {"x": 0.0, "y": 0.0}, "probed": false, "probe_name": ""}, {"point": {"x": 1.0, "y": 0.0}, "probed": true, "probe_name": "mid"}], "value": "1000"},
                {"kind": "Ground", "terminals": [{"point": {"x": 1.0, "y": 0.0}, "probed": false, "probe_name": ""}, {"point": {"x": 1.0, "y": -1.0}, "probed": false, "probe_name": ""}]}
            ]
        }"#;
        let doc = NetlistDocument::parse(text).unwrap();
        assert_eq!(doc.elements.len(), 3);
        let ctx = CalcContext::default();
        let netlist = doc.into_netlist(&ctx).unwrap();
        assert_eq!(netlist.len(), 3);
    }
}
