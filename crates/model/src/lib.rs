//! Circuit element and netlist data model.
//!
//! An [`Element`] is a passive carrier: geometry, a display name, a value
//! expression, and probe flags. It has no behavior of its own beyond
//! deriving the `active` invariant from its value — the graph builder and
//! assembler crates do the actual work.

mod element;
mod error;
mod point;

pub use element::{Element, ElementKind, Terminal, Value};
pub use error::ModelError;
pub use point::Point;

/// An ordered list of elements, in element-parallel order with the
/// geometric terminals each element owns.
pub type Netlist = Vec<Element>;
