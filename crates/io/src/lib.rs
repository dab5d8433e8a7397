//! Netlist document reading and solution CSV export — the file-format edge
//! of the core, standing in for the out-of-scope GUI's save format and
//! plotting front-end.

mod csv;
mod error;
mod format;
mod netlist;

pub use csv::{ExportMode, export_csv};
pub use error::IoError;
pub use format::format_g11;
pub use netlist::{ElementDoc, NetlistDocument};
