//! CSV export of a solved circuit's time series.

use std::io::Write as _;
use std::path::Path;

use solver::SolveResult;

use crate::error::IoError;
use crate::format::format_g11;

/// Which columns an export emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Every state row, named `P<i>`/`Q<i>` when no probe name was given.
    Full,
    /// Only rows present in the probe map, in probe-map iteration order.
    ProbedOnly,
}

/// Writes `result`'s solution to `path` as tab-delimited `%.11g` CSV, with a
/// `Time` first column and one header line.
///
/// # Errors
/// Returns [`IoError::Write`] if `path` cannot be created or written.
pub fn export_csv(result: &SolveResult, path: &Path, mode: ExportMode) -> Result<(), IoError> {
    let rows = match mode {
        ExportMode::Full => full_row_indices(result),
        ExportMode::ProbedOnly => result.probe_names.keys().copied().collect(),
    };

    let mut file = std::fs::File::create(path).map_err(|source| IoError::Write {
        path: path.display().to_string(),
        source,
    })?;

    write_csv(&mut file, result, &rows).map_err(|source| IoError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn full_row_indices(result: &SolveResult) -> Vec<usize> {
    (0..result.nb_p + result.nb_q).collect()
}

fn row_name(result: &SolveResult, row: usize) -> String {
    match result.probe_names.get(&row) {
        Some(name) => name.clone(),
        None if row < result.nb_p => format!("P{row}"),
        None => format!("Q{row}"),
    }
}

fn write_csv(out: &mut impl std::io::Write, result: &SolveResult, rows: &[usize]) -> std::io::Result<()> {
    let names: Vec<String> = rows.iter().map(|&row| row_name(result, row)).collect();
    writeln!(out, "Time\t{}", names.join("\t"))?;

    for col in 0..result.solution.ncols() {
        let time = col as f64 * result.dt;
        let values: Vec<String> = rows
            .iter()
            .map(|&row| format_g11(result.solution[(row, col)]))
            .collect();
        writeln!(out, "{}\t{}", format_g11(time), values.join("\t"))?;
    }
    Ok(())
}
