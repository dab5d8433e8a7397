use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Solve a lumped-parameter network from a netlist document and report or
/// export the probed time series.
#[derive(Parser)]
pub struct Cli {
    /// Path to the netlist document (JSON).
    pub netlist: PathBuf,

    /// Time step, in seconds.
    #[arg(long, default_value_t = 0.01)]
    pub dt: f64,

    /// Simulated duration, in seconds.
    #[arg(long, default_value_t = 10.0)]
    pub maxtime: f64,

    /// Backward-difference integration scheme.
    #[arg(long, value_enum, default_value_t = SchemeArg::Bdf2)]
    pub scheme: SchemeArg,

    /// Resistance substituted for a diode while its flow direction is being
    /// probed on a singular system.
    #[arg(long, default_value_t = solver::RESISTOR_SUBSTITUTE)]
    pub diode_resistor_substitute: f64,

    /// Write the solution to this CSV path instead of printing a summary.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// With `--csv`, emit only probed columns instead of every state.
    #[arg(long)]
    pub probed_only: bool,

    /// Increase log verbosity (`-v` for info, `-vv` for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI spelling of [`solver::Scheme`].
#[derive(Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    /// First-order backward difference.
    Bdf,
    /// Second-order backward difference.
    Bdf2,
    /// Third-order backward difference.
    Bdf3,
}

impl From<SchemeArg> for solver::Scheme {
    fn from(value: SchemeArg) -> Self {
        match value {
            SchemeArg::Bdf => solver::Scheme::Bdf1,
            SchemeArg::Bdf2 => solver::Scheme::Bdf2,
            SchemeArg::Bdf3 => solver::Scheme::Bdf3,
        }
    }
}
