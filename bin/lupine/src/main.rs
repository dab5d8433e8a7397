//! CLI for solving a lumped-parameter network from a netlist document.

mod args;

use anyhow::Context;
use calc::CalcContext;
use clap::Parser as _;
use io::{ExportMode, NetlistDocument};
use log::info;
use solver::Solver;

use crate::args::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = CalcContext::default();
    let document = NetlistDocument::read(&cli.netlist)
        .with_context(|| format!("failed to read netlist {}", cli.netlist.display()))?;
    let netlist = document
        .into_netlist(&ctx)
        .context("failed to compile netlist element values")?;

    info!("solving {} elements", netlist.len());

    let solver = Solver::new(cli.dt, cli.maxtime, cli.scheme.into())
        .with_resistor_substitute(cli.diode_resistor_substitute);
    let result = solver
        .solve(&netlist, &ctx)
        .context("failed to solve circuit")?;

    match cli.csv {
        Some(path) => {
            let mode = if cli.probed_only { ExportMode::ProbedOnly } else { ExportMode::Full };
            io::export_csv(&result, &path, mode)
                .with_context(|| format!("failed to write CSV to {}", path.display()))?;
            println!("wrote solution to {}", path.display());
        }
        None => print_summary(&result),
    }

    Ok(())
}

fn print_summary(result: &solver::SolveResult) {
    let last_col = result.solution.ncols() - 1;
    for (&row, name) in &result.probe_names {
        println!("{name} = {}", result.solution[(row, last_col)]);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
