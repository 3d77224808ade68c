//! shufflelab: search for the human shuffle sequence closest to uniform.
//!
//! Usage:
//!   shufflelab --run
//!   shufflelab --run --k 3 --trials 100 --adjacency --seed 12345
//!   shufflelab --desc

mod cli;
mod ui;

use anyhow::Result;
use cli::{Invocation, RunOptions};
use shufflelab_core::{
    baseline::calibrate_uniform,
    config::ModelParams,
    rng::entropy_seed,
    search::ShuffleSearch,
    shuffle::ShuffleTables,
};
use std::io::{self, Write};
use std::process::ExitCode;

/// Calibration chunk count upper bound.
const REFERENCE_CHUNKS: u64 = 4;

fn main() -> ExitCode {
    env_logger::init();

    let invocation = match cli::parse(std::env::args_os()) {
        Ok(inv) => inv,
        Err(e) => return fail(&e),
    };

    match execute(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &anyhow::Error) -> ExitCode {
    eprintln!("error: {e:#}");
    eprintln!("use --help for usage");
    ExitCode::from(1)
}

fn execute(invocation: Invocation) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match invocation {
        Invocation::Usage => ui::print_usage(&mut out)?,
        Invocation::Help => ui::print_help(&mut out)?,
        Invocation::Desc => {
            let tables = ShuffleTables::build(&ModelParams::default())?;
            ui::print_desc(&mut out, &tables)?;
        }
        Invocation::Run(opts) => run_experiment(&mut out, opts)?,
    }
    out.flush()?;
    Ok(())
}

fn run_experiment(out: &mut impl Write, opts: RunOptions) -> Result<()> {
    let config = opts.into_config(entropy_seed)?;
    let search = ShuffleSearch::new(config)?;
    let cfg = search.config();

    ui::print_overview(out, cfg, search.space())?;
    out.flush()?;

    let outcome = search.run();

    let trials = cfg.trials as u64;
    log::info!("calibrating uniform reference over {trials} decks");
    let reference = calibrate_uniform(trials, trials.min(REFERENCE_CHUNKS), cfg.seed)?;

    ui::print_results(out, &outcome, &reference)?;
    Ok(())
}
