//! Command-line surface.
//!
//! Modes are mutually exclusive: `--run`, `--help`, `--desc`. With no mode
//! the runner prints a short hint. Every experiment flag requires `--run`.

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use shufflelab_core::config::{
    Execution, ExperimentConfig, TestSelection, K_MAX, K_MIN, TRIALS_MAX, TRIALS_MIN,
};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "shufflelab", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Run an experiment.
    #[arg(long)]
    run: bool,
    /// Show usage.
    #[arg(long)]
    help: bool,
    /// Describe the shuffle models and tests.
    #[arg(long)]
    desc: bool,

    /// Longest shuffle sequence.
    #[arg(long, value_parser = clap::value_parser!(u64).range(K_MIN as u64..=K_MAX as u64))]
    k: Option<u64>,
    /// Trials per sequence.
    #[arg(long, value_parser = clap::value_parser!(u64).range(TRIALS_MIN as u64..=TRIALS_MAX as u64))]
    trials: Option<u64>,

    #[arg(long)]
    uniformity: bool,
    #[arg(long)]
    adjacency: bool,
    #[arg(long)]
    mixing: bool,

    /// Master seed. Omit for a fresh random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file overriding the experiment defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Evaluate candidates on one thread.
    #[arg(long)]
    sequential: bool,
}

impl Args {
    fn experiment_flags(&self) -> bool {
        self.k.is_some()
            || self.trials.is_some()
            || self.uniformity
            || self.adjacency
            || self.mixing
            || self.seed.is_some()
            || self.config.is_some()
            || self.sequential
    }
}

/// What the runner should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Usage,
    Help,
    Desc,
    Run(RunOptions),
}

/// Experiment overrides gathered from the command line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub k:          Option<usize>,
    pub trials:     Option<usize>,
    /// `None` when no toggle was given: every test runs.
    pub tests:      Option<TestSelection>,
    pub seed:       Option<u64>,
    pub config:     Option<PathBuf>,
    pub sequential: bool,
}

impl RunOptions {
    /// Layer the overrides on the defaults (or the config file).
    /// `fresh_seed` is only called when neither flag nor file fixes the seed.
    pub fn into_config(self, fresh_seed: impl FnOnce() -> u64) -> Result<ExperimentConfig> {
        let mut cfg = match &self.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(k) = self.k {
            cfg.k_max = k;
        }
        if let Some(trials) = self.trials {
            cfg.trials = trials;
        }
        if let Some(tests) = self.tests {
            cfg.tests = tests;
        }
        match self.seed {
            Some(seed) => cfg.seed = seed,
            None if self.config.is_none() => cfg.seed = fresh_seed(),
            None => {}
        }
        if self.sequential {
            cfg.execution = Execution::Sequential;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Parse and validate the full argument list (program name first).
pub fn parse<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::try_parse_from(args).map_err(|e| anyhow!(clap_message(&e)))?;

    let modes = [args.run, args.help, args.desc].iter().filter(|&&m| m).count();
    if modes > 1 {
        bail!("choose only one of --run, --help, or --desc");
    }
    let experiment = args.experiment_flags();
    if (args.help || args.desc) && experiment {
        bail!("--help and --desc cannot be combined with experiment flags");
    }
    if !args.run && experiment {
        bail!("experiment flags require --run");
    }

    if args.help {
        return Ok(Invocation::Help);
    }
    if args.desc {
        return Ok(Invocation::Desc);
    }
    if !args.run {
        return Ok(Invocation::Usage);
    }

    let toggled = args.uniformity || args.adjacency || args.mixing;
    Ok(Invocation::Run(RunOptions {
        k:      args.k.map(|k| k as usize),
        trials: args.trials.map(|t| t as usize),
        tests:  toggled.then_some(TestSelection {
            uniformity: args.uniformity,
            adjacency:  args.adjacency,
            mixing:     args.mixing,
        }),
        seed:       args.seed,
        config:     args.config,
        sequential: args.sequential,
    }))
}

/// First line of a clap error, without its own `error:` prefix.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<Invocation> {
        parse(std::iter::once("shufflelab").chain(args.iter().copied()))
    }

    #[test]
    fn no_arguments_prints_usage() {
        assert_eq!(parse_args(&[]).unwrap(), Invocation::Usage);
    }

    #[test]
    fn modes_are_exclusive() {
        assert!(parse_args(&["--run", "--help"]).is_err());
        assert!(parse_args(&["--desc", "--help"]).is_err());
    }

    #[test]
    fn experiment_flags_require_run() {
        let err = parse_args(&["--k", "3"]).unwrap_err();
        assert!(err.to_string().contains("require --run"));
        assert!(parse_args(&["--help", "--trials", "5"]).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse_args(&["--run", "--k", "0"]).is_err());
        assert!(parse_args(&["--run", "--k", "9"]).is_err());
        assert!(parse_args(&["--run", "--trials", "101"]).is_err());
        assert!(parse_args(&["--run", "--trials"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse_args(&["--run", "--bogus"]).is_err());
    }

    #[test]
    fn default_run_enables_every_test() {
        let Invocation::Run(opts) = parse_args(&["--run"]).unwrap() else {
            panic!("expected run");
        };
        let cfg = opts.into_config(|| 7).unwrap();
        assert_eq!(cfg.k_max, 5);
        assert_eq!(cfg.trials, 50);
        assert_eq!(cfg.tests, TestSelection::ALL);
        assert_eq!(cfg.seed, 7);
    }

    #[test]
    fn toggles_select_only_named_tests() {
        let Invocation::Run(opts) =
            parse_args(&["--run", "--k", "2", "--trials", "10", "--adjacency", "--seed", "9"]).unwrap()
        else {
            panic!("expected run");
        };
        let cfg = opts.into_config(|| unreachable!()).unwrap();
        assert_eq!(cfg.k_max, 2);
        assert_eq!(cfg.trials, 10);
        assert_eq!(cfg.seed, 9);
        assert_eq!(
            cfg.tests,
            TestSelection { uniformity: false, adjacency: true, mixing: false }
        );
    }
}
