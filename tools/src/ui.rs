//! Human-readable output: overview, reports and colourised decks.

use shufflelab_core::{
    baseline::Calibration,
    config::ExperimentConfig,
    report::{
        MetricReports, ADJACENCY_EXPECTED, DISPLACEMENT_EXPECTED, UNIFORMITY_EXPECTED,
    },
    search::SearchOutcome,
    sequence::SequenceSpace,
    shuffle::ShuffleTables,
    types::{card_label, suit_of, Card, Deck, Suit, CANONICAL_DECK},
};
use std::io::{self, Write};

const CARDS_PER_ROW: usize = 13;
const BAR_WIDTH: f64 = 40.0;

pub fn print_logo(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "              ♠  S H U F F L E L A B  ♠")?;
    writeln!(out)
}

pub fn print_usage(out: &mut impl Write) -> io::Result<()> {
    print_logo(out)?;
    writeln!(out, "Card shuffle analysis tool")?;
    writeln!(out, "Use --run to execute a default experiment")?;
    writeln!(out, "Use --help to see available options")?;
    writeln!(out)
}

pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Usage: shufflelab [--run [options] | --help | --desc]")?;
    writeln!(out)?;
    writeln!(out, "Modes:")?;
    writeln!(out, "  --run               run an experiment (default: k=5, trials=50, all tests)")?;
    writeln!(out, "  --help              show this message")?;
    writeln!(out, "  --desc              describe the shuffle models and tests")?;
    writeln!(out)?;
    writeln!(out, "Run options:")?;
    writeln!(out, "  --k <1-8>           longest shuffle sequence")?;
    writeln!(out, "  --trials <1-100>    trials per sequence")?;
    writeln!(out, "  --uniformity        position-frequency test")?;
    writeln!(out, "  --adjacency         card-follower test")?;
    writeln!(out, "  --mixing            displacement test")?;
    writeln!(out, "  --seed <u64>        master seed (default: random)")?;
    writeln!(out, "  --config <path>     JSON file overriding defaults")?;
    writeln!(out, "  --sequential        evaluate on a single thread")?;
    writeln!(out)?;
    writeln!(out, "With no test flags every test runs; otherwise only the named ones.")?;
    writeln!(out, "Set RUST_LOG=debug for per-candidate logging.")
}

pub fn print_desc(out: &mut impl Write, tables: &ShuffleTables) -> io::Result<()> {
    writeln!(out, "Shuffle models")?;
    writeln!(out, "  Cut       one cut near the middle of the deck")?;
    writeln!(out, "  Riffle    GSR riffle: split, then drop from each packet in")?;
    writeln!(out, "            proportion to the cards it still holds")?;
    writeln!(out, "  Hindu     1-4 pick-ups; each lifts a top packet and drops it")?;
    writeln!(out, "            back in small chunks")?;
    writeln!(out, "  Overhand  a single pick-up of a smaller packet")?;
    writeln!(out)?;
    writeln!(out, "Tests")?;
    writeln!(out, "  Uniformity  χ² of card positions        (expected ≈ {UNIFORMITY_EXPECTED})")?;
    writeln!(out, "  Adjacency   χ² of card followers        (expected ≈ {ADJACENCY_EXPECTED})")?;
    writeln!(out, "  Mixing      mean distance travelled     (expected ≈ {DISPLACEMENT_EXPECTED})")?;
    writeln!(out)?;
    writeln!(out, "Sampling distributions (integer weights, total ≈ 1000)")?;
    for (name, table) in tables.named() {
        writeln!(out)?;
        writeln!(out, "  [{name}]")?;
        let weights = table.weights();
        let peak = weights.iter().copied().max().unwrap_or(0).max(1) as f64;
        for (idx, &w) in weights.iter().enumerate().filter(|(_, w)| **w > 0) {
            let bar = "=".repeat((w as f64 / peak * BAR_WIDTH).round() as usize);
            writeln!(out, "  {idx:>3} |{bar} ({w})")?;
        }
    }
    Ok(())
}

pub fn print_overview(out: &mut impl Write, cfg: &ExperimentConfig, space: &SequenceSpace) -> io::Result<()> {
    let tests = cfg.tests.labels();
    writeln!(out)?;
    writeln!(out, "ShuffleLab — Randomness Analysis")?;
    writeln!(out, "--------------------------------")?;
    writeln!(out, "Evaluating {} sequences", space.len())?;
    writeln!(out, "Max shuffles per sequence : {}", cfg.k_max)?;
    writeln!(out, "Trials                    : {}", cfg.trials)?;
    writeln!(out, "Seed                      : {}", cfg.seed)?;
    writeln!(
        out,
        "Tests                     : {}",
        if tests.is_empty() { "None".to_string() } else { tests.join(", ") }
    )
}

pub fn print_results(
    out: &mut impl Write,
    outcome: &SearchOutcome,
    reference: &Calibration,
) -> io::Result<()> {
    writeln!(out)?;
    if outcome.cancelled {
        writeln!(out, "(cancelled after {} of {} sequences)", outcome.evaluated, outcome.total)?;
    }
    let (Some(best), Some(reports)) = (&outcome.best, outcome.reports()) else {
        return writeln!(out, "No sequence evaluated.");
    };

    writeln!(out, "Best-performing shuffle sequence:")?;
    writeln!(out, "  {}", best.sequence)?;
    writeln!(out, "  score {:.4}", best.score)?;
    writeln!(out)?;

    print_reports(out, &reports, &reference.reports)?;

    writeln!(out, "Example before and after of the sequence on a sorted deck:")?;
    writeln!(out)?;
    print_deck_rows(out, &CANONICAL_DECK)?;
    writeln!(out)?;
    print_deck_rows(out, best.context.deck())?;
    writeln!(out)?;
    writeln!(out, "Done.")
}

fn print_reports(out: &mut impl Write, r: &MetricReports, uniform: &MetricReports) -> io::Result<()> {
    if let Some(u) = &r.uniformity {
        writeln!(out, "[Uniformity — Chi-Squared]")?;
        writeln!(out, "  Mean χ² : {:.3}", u.mean_chi_sq)?;
        writeln!(out, "  Expected χ² ≈ {UNIFORMITY_EXPECTED}")?;
        if let Some(base) = &uniform.uniformity {
            writeln!(out, "  Uniform shuffle χ² : {:.3}", base.mean_chi_sq)?;
        }
        writeln!(out)?;
    }
    if let Some(a) = &r.adjacency {
        writeln!(out, "[Adjacency — Chi-Squared]")?;
        writeln!(out, "  Mean χ² : {:.3}", a.mean_chi_sq)?;
        writeln!(out, "  Expected χ² ≈ {ADJACENCY_EXPECTED}")?;
        if let Some(base) = &uniform.adjacency {
            writeln!(out, "  Uniform shuffle χ² : {:.3}", base.mean_chi_sq)?;
        }
        writeln!(out)?;
    }
    if let Some(d) = &r.displacement {
        writeln!(out, "[Mixing Speed — Displacement]")?;
        writeln!(out, "  Mean : {:.3}", d.mean)?;
        writeln!(out, "  Expected ≈ {DISPLACEMENT_EXPECTED}")?;
        if let Some(base) = &uniform.displacement {
            writeln!(out, "  Uniform shuffle : {:.3}", base.mean)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn suit_colour(suit: Suit) -> &'static str {
    match suit {
        Suit::Clubs    => "\x1b[38;2;0;200;83m",
        Suit::Diamonds => "\x1b[38;2;41;121;255m",
        Suit::Hearts   => "\x1b[38;2;213;0;0m",
        Suit::Spades   => "\x1b[38;2;170;0;255m",
    }
}

pub fn coloured_card(card: Card) -> String {
    format!("{}{}\x1b[0m", suit_colour(suit_of(card)), card_label(card))
}

pub fn print_deck_rows(out: &mut impl Write, deck: &Deck) -> io::Result<()> {
    for row in deck.chunks(CARDS_PER_ROW) {
        let line: Vec<String> = row.iter().map(|&c| coloured_card(c)).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}
