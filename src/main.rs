//! # sat3
//!
//! `sat3` decides satisfiability of an exactly-3-SAT formula read from a
//! constrained textual grammar, running three independent search strategies
//! over the same formula and writing one best-assignment file per strategy.
//!
//! ## Input format
//!
//! One clause per line, each clause exactly three `|`-separated literals; a
//! literal is `x` followed by digits, optionally prefixed with `!`. Spaces
//! and tabs are ignored. Example:
//!
//! ```text
//! x1|x2|!x3
//! !x1|x2|x3
//! ```
//!
//! ## Usage
//!
//! ```sh
//! sat3 <input>
//! sat3 <input> <brute-output> <random-output> <genetic-output>
//! ```
//!
//! With one path the solutions go to `brute.txt`, `random.txt` and
//! `genetic.txt`; with four paths the output files are explicit. Any other
//! number of paths exits immediately with a non-zero status. The iteration
//! budgets and genetic parameters are prompted for on stdin unless
//! `--defaults` is given; `--seed` makes both randomized searches
//! deterministic.

use anyhow::Context;
use clap::Parser;
use sat3::console::{Console, Defaults, ParameterSource};
use sat3::exhaustive::Exhaustive;
use sat3::formula::Formula;
use sat3::genetic::{Genetic, GeneticConfig};
use sat3::grammar;
use sat3::local_search::{LocalSearch, LocalSearchConfig};
use sat3::solution::save_solution;
use sat3::solver::Search;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Global allocator, matching the solver's release configuration and
/// feeding the memory statistics below.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_BRUTE_OUTPUT: &str = "brute.txt";
const DEFAULT_RANDOM_OUTPUT: &str = "random.txt";
const DEFAULT_GENETIC_OUTPUT: &str = "genetic.txt";

/// Command-line interface: one input path, optionally followed by exactly
/// three output paths.
#[derive(Parser, Debug)]
#[command(name = "sat3", version, about = "An exactly-3-SAT solver")]
struct Cli {
    /// Path to the formula source file.
    input: String,

    /// Output paths for the three solution files, in the order
    /// brute / random / genetic. All three or none.
    #[arg(num_args = 0..=3)]
    outputs: Vec<String>,

    /// Seed for the randomized searches, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Use the default parameters for every search instead of prompting.
    #[arg(long)]
    defaults: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (brute_path, random_path, genetic_path) = match cli.outputs.as_slice() {
        [] => {
            println!("Using the default filepaths for output.");
            (
                DEFAULT_BRUTE_OUTPUT.to_owned(),
                DEFAULT_RANDOM_OUTPUT.to_owned(),
                DEFAULT_GENETIC_OUTPUT.to_owned(),
            )
        }
        [brute, random, genetic] => {
            println!("Using the user-defined filepaths for output.");
            (brute.clone(), random.clone(), genetic.clone())
        }
        _ => {
            eprintln!("Provide exactly one or four file paths.");
            std::process::exit(2);
        }
    };

    let parse_start = Instant::now();
    let tokens = grammar::load(&cli.input)
        .with_context(|| format!("failed to parse {}", cli.input))?;
    let mut formula = Formula::try_from(tokens)
        .with_context(|| format!("failed to build a formula from {}", cli.input))?;
    let parse_time = parse_start.elapsed();

    println!("{formula}");
    print_problem_stats(&formula, parse_time);

    let mut source: Box<dyn ParameterSource> = if cli.defaults {
        Box::new(Defaults)
    } else {
        Box::new(Console::new())
    };

    run_search(&mut Exhaustive::new(), &mut formula, &brute_path);

    let local_config = LocalSearchConfig::from_source(source.as_mut());
    let mut local = match cli.seed {
        Some(seed) => LocalSearch::with_seed(local_config, seed),
        None => LocalSearch::new(local_config),
    };
    run_search(&mut local, &mut formula, &random_path);

    let genetic_config = GeneticConfig::from_source(source.as_mut());
    let mut genetic = match cli.seed {
        Some(seed) => Genetic::with_seed(genetic_config, seed),
        None => Genetic::new(genetic_config),
    };
    run_search(&mut genetic, &mut formula, &genetic_path);

    print_memory_stats();
    Ok(())
}

/// Runs one strategy, reports its outcome and persists its best solution.
///
/// A precondition failure aborts this strategy only; the remaining
/// strategies still run against the shared formula.
fn run_search(search: &mut dyn Search, formula: &mut Formula, output: &str) {
    println!("\n[{}]", search.name().to_uppercase());

    let start = Instant::now();
    match search.run(formula) {
        Ok(outcome) => {
            let elapsed = start.elapsed();
            if outcome.satisfied {
                println!(
                    "Found a satisfying assignment after {} iteration(s).",
                    outcome.iterations
                );
            } else {
                println!(
                    "No satisfying assignment found; best fitness {} of {} clause(s).",
                    outcome.best_fitness,
                    formula.clause_count()
                );
            }
            print_search_stats(outcome.iterations, outcome.best_fitness, elapsed);
            save_solution(&outcome.best, output);
        }
        Err(err) => {
            eprintln!("{}: {err}", search.name());
        }
    }
}

/// Helper to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {:<28} {:>18}  |", label, value);
}

fn print_problem_stats(formula: &Formula, parse_time: Duration) {
    println!("\n=====================[ Problem Statistics ]======================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", formula.variable_count());
    stat_line("Clauses", formula.clause_count());
    println!("=================================================================");
}

fn print_search_stats(iterations: u64, best_fitness: usize, elapsed: Duration) {
    let elapsed_secs = elapsed.as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        iterations as f64 / elapsed_secs
    } else {
        0.0
    };
    stat_line("Iterations", iterations);
    stat_line("Iterations/sec", format!("{rate:.0}"));
    stat_line("Best fitness", best_fitness);
    stat_line("Search time (s)", format!("{elapsed_secs:.3}"));
}

/// Reads allocator statistics and prints them in MiB. Failures to read the
/// stats are ignored; they must never interfere with a finished run.
fn print_memory_stats() {
    if epoch::advance().is_err() {
        return;
    }
    let allocated = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .unwrap_or(0);
    let resident = stats::resident::mib()
        .and_then(|mib| mib.read())
        .unwrap_or(0);

    println!("\n======================[ Memory Statistics ]======================");
    stat_line(
        "Memory usage (MiB)",
        format!("{:.2}", allocated as f64 / (1024.0 * 1024.0)),
    );
    stat_line(
        "Resident memory (MiB)",
        format!("{:.2}", resident as f64 / (1024.0 * 1024.0)),
    );
    println!("=================================================================");
}
