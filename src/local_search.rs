#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Stochastic local search: single-bit-flip hill climbing with probabilistic
//! acceptance of worsening moves at a fixed temperature.

use crate::console::ParameterSource;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::solver::{Search, SearchOutcome};

/// Iteration budget for one run. Built either from explicit values or from a
/// [`ParameterSource`], where the sentinel answer selects the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSearchConfig {
    pub iterations: u64,
}

impl LocalSearchConfig {
    pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

    /// Prompts for the iteration budget, falling back to the default on the
    /// sentinel answer.
    pub fn from_source(source: &mut dyn ParameterSource) -> Self {
        let iterations = source.integer(
            1,
            1_000_000_000,
            "Local search: number of iterations to allow? ",
        );
        if iterations == 0 {
            log::info!(
                "using default iteration budget of {}",
                Self::DEFAULT_ITERATIONS
            );
            return Self::default();
        }
        Self { iterations }
    }
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }
}

/// Flips one uniformly random variable per iteration. Uphill moves are
/// always accepted and snapshotted; downhill or sideways moves are accepted
/// with probability `exp(delta / T)` without touching the best snapshot;
/// everything else is undone by flipping the same variable back.
///
/// The temperature is constant for the whole run; there is no cooling
/// schedule. Both fitness trackers start at zero even though the all-false
/// starting assignment may already satisfy clauses.
#[derive(Debug)]
pub struct LocalSearch {
    config: LocalSearchConfig,
    rng: fastrand::Rng,
}

impl LocalSearch {
    /// Fixed acceptance temperature.
    pub const TEMPERATURE: f64 = 0.5;

    #[must_use]
    pub fn new(config: LocalSearchConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
        }
    }

    /// Same as [`Self::new`] with a deterministic random source.
    #[must_use]
    pub fn with_seed(config: LocalSearchConfig, seed: u64) -> Self {
        Self {
            config,
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Search for LocalSearch {
    fn name(&self) -> &'static str {
        "stochastic local search"
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn run(&mut self, formula: &mut Formula) -> Result<SearchOutcome> {
        let variable_count = formula.variable_count();
        if variable_count == 0 {
            return Err(Error::NoVariables);
        }

        formula.reset_all_false();
        let goal = formula.clause_count() as i64;
        let mut best = formula.snapshot();
        let mut best_fitness: i64 = 0;
        let mut current_fitness: i64 = 0;

        log::info!("performing up to {} iterations", self.config.iterations);
        for iteration in 1..=self.config.iterations {
            let index = self.rng.usize(0..variable_count);
            formula.flip(index);
            let delta = formula.satisfied_clause_count() as i64 - current_fitness;

            if delta > 0 {
                best_fitness += delta;
                current_fitness += delta;
                best = formula.snapshot();
                if best_fitness == goal {
                    log::info!("found a satisfying assignment after {iteration} iteration(s)");
                    return Ok(SearchOutcome::success(
                        iteration,
                        best_fitness as usize,
                        best,
                    ));
                }
            } else if self.rng.f64() < (delta as f64 / Self::TEMPERATURE).exp() {
                // walk sideways or downhill without promoting the result
                current_fitness += delta;
            } else {
                formula.flip(index);
            }
        }

        log::info!("budget exhausted with best fitness {best_fitness}/{goal}");
        Ok(SearchOutcome::exhausted(
            self.config.iterations,
            best_fitness as usize,
            best,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Defaults;
    use crate::grammar;

    fn build(source: &str) -> Formula {
        grammar::parse(source).unwrap().try_into().unwrap()
    }

    #[test]
    fn config_falls_back_to_default_on_sentinel() {
        let config = LocalSearchConfig::from_source(&mut Defaults);
        assert_eq!(config.iterations, LocalSearchConfig::DEFAULT_ITERATIONS);
    }

    #[test]
    fn solves_a_one_variable_formula() {
        let mut formula = build("x1|x1|x1");
        let config = LocalSearchConfig { iterations: 1_000 };
        let outcome = LocalSearch::with_seed(config, 7).run(&mut formula).unwrap();
        assert!(outcome.satisfied);
        assert_eq!(outcome.best.values(), &[(1, true)]);
        assert_eq!(outcome.best_fitness, 1);
    }

    #[test]
    fn solves_the_complementary_pair() {
        // first uphill flip satisfies both clauses, so any seed succeeds
        let mut formula = build("x1|x2|x3\n!x1|!x2|!x3");
        let config = LocalSearchConfig { iterations: 1_000 };
        let outcome = LocalSearch::with_seed(config, 1).run(&mut formula).unwrap();
        assert!(outcome.satisfied);
        assert_eq!(outcome.best_fitness, 2);
    }

    #[test]
    fn contradiction_exhausts_the_budget_with_a_stable_best() {
        // every assignment satisfies exactly one of the two clauses, so the
        // first flip fixes best fitness at 1 and no later move can raise it
        let mut formula = build("x1|x1|x1\n!x1|!x1|!x1");
        let config = LocalSearchConfig { iterations: 500 };
        let outcome = LocalSearch::with_seed(config, 3).run(&mut formula).unwrap();
        assert!(!outcome.satisfied);
        assert_eq!(outcome.iterations, 500);
        assert_eq!(outcome.best_fitness, 1);
    }

    #[test]
    fn live_assignment_matches_the_snapshot_on_success() {
        let mut formula = build("x1|x2|x3\n!x1|!x2|!x3");
        let config = LocalSearchConfig { iterations: 1_000 };
        let outcome = LocalSearch::with_seed(config, 11).run(&mut formula).unwrap();
        assert!(outcome.satisfied);
        let live: Vec<(u32, bool)> = formula
            .variables()
            .iter()
            .map(|v| (v.id(), v.value()))
            .collect();
        assert_eq!(live, outcome.best.values());
    }
}
