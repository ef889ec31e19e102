#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The seam every search strategy implements.

use crate::error::Result;
use crate::formula::Formula;
use crate::solution::Solution;

/// A search strategy over a shared formula.
///
/// A search mutates the formula's variable values in place and queries its
/// fitness function; it validates its own preconditions before allocating
/// any search state. Exactly one search runs against a formula at a time.
pub trait Search {
    /// Human-readable strategy name, used in reports and log lines.
    fn name(&self) -> &'static str;

    /// Runs the search to success or budget exhaustion.
    ///
    /// # Errors
    ///
    /// A precondition violation (e.g. no variables, or more variables than
    /// the strategy supports) aborts before any iteration.
    fn run(&mut self, formula: &mut Formula) -> Result<SearchOutcome>;
}

/// What a finished search reports: whether the goal fitness was reached, the
/// 1-based count of iterations performed, the best fitness tracked by the
/// strategy and the matching snapshot.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub satisfied: bool,
    pub iterations: u64,
    pub best_fitness: usize,
    pub best: Solution,
}

impl SearchOutcome {
    /// Outcome of a run that reached the goal fitness.
    #[must_use]
    pub fn success(iterations: u64, best_fitness: usize, best: Solution) -> Self {
        Self {
            satisfied: true,
            iterations,
            best_fitness,
            best,
        }
    }

    /// Outcome of a run that exhausted its budget.
    #[must_use]
    pub fn exhausted(iterations: u64, best_fitness: usize, best: Solution) -> Self {
        Self {
            satisfied: false,
            iterations,
            best_fitness,
            best,
        }
    }
}
