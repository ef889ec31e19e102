#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Exhaustive enumeration of every assignment in binary-counter order.

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::solver::{Search, SearchOutcome};

/// Enumerates all `2^n` assignments of the formula's variables, treating
/// the canonical variable sequence as the bits of an unsigned counter with
/// the first variable as the least significant bit.
///
/// Supports 1 to 62 variables; the iteration counter is 64-bit. Above 20
/// variables the run proceeds but a performance warning is logged.
#[derive(Debug, Default)]
pub struct Exhaustive;

impl Exhaustive {
    /// Hard bound on the variable count, imposed by the 64-bit counter.
    pub const MAX_VARIABLES: usize = 62;
    /// Variable count above which a full sweep takes prohibitively long.
    pub const WARN_VARIABLES: usize = 20;

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Standard binary increment over the arena: flip the lowest-order run
    /// of true bits to false, then the next bit to true. Wraps to all-false
    /// after the final assignment.
    fn increment(formula: &mut Formula) {
        let count = formula.variable_count();
        let mut index = 0;
        while index < count && formula.variables()[index].value() {
            formula.set(index, false);
            index += 1;
        }
        if index < count {
            formula.set(index, true);
        }
    }
}

impl Search for Exhaustive {
    fn name(&self) -> &'static str {
        "exhaustive search"
    }

    fn run(&mut self, formula: &mut Formula) -> Result<SearchOutcome> {
        let count = formula.variable_count();
        if count == 0 {
            return Err(Error::NoVariables);
        }
        if count > Self::MAX_VARIABLES {
            return Err(Error::TooManyVariables {
                count,
                limit: Self::MAX_VARIABLES,
            });
        }
        if count > Self::WARN_VARIABLES {
            log::warn!("sweeping {count} variables will take extremely long");
        }

        formula.reset_all_false();
        let total = 1u64 << count;
        let goal = formula.clause_count();
        let mut best = formula.snapshot();
        let mut best_fitness = 0;

        log::info!("performing up to {total} iterations");
        for iteration in 1..=total {
            let fitness = formula.satisfied_clause_count();
            if fitness > best_fitness {
                best_fitness = fitness;
                best = formula.snapshot();
            }
            if fitness == goal {
                log::info!("found a satisfying assignment after {iteration} iteration(s)");
                return Ok(SearchOutcome::success(iteration, best_fitness, best));
            }
            Self::increment(formula);
        }

        log::info!("no satisfying assignment exists; best fitness {best_fitness}/{goal}");
        Ok(SearchOutcome::exhausted(total, best_fitness, best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Variable;
    use crate::grammar;
    use bit_vec::BitVec;

    fn build(source: &str) -> Formula {
        grammar::parse(source).unwrap().try_into().unwrap()
    }

    #[test]
    fn single_variable_clause_is_solved_within_two_iterations() {
        let mut formula = build("x1|x1|x1");
        let outcome = Exhaustive::new().run(&mut formula).unwrap();
        assert!(outcome.satisfied);
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.best.values(), &[(1, true)]);
    }

    #[test]
    fn contradiction_sweeps_the_whole_counter_space() {
        let mut formula = build("x1|x1|x1\n!x1|!x1|!x1");
        let outcome = Exhaustive::new().run(&mut formula).unwrap();
        assert!(!outcome.satisfied);
        assert_eq!(outcome.iterations, 2); // 2^1 assignments, none satisfy both
        assert_eq!(outcome.best_fitness, 1);
    }

    #[test]
    fn counter_visits_every_assignment_once() {
        let mut formula = build("x1|x2|x3\nx1|x2|x3"); // satisfiable, but we only drive the counter
        let mut seen = Vec::new();
        for _ in 0..8 {
            let bits: Vec<bool> = formula.variables().iter().map(Variable::value).collect();
            assert!(!seen.contains(&bits));
            seen.push(bits);
            Exhaustive::increment(&mut formula);
        }
        // wrapped around to all-false
        assert!(formula.variables().iter().all(|v| !v.value()));
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn reported_best_matches_a_direct_enumeration() {
        let source = "x1|x2|x3\n!x1|!x2|!x3\n!x1|x2|x2\nx1|!x3|!x3";
        let mut formula = build(source);
        let outcome = Exhaustive::new().run(&mut formula).unwrap();

        let mut check = build(source);
        let count = check.variable_count();
        let mut true_max = 0;
        for pattern in 0u32..(1 << count) {
            let mut bits = BitVec::from_elem(count, false);
            for bit in 0..count {
                bits.set(bit, pattern & (1 << bit) != 0);
            }
            check.load_bits(&bits);
            true_max = true_max.max(check.satisfied_clause_count());
        }
        assert_eq!(outcome.best_fitness, true_max);
        assert_eq!(outcome.satisfied, true_max == check.clause_count());
    }

    #[test]
    fn rejects_more_than_sixty_two_variables() {
        let identifiers = (1..=63).flat_map(|id| [id, id, id]).collect::<Vec<_>>();
        let negations = vec![false; identifiers.len()];
        let mut wide = Formula::new(negations, identifiers).unwrap();
        assert!(matches!(
            Exhaustive::new().run(&mut wide),
            Err(Error::TooManyVariables { count: 63, .. })
        ));
    }
}
