#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The shared formula model: clauses of exactly three literals over a
//! canonical arena of variables.
//!
//! Clauses do not hold references to variables; they store indices into the
//! formula's variable arena, so any number of clauses can observe a single
//! variable and every search mutates one place. The satisfied-clause count
//! over the live assignment is the fitness function used by all searches.

use crate::error::{Error, Result};
use crate::grammar::{TokenStream, VariableId};
use crate::solution::Solution;
use bit_vec::BitVec;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt;

/// A propositional variable: an immutable identifier and a mutable truth
/// value. Created once per distinct id, in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    id: VariableId,
    value: bool,
}

impl Variable {
    const fn new(id: VariableId) -> Self {
        Self { id, value: false }
    }

    /// The identifier as written in the source (`x42` has id 42).
    #[must_use]
    pub const fn id(&self) -> VariableId {
        self.id
    }

    /// The current truth value.
    #[must_use]
    pub const fn value(&self) -> bool {
        self.value
    }
}

/// One literal of a clause: a negation flag and an index into the variable
/// arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseLit {
    pub negated: bool,
    pub var: usize,
}

impl ClauseLit {
    /// A literal is true when its negation flag XOR the variable's value is
    /// true: `!x` holds exactly when `x` is false.
    #[must_use]
    pub fn evaluate(&self, variables: &[Variable]) -> bool {
        self.negated ^ variables[self.var].value
    }
}

/// A disjunction of exactly three literals, immutable after construction
/// except through the variables it indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    literals: [ClauseLit; 3],
}

impl Clause {
    #[must_use]
    pub const fn literals(&self) -> &[ClauseLit; 3] {
        &self.literals
    }

    /// True iff at least one literal evaluates true.
    #[must_use]
    pub fn is_satisfied(&self, variables: &[Variable]) -> bool {
        self.literals.iter().any(|lit| lit.evaluate(variables))
    }
}

/// An ordered conjunction of three-literal clauses plus the canonical
/// variable arena they index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    variables: Vec<Variable>,
    clauses: Vec<Clause>,
}

impl Formula {
    /// Builds a formula from the validator's parallel token streams.
    ///
    /// One clause is built per run of three (negation, id) pairs, in source
    /// order. Variables are interned by first-seen id and initialized to
    /// false; ids are unique within the arena by construction. (Absent
    /// inputs are unrepresentable here; the remaining constructor contract
    /// is checked explicitly.)
    ///
    /// # Errors
    ///
    /// [`Error::StreamLengthMismatch`] when the sequences disagree in
    /// length, [`Error::UnalignedStream`] when their common length is not a
    /// multiple of three and [`Error::EmptyStream`] when it is zero.
    pub fn new(negations: Vec<bool>, identifiers: Vec<VariableId>) -> Result<Self> {
        if negations.len() != identifiers.len() {
            return Err(Error::StreamLengthMismatch {
                negations: negations.len(),
                identifiers: identifiers.len(),
            });
        }
        if identifiers.len() % 3 != 0 {
            return Err(Error::UnalignedStream(identifiers.len()));
        }
        if identifiers.is_empty() {
            return Err(Error::EmptyStream);
        }

        let mut variables: Vec<Variable> = Vec::new();
        let mut index_of: FxHashMap<VariableId, usize> = FxHashMap::default();
        let mut resolve = |id: VariableId| {
            *index_of.entry(id).or_insert_with(|| {
                variables.push(Variable::new(id));
                variables.len() - 1
            })
        };

        let clauses = negations
            .iter()
            .zip(&identifiers)
            .map(|(&negated, &id)| ClauseLit {
                negated,
                var: resolve(id),
            })
            .tuples()
            .map(|(a, b, c)| Clause {
                literals: [a, b, c],
            })
            .collect();

        Ok(Self { variables, clauses })
    }

    /// The fitness function shared by every search: how many clauses the
    /// live assignment currently satisfies. O(number of clauses).
    #[must_use]
    pub fn satisfied_clause_count(&self) -> usize {
        self.clauses
            .iter()
            .filter(|clause| clause.is_satisfied(&self.variables))
            .count()
    }

    /// True iff every clause is satisfied. A formula without clauses counts
    /// as unsatisfiable, not vacuously true.
    #[must_use]
    pub fn is_fully_satisfied(&self) -> bool {
        !self.clauses.is_empty()
            && self
                .clauses
                .iter()
                .all(|clause| clause.is_satisfied(&self.variables))
    }

    /// Sets every variable to false. Visible to anything evaluating this
    /// formula afterwards.
    pub fn reset_all_false(&mut self) {
        for variable in &mut self.variables {
            variable.value = false;
        }
    }

    /// The canonical variable sequence, in first-seen order. The identities
    /// are stable across calls; values change only through [`Self::set`],
    /// [`Self::flip`] and [`Self::load_bits`].
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Overwrites the value of the variable at `index`.
    pub fn set(&mut self, index: usize, value: bool) {
        self.variables[index].value = value;
    }

    /// Inverts the value of the variable at `index`.
    pub fn flip(&mut self, index: usize) {
        self.variables[index].value = !self.variables[index].value;
    }

    /// Copies one bit per variable into the arena, index-aligned. Used to
    /// evaluate a population member's genes against the formula.
    pub fn load_bits(&mut self, bits: &BitVec) {
        debug_assert_eq!(bits.len(), self.variables.len());
        for (index, variable) in self.variables.iter_mut().enumerate() {
            variable.value = bits.get(index).unwrap_or(false);
        }
    }

    /// Deep-copies the live assignment into an independent snapshot,
    /// decoupled from further mutation of the arena.
    #[must_use]
    pub fn snapshot(&self) -> Solution {
        Solution::from_variables(&self.variables)
    }
}

impl TryFrom<TokenStream> for Formula {
    type Error = Error;

    fn try_from(tokens: TokenStream) -> Result<Self> {
        let (negations, identifiers) = tokens.into_parts();
        Self::new(negations, identifiers)
    }
}

impl fmt::Display for Formula {
    /// Renders the canonical bracketed form, e.g. `(x1|!x2|x3)&(x2|x2|x2)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .clauses
            .iter()
            .map(|clause| {
                let literals = clause
                    .literals
                    .iter()
                    .map(|lit| {
                        format!(
                            "{}x{}",
                            if lit.negated { "!" } else { "" },
                            self.variables[lit.var].id()
                        )
                    })
                    .join("|");
                format!("({literals})")
            })
            .join("&");
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;
    use proptest::prelude::*;

    fn build(source: &str) -> Formula {
        grammar::parse(source).unwrap().try_into().unwrap()
    }

    #[test]
    fn rejects_mismatched_streams() {
        let result = Formula::new(vec![false, false], vec![1, 2, 3]);
        assert!(matches!(
            result,
            Err(Error::StreamLengthMismatch {
                negations: 2,
                identifiers: 3
            })
        ));
    }

    #[test]
    fn rejects_unaligned_streams() {
        let result = Formula::new(vec![false; 4], vec![1, 2, 3, 4]);
        assert!(matches!(result, Err(Error::UnalignedStream(4))));
    }

    #[test]
    fn rejects_empty_streams() {
        assert!(matches!(
            Formula::new(vec![], vec![]),
            Err(Error::EmptyStream)
        ));
    }

    #[test]
    fn interns_variables_in_first_seen_order() {
        let formula = build("x7|x2|x7\nx2|x9|x7");
        let ids: Vec<_> = formula.variables().iter().map(Variable::id).collect();
        assert_eq!(ids, vec![7, 2, 9]);
        assert_eq!(formula.variable_count(), 3);
        assert_eq!(formula.clause_count(), 2);
    }

    #[test]
    fn repeated_id_resolves_to_one_variable() {
        let mut formula = build("x1|x2|x3\nx1|!x2|x3");
        formula.reset_all_false();
        let before = formula.satisfied_clause_count();
        formula.flip(0); // x1 appears in both clauses
        let after = formula.satisfied_clause_count();
        assert_eq!(before, 1); // only (x1|!x2|x3) holds all-false
        assert_eq!(after, 2); // x1=true satisfies both
    }

    #[test]
    fn literal_truth_is_negation_xor_value() {
        let mut formula = build("x1|x1|x1");
        let lit = ClauseLit {
            negated: true,
            var: 0,
        };
        assert!(lit.evaluate(formula.variables()));
        formula.set(0, true);
        assert!(!lit.evaluate(formula.variables()));
    }

    #[test]
    fn fully_satisfied_matches_goal_fitness() {
        let mut formula = build("x1|x2|x3\n!x1|!x2|!x3");
        formula.reset_all_false();
        assert!(!formula.is_fully_satisfied());
        formula.set(0, true);
        assert_eq!(formula.satisfied_clause_count(), 2);
        assert!(formula.is_fully_satisfied());
    }

    #[test]
    fn empty_formula_is_not_vacuously_satisfied() {
        let formula = Formula {
            variables: vec![],
            clauses: vec![],
        };
        assert!(!formula.is_fully_satisfied());
        assert_eq!(formula.satisfied_clause_count(), 0);
    }

    #[test]
    fn load_bits_overwrites_the_arena() {
        let mut formula = build("x1|x2|x3");
        let mut bits = BitVec::from_elem(3, false);
        bits.set(1, true);
        formula.load_bits(&bits);
        let values: Vec<_> = formula.variables().iter().map(Variable::value).collect();
        assert_eq!(values, vec![false, true, false]);
    }

    #[test]
    fn display_renders_canonical_form() {
        let formula = build("x1|!x2|x3\nx2|x2|x2");
        assert_eq!(formula.to_string(), "(x1|!x2|x3)&(x2|x2|x2)");
    }

    proptest! {
        /// Fitness is bounded by the clause count and reaches it exactly
        /// when the formula is fully satisfied.
        #[test]
        fn fitness_stays_in_bounds(assignment in prop::collection::vec(any::<bool>(), 4)) {
            let mut formula = build("x1|x2|x3\n!x1|x2|!x4\nx4|!x3|x1");
            for (index, &value) in assignment.iter().take(formula.variable_count()).enumerate() {
                formula.set(index, value);
            }
            let fitness = formula.satisfied_clause_count();
            prop_assert!(fitness <= formula.clause_count());
            prop_assert_eq!(
                fitness == formula.clause_count(),
                formula.is_fully_satisfied()
            );
        }
    }
}
