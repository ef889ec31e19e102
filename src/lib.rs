//! Satisfiability of exactly-3-SAT formulas via three independent search
//! strategies.
//!
//! A formula is read from a constrained line-based grammar (one three-literal
//! clause per line), validated into a token stream and built into a shared
//! [`Formula`] whose clauses index a single canonical variable arena. Three
//! strategies then mutate the shared assignment in place and track the
//! best-seen solution: exhaustive binary-counter enumeration, stochastic
//! local search with fixed-temperature acceptance of worsening moves, and a
//! genetic algorithm over bit-vector chromosomes.

/// Parameter prompting for the interactive search configurations.
pub mod console;

/// Crate-wide error taxonomy.
pub mod error;

/// Exhaustive enumeration of every assignment.
pub mod exhaustive;

/// The shared formula model: clauses over a canonical variable arena.
pub mod formula;

/// Genetic search over a population of bit-vector chromosomes.
pub mod genetic;

/// The validating parser for the exactly-3-SAT surface grammar.
pub mod grammar;

/// Stochastic local search with bounded acceptance of worsening moves.
pub mod local_search;

/// Best-solution snapshots and the solution writer.
pub mod solution;

/// The `Search` seam every strategy implements.
pub mod solver;

pub use error::{Error, Result};
pub use formula::Formula;
pub use grammar::TokenStream;
pub use solution::Solution;
pub use solver::{Search, SearchOutcome};
