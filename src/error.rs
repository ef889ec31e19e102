//! Error taxonomy for parsing, formula construction and search preconditions.
//!
//! Every failure in this crate is detected once, reported through this enum
//! and terminates the run it belongs to; there are no retries. Positions in
//! lexical errors refer to the raw (trimmed) source text, positions in syntax
//! errors refer to the normalized character stream the validator consumes.

use thiserror::Error;

/// All failure modes of the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The formula source could not be opened or read.
    #[error("cannot read formula source: {0}")]
    Source(#[from] std::io::Error),

    /// A character outside the legal input set appeared in the source.
    #[error("invalid character {found:?} at byte {position}")]
    Lexical { position: usize, found: char },

    /// A production rule met a character other than the one it expected.
    #[error("unexpected character {found:?} at position {position}, expected {expected:?}")]
    Syntax {
        position: usize,
        found: char,
        expected: char,
    },

    /// A variable name was not followed by at least one digit.
    #[error("expected a digit at position {position}, found {found:?}")]
    ExpectedDigit { position: usize, found: char },

    /// The normalized stream ended in the middle of a production.
    #[error("formula ends unexpectedly at position {position}")]
    UnexpectedEnd { position: usize },

    /// A variable identifier overflowed the 32-bit id space.
    #[error("variable identifier at position {position} does not fit in 32 bits")]
    IdentifierTooLarge { position: usize },

    /// The source held no clauses at all.
    #[error("formula contains no clauses")]
    EmptyFormula,

    /// The negation and identifier streams disagree in length.
    #[error("negation and identifier streams differ in length ({negations} vs {identifiers})")]
    StreamLengthMismatch { negations: usize, identifiers: usize },

    /// The token stream length is not divisible into clauses of three.
    #[error("token stream length {0} is not a multiple of three")]
    UnalignedStream(usize),

    /// The token streams were present but empty.
    #[error("token streams are empty")]
    EmptyStream,

    /// A search was started on a formula without variables.
    #[error("search requires at least one variable")]
    NoVariables,

    /// The formula has more variables than the algorithm's counter supports.
    #[error("{count} variables exceed the {limit}-variable limit of exhaustive search")]
    TooManyVariables { count: usize, limit: usize },
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
