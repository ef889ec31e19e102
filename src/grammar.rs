#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A validating parser for the exactly-3-SAT surface grammar.
//!
//! The accepted source format is line based: each line holds one clause of
//! exactly three `|`-separated literals, a literal being `x` followed by one
//! or more digits, optionally prefixed by `!`. Spaces, tabs and carriage
//! returns are ignored. The text is normalized into the canonical bracketed
//! stream
//!
//! ```text
//! formula  ::= clause ('&' clause)*
//! clause   ::= '(' literal '|' literal '|' literal ')'
//! literal  ::= ['!'] 'x' digit+
//! ```
//!
//! by mapping every newline to `)&(` and wrapping the whole stream in a
//! single pair of parentheses. A recursive-descent consumer then walks the
//! normalized stream left to right and either produces a [`TokenStream`] or
//! fails with the position and character that violated a production.

use crate::error::{Error, Result};
use itertools::Itertools;
use std::path::Path;

/// Identifier of a variable as written in the source (`x42` has id 42).
pub type VariableId = u32;

/// Validated parser output: two parallel, clause-ordered sequences of equal
/// length (a multiple of three), grouped implicitly in runs of three per
/// clause.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStream {
    negations: Vec<bool>,
    identifiers: Vec<VariableId>,
}

impl TokenStream {
    /// Negation flags, one per literal in source order.
    #[must_use]
    pub fn negations(&self) -> &[bool] {
        &self.negations
    }

    /// Variable identifiers, one per literal in source order.
    #[must_use]
    pub fn identifiers(&self) -> &[VariableId] {
        &self.identifiers
    }

    /// Number of literals in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Number of clauses encoded by the stream.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.identifiers.len() / 3
    }

    /// Consumes the stream, yielding the raw parallel sequences.
    #[must_use]
    pub fn into_parts(self) -> (Vec<bool>, Vec<VariableId>) {
        (self.negations, self.identifiers)
    }

    /// Pretty-prints the stream back to the accepted surface syntax, one
    /// clause per line. Re-parsing the result yields an equal stream.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.negations
            .chunks(3)
            .zip(self.identifiers.chunks(3))
            .map(|(negations, ids)| {
                negations
                    .iter()
                    .zip(ids)
                    .map(|(&negated, &id)| {
                        format!("{}x{id}", if negated { "!" } else { "" })
                    })
                    .join("|")
            })
            .join("\n")
    }
}

/// Reads and validates a formula source file.
///
/// # Errors
///
/// [`Error::Source`] when the file cannot be opened or read, otherwise any
/// error [`parse`] produces.
pub fn load(path: impl AsRef<Path>) -> Result<TokenStream> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

/// Validates raw formula text against the grammar.
///
/// Leading and trailing whitespace (including a final newline) is trimmed
/// before normalization; interior blank lines are syntax errors.
///
/// # Errors
///
/// [`Error::EmptyFormula`] for blank input, [`Error::Lexical`] for a
/// character outside the legal set, and a syntax-error variant when a
/// production rule is violated.
pub fn parse(raw: &str) -> Result<TokenStream> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return Err(Error::EmptyFormula);
    }
    let expr = normalize(trimmed)?;
    log::debug!("normalized formula: {expr}");
    Validator::new(&expr).run()
}

/// Maps the raw character stream to the canonical bracketed form: whitespace
/// is dropped, every newline becomes `)&(` and the whole stream is wrapped
/// in one pair of parentheses.
fn normalize(raw: &str) -> Result<String> {
    let mut expr = String::with_capacity(raw.len() + 2);
    expr.push('(');
    for (position, c) in raw.char_indices() {
        match c {
            '!' | '|' | 'x' => expr.push(c),
            c if c.is_ascii_digit() => expr.push(c),
            ' ' | '\t' | '\r' => {}
            '\n' => expr.push_str(")&("),
            found => return Err(Error::Lexical { position, found }),
        }
    }
    expr.push(')');
    Ok(expr)
}

/// Recursive-descent consumer over the normalized stream.
///
/// Each production either advances the cursor past an expected symbol or
/// fails; the first failure is propagated without further consumption. The
/// stream is ASCII by construction, so the cursor is a byte index.
struct Validator<'a> {
    expr: &'a [u8],
    position: usize,
    negations: Vec<bool>,
    identifiers: Vec<VariableId>,
}

impl<'a> Validator<'a> {
    fn new(expr: &'a str) -> Self {
        Self {
            expr: expr.as_bytes(),
            position: 0,
            negations: Vec::new(),
            identifiers: Vec::new(),
        }
    }

    /// `formula ::= clause ('&' clause)*`
    fn run(mut self) -> Result<TokenStream> {
        while self.position < self.expr.len() {
            self.clause()?;
            if self.position != self.expr.len() {
                self.expect('&')?;
            }
        }
        if self.identifiers.is_empty() {
            return Err(Error::EmptyFormula);
        }
        Ok(TokenStream {
            negations: self.negations,
            identifiers: self.identifiers,
        })
    }

    /// `clause ::= '(' literal '|' literal '|' literal ')'`
    fn clause(&mut self) -> Result<()> {
        self.expect('(')?;
        self.not();
        self.literal()?;
        self.expect('|')?;
        self.not();
        self.literal()?;
        self.expect('|')?;
        self.not();
        self.literal()?;
        self.expect(')')
    }

    /// Consumes `expected` or fails with the offending character.
    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(found) if found == expected => {
                self.position += 1;
                Ok(())
            }
            Some(found) => Err(Error::Syntax {
                position: self.position,
                found,
                expected,
            }),
            None => Err(Error::UnexpectedEnd {
                position: self.position,
            }),
        }
    }

    /// Records whether a `!` is present at the cursor, consuming it if so.
    /// Never fails.
    fn not(&mut self) {
        if self.peek() == Some('!') {
            self.position += 1;
            self.negations.push(true);
        } else {
            self.negations.push(false);
        }
    }

    /// `literal ::= 'x' digit+`, recording the parsed variable id.
    fn literal(&mut self) -> Result<()> {
        self.expect('x')?;
        let start = self.position;
        let mut id: VariableId = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            id = id
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(Error::IdentifierTooLarge { position: start })?;
            self.position += 1;
        }
        if self.position == start {
            return match self.peek() {
                Some(found) => Err(Error::ExpectedDigit {
                    position: self.position,
                    found,
                }),
                None => Err(Error::UnexpectedEnd {
                    position: self.position,
                }),
            };
        }
        self.identifiers.push(id);
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.expr.get(self.position).map(|&b| b as char)
    }
}
