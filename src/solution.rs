#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Best-solution snapshots and the solution writer.

use crate::formula::Variable;
use crate::grammar::VariableId;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// An independent copy of one (id, value) pair per variable, in canonical
/// order. Taken whenever a search observes a strictly better fitness and
/// unaffected by later mutation of the live variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    values: Vec<(VariableId, bool)>,
}

impl Solution {
    /// Deep-copies the given variables into a snapshot.
    #[must_use]
    pub fn from_variables(variables: &[Variable]) -> Self {
        Self {
            values: variables
                .iter()
                .map(|variable| (variable.id(), variable.value()))
                .collect(),
        }
    }

    /// The recorded (id, value) pairs in canonical order.
    #[must_use]
    pub fn values(&self) -> &[(VariableId, bool)] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes the persisted format: one `x<id>=<true|false>` line per
    /// variable.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    pub fn write_to(&self, target: &mut impl Write) -> io::Result<()> {
        for &(id, value) in &self.values {
            writeln!(target, "x{id}={value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(id, value) in &self.values {
            writeln!(f, "x{id}={value}")?;
        }
        Ok(())
    }
}

/// Writes a snapshot to `path`, logging and swallowing any I/O failure so a
/// computed result is never masked by a writer error.
pub fn save_solution(solution: &Solution, path: impl AsRef<Path>) {
    let path = path.as_ref();
    log::info!("writing best solution to {}", path.display());
    let result = File::create(path).and_then(|mut file| solution.write_to(&mut file));
    if let Err(err) = result {
        log::warn!("failed to write solution to {}: {err}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::grammar;

    #[test]
    fn snapshot_is_decoupled_from_the_formula() {
        let mut formula: Formula = grammar::parse("x1|x2|x3").unwrap().try_into().unwrap();
        formula.set(0, true);
        let snapshot = formula.snapshot();
        formula.reset_all_false();
        assert_eq!(snapshot.values(), &[(1, true), (2, false), (3, false)]);
    }

    #[test]
    fn persisted_format_is_one_assignment_per_line() {
        let solution = Solution {
            values: vec![(1, true), (42, false)],
        };
        let mut buffer = Vec::new();
        solution.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "x1=true\nx42=false\n");
        assert_eq!(solution.to_string(), "x1=true\nx42=false\n");
    }
}
