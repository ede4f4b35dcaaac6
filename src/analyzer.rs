//! This module provides functions for analyzing source transition tables to detect
//! inconsistencies before synthesis: transitions out of a terminal state, reserved
//! symbols, ambiguous read cases, and tables with no concrete states.

use crate::table::Table;
use crate::types::{is_halt, ConversionError, SourceRow, ZERO_DIGIT};
use std::collections::HashMap;

/// Represents the errors that can be found during the analysis of a source table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A row originates at a halt-marked state. The terminal state has no outgoing
    /// transitions by definition.
    TerminalOrigin(String),
    /// A row uses the reserved zero-digit placeholder as a tape symbol.
    ReservedSymbol(char),
    /// Two expanded rows share a `(state, read)` case but disagree on the action.
    AmbiguousRead(String, char),
    /// Every row has a wildcard origin, leaving nothing to expand against.
    NoConcreteStates,
}

impl From<AnalysisError> for ConversionError {
    /// Converts an `AnalysisError` into a `ConversionError::MalformedInput`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::TerminalOrigin(state) => ConversionError::MalformedInput(format!(
                "transitions cannot originate at halt state: {}",
                state
            )),
            AnalysisError::ReservedSymbol(symbol) => ConversionError::MalformedInput(format!(
                "'{}' is reserved for the reduced tape and cannot be a source symbol",
                symbol
            )),
            AnalysisError::AmbiguousRead(state, symbol) => ConversionError::MalformedInput(
                format!("conflicting rules for state {} reading '{}'", state, symbol),
            ),
            AnalysisError::NoConcreteStates => ConversionError::MalformedInput(
                "every row has a wildcard origin; no concrete states to expand against"
                    .to_string(),
            ),
        }
    }
}

/// Analyzes a source [`Table`] for defects that would break synthesis.
///
/// # Arguments
///
/// * `table` - A reference to the `Table` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(ConversionError::MalformedInput)` for the first violated rule.
pub fn analyze(table: &Table) -> Result<(), ConversionError> {
    let errors = [
        check_concrete_states,
        check_terminal_origins,
        check_reserved_symbols,
        check_ambiguous_reads,
    ]
    .iter()
    .filter_map(|f| f(table).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.first() {
        return Err(first_error.clone().into());
    }

    Ok(())
}

/// Checks that at least one row names a concrete originating state.
fn check_concrete_states(table: &Table) -> Result<(), AnalysisError> {
    if table.states().is_empty() {
        return Err(AnalysisError::NoConcreteStates);
    }

    Ok(())
}

/// Checks that no row originates at a halt-marked state.
fn check_terminal_origins(table: &Table) -> Result<(), AnalysisError> {
    table
        .rows()
        .iter()
        .find(|row| is_halt(&row.state))
        .map_or(Ok(()), |row| {
            Err(AnalysisError::TerminalOrigin(row.state.clone()))
        })
}

/// Checks that the reserved zero digit is not used as a read or write symbol.
fn check_reserved_symbols(table: &Table) -> Result<(), AnalysisError> {
    table
        .rows()
        .iter()
        .find(|row| row.read == ZERO_DIGIT || row.write == ZERO_DIGIT)
        .map_or(Ok(()), |_| Err(AnalysisError::ReservedSymbol(ZERO_DIGIT)))
}

/// Checks that no two expanded rows define different actions for one read case.
///
/// Rule collection uses set semantics, so conflicting derivations would both end
/// up in the reduced machine with no precedence to pick between them.
fn check_ambiguous_reads(table: &Table) -> Result<(), AnalysisError> {
    let mut seen: HashMap<(String, char), SourceRow> = HashMap::new();

    for row in table.rows() {
        let origins: Vec<String> = if row.has_wildcard_state() {
            table.states().to_vec()
        } else {
            vec![row.state.clone()]
        };

        for origin in origins {
            let next = if row.has_wildcard_next() {
                origin.clone()
            } else {
                row.next.clone()
            };
            let expanded = SourceRow {
                state: origin.clone(),
                next,
                ..row.clone()
            };

            match seen.get(&(origin.clone(), row.read)) {
                Some(prior) if *prior != expanded => {
                    return Err(AnalysisError::AmbiguousRead(origin, row.read));
                }
                _ => {
                    seen.insert((origin, row.read), expanded);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn row(state: &str, read: char, write: char, direction: Direction, next: &str) -> SourceRow {
        SourceRow {
            state: state.to_string(),
            read,
            write,
            direction,
            next: next.to_string(),
        }
    }

    #[test]
    fn test_valid_table() {
        let table = Table::new(vec![
            row("A", '_', '1', Direction::Right, "A"),
            row("A", '1', '1', Direction::Left, "halt"),
        ]);
        assert!(analyze(&table).is_ok());
    }

    #[test]
    fn test_terminal_origin() {
        let table = Table::new(vec![
            row("A", '_', '1', Direction::Right, "A"),
            row("halt", '1', '1', Direction::Left, "A"),
        ]);

        let result = analyze(&table);
        assert!(matches!(
            result,
            Err(ConversionError::MalformedInput(msg)) if msg.contains("halt state")
        ));
    }

    #[test]
    fn test_reserved_symbol() {
        let table = Table::new(vec![row("A", '0', '1', Direction::Right, "halt")]);

        let result = analyze(&table);
        assert!(matches!(
            result,
            Err(ConversionError::MalformedInput(msg)) if msg.contains("reserved")
        ));
    }

    #[test]
    fn test_ambiguous_read() {
        let table = Table::new(vec![
            row("A", '1', '1', Direction::Right, "A"),
            row("A", '1', '_', Direction::Right, "A"),
        ]);

        let result = check_ambiguous_reads(&table);
        assert_eq!(
            result,
            Err(AnalysisError::AmbiguousRead("A".to_string(), '1'))
        );
    }

    #[test]
    fn test_wildcard_overlap_is_ambiguous() {
        // The wildcard row expands to (A, _) with a different action than the
        // concrete row; there is no precedence to pick a winner.
        let table = Table::new(vec![
            row("*", '_', '_', Direction::Right, "*"),
            row("A", '_', '1', Direction::Left, "halt"),
        ]);

        let result = analyze(&table);
        assert!(matches!(
            result,
            Err(ConversionError::MalformedInput(msg)) if msg.contains("conflicting")
        ));
    }

    #[test]
    fn test_wildcard_overlap_identical_action_allowed() {
        // The wildcard expansion of (A, _) coincides with the concrete row exactly,
        // so both derive the same rule and the set collapses them.
        let table = Table::new(vec![
            row("*", '_', '_', Direction::Right, "*"),
            row("A", '_', '_', Direction::Right, "A"),
            row("A", '1', '1', Direction::Left, "halt"),
        ]);
        assert!(analyze(&table).is_ok());
    }

    #[test]
    fn test_all_wildcard_origins() {
        let table = Table::new(vec![row("*", '_', '1', Direction::Right, "halt")]);

        let result = analyze(&table);
        assert!(matches!(
            result,
            Err(ConversionError::MalformedInput(msg)) if msg.contains("wildcard origin")
        ));
    }
}
