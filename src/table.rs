//! This module defines the [`Table`] struct, the canonical in-memory form of a source
//! machine: its transition rows plus the derived state, symbol, and halt catalogs, and
//! the wildcard macro-expansion into concrete read, write, and move cases.

use crate::types::{MoveKey, ReadKey, SourceRow, WriteKey, BLANK_SYMBOL, ZERO_DIGIT};
use std::collections::BTreeSet;

/// A parsed source transition table with its derived catalogs.
///
/// Built once from rows and immutable thereafter. The symbol catalog's order (blank
/// first, then by code point) fixes the enumeration index the encoding dictionary is
/// built from, so it must stay stable across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<SourceRow>,
    states: Vec<String>,
    symbols: Vec<char>,
    halts: Vec<String>,
}

/// Sort key placing the blank symbol ahead of everything else.
fn symbol_order(c: char) -> u32 {
    if c == BLANK_SYMBOL {
        0
    } else {
        c as u32
    }
}

impl Table {
    /// Builds a table from parsed rows, deriving the catalogs.
    ///
    /// The state catalog collects originating states (the wildcard excluded), the
    /// symbol catalog collects read and write symbols (the reserved zero digit
    /// excluded), and the halt catalog collects halt-marked destination tokens.
    pub fn new(rows: Vec<SourceRow>) -> Self {
        let mut states: Vec<String> = rows
            .iter()
            .filter(|row| !row.has_wildcard_state())
            .map(|row| row.state.clone())
            .collect();
        states.sort();
        states.dedup();

        let mut symbols: Vec<char> = rows
            .iter()
            .flat_map(|row| [row.read, row.write])
            .filter(|&c| c != ZERO_DIGIT)
            .collect();
        symbols.sort_by_key(|&c| symbol_order(c));
        symbols.dedup();

        let mut halts: Vec<String> = rows
            .iter()
            .filter(|row| row.is_halt_bound())
            .map(|row| row.next.clone())
            .collect();
        halts.sort();
        halts.dedup();

        Self {
            rows,
            states,
            symbols,
            halts,
        }
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// The concrete originating states, sorted.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// The symbol catalog: blank first, then by code point.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// The halt-marked destination tokens, sorted.
    pub fn halts(&self) -> &[String] {
        &self.halts
    }

    /// Returns `(states, symbols, halts)` catalog sizes.
    pub fn stats(&self) -> (usize, usize, usize) {
        (self.states.len(), self.symbols.len(), self.halts.len())
    }

    /// The destination states a row expands to. A wildcard destination ranges over
    /// the whole state catalog, like a wildcard origin.
    fn destinations<'a>(&'a self, row: &'a SourceRow) -> Vec<&'a str> {
        if row.has_wildcard_next() {
            self.states.iter().map(String::as_str).collect()
        } else {
            vec![row.next.as_str()]
        }
    }

    /// The concrete originating states a row expands to.
    fn origins<'a>(&'a self, row: &'a SourceRow) -> Vec<&'a str> {
        if row.has_wildcard_state() {
            self.states.iter().map(String::as_str).collect()
        } else {
            vec![row.state.as_str()]
        }
    }

    /// Expands every row into concrete `(state, symbol)` read cases.
    pub fn expand_reads(&self) -> BTreeSet<ReadKey> {
        self.rows
            .iter()
            .flat_map(|row| {
                self.origins(row).into_iter().map(|state| ReadKey {
                    state: state.to_string(),
                    symbol: row.read,
                })
            })
            .collect()
    }

    /// Expands every row into concrete `(symbol, direction, next)` write cases.
    pub fn expand_writes(&self) -> BTreeSet<WriteKey> {
        self.rows
            .iter()
            .flat_map(|row| {
                self.destinations(row).into_iter().map(|next| WriteKey {
                    symbol: row.write,
                    direction: row.direction,
                    next: next.to_string(),
                })
            })
            .collect()
    }

    /// Expands every row into concrete `(direction, next)` move cases.
    pub fn expand_moves(&self) -> BTreeSet<MoveKey> {
        self.rows
            .iter()
            .flat_map(|row| {
                self.destinations(row).into_iter().map(|next| MoveKey {
                    direction: row.direction,
                    next: next.to_string(),
                })
            })
            .collect()
    }

    /// Returns the `(reads, writes, moves)` expanded-case counts, the "actual" side
    /// of the diagnostic report.
    pub fn class_counts(&self) -> (usize, usize, usize) {
        (
            self.expand_reads().len(),
            self.expand_writes().len(),
            self.expand_moves().len(),
        )
    }

    /// Whether any expanded destination of the table is halt-marked.
    pub fn has_halt(&self) -> bool {
        !self.halts.is_empty()
    }

    /// Destination tokens that are neither halt-marked nor in the state catalog.
    /// Such states have no outgoing rules; the graph exporter still draws them.
    pub fn orphan_destinations(&self) -> Vec<&str> {
        let mut orphans: Vec<&str> = self
            .rows
            .iter()
            .filter(|row| !row.has_wildcard_next() && !row.is_halt_bound())
            .map(|row| row.next.as_str())
            .filter(|next| !self.states.iter().any(|s| s == next))
            .collect();
        orphans.sort_unstable();
        orphans.dedup();
        orphans
    }
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

    fn sample_table() -> Table {
        Table::new(vec![
            row("B", '1', '2', Direction::Right, "A"),
            row("A", '_', '1', Direction::Right, "B"),
            row("A", '1', '1', Direction::Left, "halt"),
        ])
    }

    #[test]
    fn test_catalogs() {
        let table = sample_table();
        assert_eq!(table.states(), ["A", "B"]);
        assert_eq!(table.symbols(), ['_', '1', '2']);
        assert_eq!(table.halts(), ["halt"]);
        assert_eq!(table.stats(), (2, 3, 1));
    }

    #[test]
    fn test_blank_sorts_first() {
        // '1' < '_' by code point; the blank still leads the catalog
        let table = Table::new(vec![row("A", '1', '_', Direction::Right, "A")]);
        assert_eq!(table.symbols(), ['_', '1']);
    }

    #[test]
    fn test_zero_digit_excluded_from_catalog() {
        let table = Table::new(vec![row("A", '0', '1', Direction::Right, "A")]);
        assert_eq!(table.symbols(), ['1']);
    }

    #[test]
    fn test_wildcard_state_excluded_from_catalog() {
        let table = Table::new(vec![
            row("*", '_', '1', Direction::Right, "A"),
            row("A", '1', '1', Direction::Left, "halt"),
        ]);
        assert_eq!(table.states(), ["A"]);
    }

    #[test]
    fn test_expand_reads_wildcard_origin() {
        let table = Table::new(vec![
            row("A", '1', '1', Direction::Left, "B"),
            row("B", '1', '1', Direction::Left, "A"),
            row("*", '_', '_', Direction::Right, "halt"),
        ]);

        let reads = table.expand_reads();
        // One derivation per catalog state, sharing the row's read symbol
        assert!(reads.contains(&ReadKey {
            state: "A".into(),
            symbol: '_',
        }));
        assert!(reads.contains(&ReadKey {
            state: "B".into(),
            symbol: '_',
        }));
        assert_eq!(reads.len(), 4);
    }

    #[test]
    fn test_expand_writes_wildcard_next() {
        let table = Table::new(vec![
            row("A", '_', '1', Direction::Right, "*"),
            row("B", '1', '1', Direction::Left, "A"),
        ]);

        let writes = table.expand_writes();
        assert!(writes.contains(&WriteKey {
            symbol: '1',
            direction: Direction::Right,
            next: "A".into(),
        }));
        assert!(writes.contains(&WriteKey {
            symbol: '1',
            direction: Direction::Right,
            next: "B".into(),
        }));
        assert_eq!(writes.len(), 3);
    }

    #[test]
    fn test_expand_moves() {
        let table = sample_table();
        let moves = table.expand_moves();
        assert_eq!(moves.len(), 3);
        assert!(moves.contains(&MoveKey {
            direction: Direction::Left,
            next: "halt".into(),
        }));
    }

    #[test]
    fn test_expansion_deduplicates() {
        // Wildcard row and concrete row derive the same (A, _) read case once
        let table = Table::new(vec![
            row("*", '_', '_', Direction::Right, "*"),
            row("A", '_', '_', Direction::Right, "A"),
        ]);
        assert_eq!(table.expand_reads().len(), 1);
    }

    #[test]
    fn test_orphan_destinations() {
        let table = Table::new(vec![row("A", '_', '_', Direction::Right, "Z")]);
        assert_eq!(table.orphan_destinations(), ["Z"]);
        assert!(sample_table().orphan_destinations().is_empty());
    }
}
