//! This module provides the parser for source transition tables, utilizing the `pest`
//! crate. It defines the row grammar for `.tm` files and functions to parse the input
//! into a validated [`Table`].

use crate::{
    analyzer::analyze,
    table::Table,
    types::{is_wildcard, ConversionError, Direction, SourceRow},
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the transition-table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// Parses the given input string into a [`Table`].
///
/// This is the main entry point for parsing source machine definitions. Trailing
/// comments are stripped and blank lines skipped by the grammar; every remaining row
/// must carry exactly five fields. The derived table is analyzed before being
/// returned.
///
/// # Arguments
///
/// * `input` - A string slice containing the transition table text.
///
/// # Returns
///
/// * `Ok(Table)` if the input parses into at least one valid row.
/// * `Err(ConversionError::ParseError)` if the text fails to tokenize.
/// * `Err(ConversionError::MalformedInput)` if a row is not a valid transition
///   or the table fails analysis.
pub fn parse(input: &str) -> Result<Table, ConversionError> {
    let root = TableParser::parse(Rule::table, input)
        .map_err(|e| ConversionError::ParseError(Box::new(e)))?
        .next()
        .unwrap();

    let rows = root
        .into_inner()
        .filter(|p| p.as_rule() == Rule::row)
        .map(parse_row)
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(ConversionError::MalformedInput(
            "source table contains no rules".to_string(),
        ));
    }

    let table = Table::new(rows);

    // Analyze the derived table
    analyze(&table)?;

    Ok(table)
}

/// Parses one `Rule::row` pair into a [`SourceRow`], enforcing the five-field shape.
fn parse_row(pair: Pair<Rule>) -> Result<SourceRow, ConversionError> {
    let fields: Vec<&str> = pair.into_inner().map(|p| p.as_str()).collect();

    if fields.len() != 5 {
        return Err(ConversionError::MalformedInput(format!(
            "expected 5 fields per row, found {}: {:?}",
            fields.len(),
            fields.join(" ")
        )));
    }

    Ok(SourceRow {
        state: fields[0].to_string(),
        read: parse_symbol(fields[1])?,
        write: parse_symbol(fields[2])?,
        direction: parse_direction(fields[3])?,
        next: fields[4].to_string(),
    })
}

/// Parses a read/write field into a single concrete symbol.
///
/// Symbols are single characters and never the wildcard; the wildcard belongs to
/// the state and next fields only.
fn parse_symbol(token: &str) -> Result<char, ConversionError> {
    if is_wildcard(token) {
        return Err(ConversionError::MalformedInput(
            "wildcard is only allowed in the state and next fields".to_string(),
        ));
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConversionError::MalformedInput(format!(
            "symbols are single characters, found {:?}",
            token
        ))),
    }
}

/// Parses a direction field. Source rows move left or right; there is no stay.
fn parse_direction(token: &str) -> Result<Direction, ConversionError> {
    match token {
        "l" | "L" => Ok(Direction::Left),
        "r" | "R" => Ok(Direction::Right),
        _ => Err(ConversionError::MalformedInput(format!(
            "unsupported direction: {:?}",
            token
        ))),
    }
}
