//! This module defines the core data structures and types used throughout the alphabet
//! reduction compiler, including source transition rows, derived expansion keys, the
//! phase-tagged states of the reduced machine, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol of every source alphabet. Sorts first in the symbol catalog.
pub const BLANK_SYMBOL: char = '_';
/// The wildcard token, legal only in the state and next fields of a source row.
pub const WILDCARD: char = '*';
/// Prefix marking a next-state token as terminal; all such tokens collapse to one state.
pub const HALT_PREFIX: &str = "halt";
/// Alternative rendering of the blank digit on reduced tapes, reserved in source alphabets.
pub const ZERO_DIGIT: char = '0';
/// Digit characters of the reduced machine, indexed by digit value. Digit zero is the blank.
pub const DIGIT_ALPHABET: &str = "_123456789ABCDEF";
/// The smallest supported target alphabet size.
pub const MIN_TARGET: usize = 2;
/// The largest supported target alphabet size, bounded by the digit alphabet.
pub const MAX_TARGET: usize = 16;
/// Name of the reduced machine's start state, used by the priming rule.
pub const START_STATE: &str = "0";
/// Rendered name of the canonical terminal state of the reduced machine.
pub const TERMINAL_STATE: &str = "H";

/// A head movement. Source rows allow only `Left` and `Right`; `Stay` occurs in
/// synthesized rules (the priming rule) and renders as the wildcard character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
    /// Keep the head in place.
    Stay,
}

impl Direction {
    /// The single-character rendering used in rule rows and state tags.
    pub fn as_char(&self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Stay => WILDCARD,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One parsed row of a source transition table:
/// `(state, read, write, direction, next)`.
///
/// `state` and `next` may be the wildcard token; `next` may carry the halt prefix.
/// `read` and `write` are always concrete single symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRow {
    /// The originating state, possibly the wildcard.
    pub state: String,
    /// The symbol read from the tape.
    pub read: char,
    /// The symbol written back.
    pub write: char,
    /// The head movement after writing.
    pub direction: Direction,
    /// The destination state, possibly the wildcard or a halt-marked token.
    pub next: String,
}

impl SourceRow {
    /// Whether the originating state is the wildcard.
    pub fn has_wildcard_state(&self) -> bool {
        is_wildcard(&self.state)
    }

    /// Whether the destination state is the wildcard.
    pub fn has_wildcard_next(&self) -> bool {
        is_wildcard(&self.next)
    }

    /// Whether the destination is halt-marked.
    pub fn is_halt_bound(&self) -> bool {
        is_halt(&self.next)
    }
}

impl fmt::Display for SourceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.state, self.read, self.write, self.direction, self.next
        )
    }
}

/// Returns true if the token is the wildcard.
pub fn is_wildcard(token: &str) -> bool {
    token.len() == 1 && token.starts_with(WILDCARD)
}

/// Returns true if the token is halt-marked.
pub fn is_halt(token: &str) -> bool {
    token.starts_with(HALT_PREFIX)
}

/// A concrete `(state, symbol)` read case, derived by wildcard expansion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadKey {
    pub state: String,
    pub symbol: char,
}

/// A concrete `(symbol, direction, next)` write case, derived by wildcard expansion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WriteKey {
    pub symbol: char,
    pub direction: Direction,
    pub next: String,
}

/// A concrete `(direction, next)` move case, derived by wildcard expansion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MoveKey {
    pub direction: Direction,
    pub next: String,
}

/// Progress of the reduced machine through one block of target-alphabet cells.
///
/// The phase is data rather than a dotted suffix baked into the state name, so
/// invalid combinations are unrepresentable; the dotted rendering happens in
/// [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Walking right through a block, remembering the digits read so far.
    /// An empty `seen` is the block-entry state and renders as the bare base name.
    Scan { seen: String },
    /// Writing the remaining code digits of `symbol` right-to-left. `step` counts
    /// the digits already written by the apply step and previous write steps.
    Write {
        symbol: char,
        direction: Direction,
        step: usize,
    },
    /// Marching toward the adjacent block after the write-back finished.
    Shift { direction: Direction, step: usize },
}

impl Phase {
    /// The block-entry scan phase: no digits seen yet.
    pub fn entry() -> Self {
        Phase::Scan {
            seen: String::new(),
        }
    }
}

/// A state of the reduced machine: either the canonical terminal state, or an
/// original-machine state tagged with the phase of the current block's processing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReducedState {
    /// The single state all halt-marked destinations collapse to. Never an origin.
    Terminal,
    /// A concrete original state plus block-processing phase.
    Tagged { base: String, phase: Phase },
}

impl ReducedState {
    /// A phase-tagged state over a concrete base state.
    pub fn tagged(base: impl Into<String>, phase: Phase) -> Self {
        ReducedState::Tagged {
            base: base.into(),
            phase,
        }
    }

    /// The block-entry state of a concrete base state.
    pub fn entry(base: impl Into<String>) -> Self {
        Self::tagged(base, Phase::entry())
    }

    /// The reduced machine's global start state.
    pub fn start() -> Self {
        Self::entry(START_STATE)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReducedState::Terminal)
    }

    /// Whether the base state name carries a wildcard, which would mark a
    /// synthesis defect.
    pub fn has_wildcard(&self) -> bool {
        match self {
            ReducedState::Terminal => false,
            ReducedState::Tagged { base, .. } => base.contains(WILDCARD),
        }
    }
}

impl fmt::Display for ReducedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReducedState::Terminal => write!(f, "{}", TERMINAL_STATE),
            ReducedState::Tagged { base, phase } => match phase {
                Phase::Scan { seen } if seen.is_empty() => write!(f, "{}", base),
                Phase::Scan { seen } => write!(f, "{}.{}", base, seen),
                Phase::Write {
                    symbol,
                    direction,
                    step,
                } => write!(f, "{}.{}{}{}", base, symbol, direction, step),
                Phase::Shift { direction, step } if *step == 1 => {
                    write!(f, "{}{}", base, direction)
                }
                Phase::Shift { direction, step } => write!(f, "{}{}{}", base, direction, step),
            },
        }
    }
}

/// One synthesized transition of the reduced machine. Origin and destination are
/// always concrete; `read` and `write` may be the wildcard character with its
/// usual tape-rule meaning (match anything / leave unchanged).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReducedRule {
    pub state: ReducedState,
    pub read: char,
    pub write: char,
    pub direction: Direction,
    pub next: ReducedState,
}

impl fmt::Display for ReducedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.state, self.read, self.write, self.direction, self.next
        )
    }
}

/// Represents the errors that can occur while loading, validating, converting,
/// or translating tapes of a source machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// A source row or table violates the input format.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// The source text failed to tokenize.
    #[error("Table parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The tape codec met a character absent from the encoding dictionary.
    #[error("Unknown symbol: '{0}'")]
    UnknownSymbol(char),
    /// The tape codec met a code window absent from the encoding dictionary.
    #[error("Unknown code: {0:?}")]
    UnknownCode(String),
    /// An encoded symbol did not come out at the dictionary width.
    #[error("Code for '{symbol}' is {actual} digits wide, expected {expected}")]
    WidthMismatch {
        symbol: char,
        expected: usize,
        actual: usize,
    },
    /// Synthesis produced a rule it must never emit. Always a defect, never input-driven.
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
    /// A file system operation failed while loading a table.
    #[error("File error: {0}")]
    FileError(String),
}
