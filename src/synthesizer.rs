//! This module implements the core rule synthesis: turning every original transition
//! into a chain of primitive moves over fixed-width blocks of target-alphabet cells,
//! with all per-block progress carried in the synthesized state's phase tag.

use crate::encoder::{digit_chars, Dictionary};
use crate::table::Table;
use crate::types::{
    is_halt, ConversionError, Direction, Phase, ReducedRule, ReducedState, BLANK_SYMBOL, WILDCARD,
    ZERO_DIGIT,
};
use std::collections::BTreeSet;

/// The result of one conversion: the encoding dictionary and the synthesized rule
/// set. Build-once; the set is emitted exactly as collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    dictionary: Dictionary,
    rules: BTreeSet<ReducedRule>,
}

impl Reduction {
    /// The dictionary the rules were synthesized against.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The shared block width.
    pub fn width(&self) -> usize {
        self.dictionary.width()
    }

    /// The synthesized rules in canonical order.
    pub fn rules(&self) -> impl Iterator<Item = &ReducedRule> {
        self.rules.iter()
    }

    /// The number of distinct synthesized rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the set contains the given rule.
    pub fn contains(&self, rule: &ReducedRule) -> bool {
        self.rules.contains(rule)
    }

    /// Renders the rule set as table text, one rule per line, in canonical order.
    pub fn render(&self) -> String {
        self.rules
            .iter()
            .map(ReducedRule::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Converts a source table into an equivalent reduced-alphabet rule set.
///
/// # Arguments
///
/// * `table` - The analyzed source table.
/// * `target` - The target alphabet size, between 2 and 16.
///
/// # Returns
///
/// * `Ok(Reduction)` carrying the dictionary and the deduplicated rule set.
/// * `Err(ConversionError::MalformedInput)` for an unsupported target size.
/// * `Err(ConversionError::InternalConsistency)` if synthesis derives a rule it
///   must never emit.
pub fn convert(table: &Table, target: usize) -> Result<Reduction, ConversionError> {
    let dictionary = Dictionary::build(table, target)?;

    let mut synthesizer = Synthesizer {
        table,
        dictionary: &dictionary,
        rules: BTreeSet::new(),
    };

    synthesizer.prime()?;
    synthesizer.scan_phase()?;
    synthesizer.apply_phase()?;
    synthesizer.write_phase()?;
    synthesizer.shift_phase()?;

    Ok(Reduction {
        rules: synthesizer.rules,
        dictionary,
    })
}

/// One in-progress conversion. Owns the growing rule set exclusively.
struct Synthesizer<'a> {
    table: &'a Table,
    dictionary: &'a Dictionary,
    rules: BTreeSet<ReducedRule>,
}

impl Synthesizer<'_> {
    /// Admits one rule into the set. Duplicate derivations collapse silently;
    /// a wildcard state or a terminal-state origin aborts the conversion.
    fn add(&mut self, rule: ReducedRule) -> Result<(), ConversionError> {
        if rule.state.is_terminal() {
            return Err(ConversionError::InternalConsistency(format!(
                "rule originates at the terminal state: {}",
                rule
            )));
        }
        if rule.state.has_wildcard() || rule.next.has_wildcard() {
            return Err(ConversionError::InternalConsistency(format!(
                "rule carries a wildcard state: {}",
                rule
            )));
        }

        self.rules.insert(rule);
        Ok(())
    }

    /// The code digits of a symbol.
    fn code(&self, symbol: char) -> Result<Vec<char>, ConversionError> {
        Ok(self.dictionary.code(symbol)?.chars().collect())
    }

    /// The number of primitive steps a cross-block shift takes. After the write-back
    /// the head rests on the last cell of the left-adjacent block, so a logical left
    /// move covers the remaining `w - 1` cells of that block, while a logical right
    /// move crosses it and the current block: `w + 1` cells.
    fn shift_steps(&self, direction: Direction) -> usize {
        match direction {
            Direction::Left => self.dictionary.width() - 1,
            Direction::Right => self.dictionary.width() + 1,
            Direction::Stay => 0,
        }
    }

    /// The state that enters the cross-block shift toward `base`. A zero-length
    /// chain hands off to the bare destination state directly.
    fn shift_entry(&self, direction: Direction, base: &str) -> ReducedState {
        if self.shift_steps(direction) == 0 {
            ReducedState::entry(base)
        } else {
            ReducedState::tagged(base, Phase::Shift { direction, step: 1 })
        }
    }

    /// Injects the priming rule: the start state reads the zero digit on
    /// never-written tape, writes the blank back, and stays put.
    fn prime(&mut self) -> Result<(), ConversionError> {
        self.add(ReducedRule {
            state: ReducedState::start(),
            read: ZERO_DIGIT,
            write: BLANK_SYMBOL,
            direction: Direction::Stay,
            next: ReducedState::start(),
        })
    }

    /// Phase 1: per concrete read case, walk right over the block's first `w - 1`
    /// cells, appending each digit read to the state tag. Read cases sharing a code
    /// prefix derive identical rules and collapse in the set.
    fn scan_phase(&mut self) -> Result<(), ConversionError> {
        let width = self.dictionary.width();

        for key in self.table.expand_reads() {
            let word = self.code(key.symbol)?;

            for position in 0..width - 1 {
                let seen: String = word[..position].iter().collect();

                for digit in digit_chars(self.dictionary.target()) {
                    let mut appended = seen.clone();
                    appended.push(digit);

                    self.add(ReducedRule {
                        state: ReducedState::tagged(
                            key.state.clone(),
                            Phase::Scan { seen: seen.clone() },
                        ),
                        read: digit,
                        write: WILDCARD,
                        direction: Direction::Right,
                        next: ReducedState::tagged(
                            key.state.clone(),
                            Phase::Scan { seen: appended },
                        ),
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Phase 2: per source row (wildcard origin expanded over the state catalog),
    /// stand on the block's last cell, recover the original symbol from the scan
    /// prefix, apply the original rule's write, and step left into the write-back.
    ///
    /// A halt-marked destination collapses straight to the terminal state; at width
    /// one there is nothing left to write and the rule enters the shift directly.
    fn apply_phase(&mut self) -> Result<(), ConversionError> {
        let width = self.dictionary.width();

        for row in self.table.rows() {
            let word = self.code(row.read)?;
            let code = self.code(row.write)?;

            let origins: Vec<&str> = if row.has_wildcard_state() {
                self.table.states().iter().map(String::as_str).collect()
            } else {
                vec![row.state.as_str()]
            };

            for origin in origins {
                let destination = if row.has_wildcard_next() {
                    origin
                } else {
                    row.next.as_str()
                };

                let next = if row.is_halt_bound() {
                    ReducedState::Terminal
                } else if width > 1 {
                    ReducedState::tagged(
                        destination,
                        Phase::Write {
                            symbol: row.write,
                            direction: row.direction,
                            step: 1,
                        },
                    )
                } else {
                    self.shift_entry(row.direction, destination)
                };

                self.add(ReducedRule {
                    state: ReducedState::tagged(
                        origin,
                        Phase::Scan {
                            seen: word[..width - 1].iter().collect(),
                        },
                    ),
                    read: word[width - 1],
                    write: code[width - 1],
                    direction: Direction::Left,
                    next,
                })?;
            }
        }

        Ok(())
    }

    /// Phase 3: per concrete write case, march left writing the remaining `w - 1`
    /// code digits unconditionally (the read is a wildcard), collapsing at the last
    /// position into the cross-block shift.
    ///
    /// Halt-marked cases emit nothing: their apply rule already collapsed to the
    /// terminal state, so their chains would be unreachable and would put
    /// halt-marked names in rule origins.
    fn write_phase(&mut self) -> Result<(), ConversionError> {
        let width = self.dictionary.width();
        if width == 1 {
            return Ok(());
        }

        for key in self.table.expand_writes() {
            if is_halt(&key.next) {
                continue;
            }

            let code = self.code(key.symbol)?;

            for step in 1..width {
                let next = if step < width - 1 {
                    ReducedState::tagged(
                        key.next.clone(),
                        Phase::Write {
                            symbol: key.symbol,
                            direction: key.direction,
                            step: step + 1,
                        },
                    )
                } else {
                    self.shift_entry(key.direction, &key.next)
                };

                self.add(ReducedRule {
                    state: ReducedState::tagged(
                        key.next.clone(),
                        Phase::Write {
                            symbol: key.symbol,
                            direction: key.direction,
                            step,
                        },
                    ),
                    read: WILDCARD,
                    write: code[width - 1 - step],
                    direction: Direction::Left,
                    next,
                })?;
            }
        }

        Ok(())
    }

    /// Phase 4: per concrete move case, emit the fixed chain of primitive moves
    /// that parks the head on the first cell of the adjacent block, reading and
    /// writing nothing. Halt-marked cases are skipped for the same reason as in
    /// the write phase.
    fn shift_phase(&mut self) -> Result<(), ConversionError> {
        for key in self.table.expand_moves() {
            if is_halt(&key.next) {
                continue;
            }

            let steps = self.shift_steps(key.direction);

            for step in 1..=steps {
                let next = if step < steps {
                    ReducedState::tagged(
                        key.next.clone(),
                        Phase::Shift {
                            direction: key.direction,
                            step: step + 1,
                        },
                    )
                } else {
                    ReducedState::entry(key.next.clone())
                };

                self.add(ReducedRule {
                    state: ReducedState::tagged(
                        key.next.clone(),
                        Phase::Shift {
                            direction: key.direction,
                            step,
                        },
                    ),
                    read: WILDCARD,
                    write: WILDCARD,
                    direction: key.direction,
                    next,
                })?;
            }
        }

        Ok(())
    }
}
