//! This module provides the tape codecs translating between original-alphabet and
//! reduced-alphabet tape strings, sharing the encoding dictionary's width with the
//! rule synthesizer.

use crate::encoder::Dictionary;
use crate::types::{ConversionError, BLANK_SYMBOL, WILDCARD, ZERO_DIGIT};

/// Encodes an original-alphabet tape into the reduced alphabet.
///
/// The don't-care wildcard marker passes through unchanged; it denotes an
/// unspecified run and is never expanded. Every other character substitutes its
/// fixed-width code.
///
/// # Arguments
///
/// * `dictionary` - The encoding dictionary of the conversion.
/// * `tape` - The original-alphabet tape string.
///
/// # Returns
///
/// * `Ok(String)` with each symbol replaced by its code.
/// * `Err(ConversionError::UnknownSymbol)` for a character outside the dictionary.
/// * `Err(ConversionError::WidthMismatch)` if a code is not exactly the dictionary
///   width.
pub fn encode_tape(dictionary: &Dictionary, tape: &str) -> Result<String, ConversionError> {
    let width = dictionary.width();
    let mut out = String::with_capacity(tape.len() * width);

    for symbol in tape.chars() {
        if symbol == WILDCARD {
            out.push(symbol);
            continue;
        }

        let code = dictionary.code(symbol)?;
        if code.chars().count() != width {
            return Err(ConversionError::WidthMismatch {
                symbol,
                expected: width,
                actual: code.chars().count(),
            });
        }
        out.push_str(code);
    }

    Ok(out)
}

/// Decodes a reduced-alphabet tape back into the original alphabet.
///
/// The zero digit and the space character normalize to the blank, wildcard markers
/// are stripped, and the remaining digits are consumed in windows of the
/// dictionary's width. The window size is always the computed width, never a
/// fixed literal.
///
/// # Arguments
///
/// * `dictionary` - The encoding dictionary of the conversion.
/// * `tape` - The reduced-alphabet tape string.
///
/// # Returns
///
/// * `Ok(String)` with each window replaced by its symbol.
/// * `Err(ConversionError::UnknownCode)` for an unmapped or partial window.
pub fn decode_tape(dictionary: &Dictionary, tape: &str) -> Result<String, ConversionError> {
    let digits: Vec<char> = tape
        .chars()
        .filter(|&c| c != WILDCARD)
        .map(|c| {
            if c == ZERO_DIGIT || c == ' ' {
                BLANK_SYMBOL
            } else {
                c
            }
        })
        .collect();

    let mut out = String::with_capacity(digits.len() / dictionary.width() + 1);
    for window in digits.chunks(dictionary.width()) {
        let code: String = window.iter().collect();
        out.push(dictionary.symbol(&code)?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::table::Table;

    fn three_symbol_dictionary() -> Dictionary {
        // Symbols {_, 1, X}: width 2 at target 2
        let table: Table = parse("A _ 1 r A\nA 1 X r A\nA X X l halt\n").unwrap();
        Dictionary::build(&table, 2).unwrap()
    }

    #[test]
    fn test_encode_tape() {
        let dict = three_symbol_dictionary();
        assert_eq!(encode_tape(&dict, "1X_").unwrap(), "_11___");
    }

    #[test]
    fn test_encode_passes_wildcard_through() {
        let dict = three_symbol_dictionary();
        assert_eq!(encode_tape(&dict, "*1*").unwrap(), "*_1*");
    }

    #[test]
    fn test_encode_unknown_symbol() {
        let dict = three_symbol_dictionary();
        assert_eq!(
            encode_tape(&dict, "1q"),
            Err(ConversionError::UnknownSymbol('q'))
        );
    }

    #[test]
    fn test_decode_tape() {
        let dict = three_symbol_dictionary();
        assert_eq!(decode_tape(&dict, "_11___").unwrap(), "1X_");
    }

    #[test]
    fn test_decode_window_is_dictionary_width() {
        // Width is 2 here; a 4-window decoder would misread this tape
        let dict = three_symbol_dictionary();
        assert_eq!(dict.width(), 2);
        assert_eq!(decode_tape(&dict, "_1_1").unwrap(), "11");
    }

    #[test]
    fn test_decode_normalizes_zero_and_space() {
        let dict = three_symbol_dictionary();
        assert_eq!(decode_tape(&dict, "01 0").unwrap(), "1_");
    }

    #[test]
    fn test_decode_strips_wildcards() {
        let dict = three_symbol_dictionary();
        assert_eq!(decode_tape(&dict, "*_1*1_*").unwrap(), "1X");
    }

    #[test]
    fn test_decode_unknown_window() {
        let dict = three_symbol_dictionary();
        assert_eq!(
            decode_tape(&dict, "11"),
            Err(ConversionError::UnknownCode("11".to_string()))
        );
    }

    #[test]
    fn test_decode_partial_window() {
        let dict = three_symbol_dictionary();
        assert_eq!(
            decode_tape(&dict, "_1_"),
            Err(ConversionError::UnknownCode("_".to_string()))
        );
    }

    #[test]
    fn test_round_trip() {
        let dict = three_symbol_dictionary();
        for tape in ["", "1", "X_1", "_______X", "1X1X1X"] {
            let encoded = encode_tape(&dict, tape).unwrap();
            assert_eq!(decode_tape(&dict, &encoded).unwrap(), tape);
        }
    }
}
