//! Atomic path parsers.
//!
//! Every primitive is greedy and deterministic. Separators and token
//! characters are disjoint ASCII classes, so no primitive ever needs to
//! backtrack and every cursor it returns sits on a char boundary.

use crate::parser::{Failure, FailureKind, Parsed, Parser};

/// Path separator character.
pub const SEPARATOR: u8 = b'/';

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Whether `token()` would consume all of `value`.
pub fn is_token(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(is_token_byte)
}

/// Length of the run of bytes satisfying `pred` starting at `position`.
fn run_length(input: &str, position: usize, pred: impl Fn(u8) -> bool) -> usize {
    input
        .as_bytes()
        .get(position..)
        .map(|rest| rest.iter().take_while(|b| pred(**b)).count())
        .unwrap_or(0)
}

/// One or more separators. Fails if the cursor is not on a separator.
pub fn separators1() -> Parser<String> {
    Parser::new("'/'+", |input: &str, position| {
        match run_length(input, position, |b| b == SEPARATOR) {
            0 => Err(Failure::mismatch(position, "'/'")),
            n => Ok(Parsed::new(input[position..position + n].to_string(), position + n)),
        }
    })
}

/// Zero or more separators. Never fails.
pub fn separators0() -> Parser<String> {
    Parser::new("'/'*", |input: &str, position| {
        let n = run_length(input, position, |b| b == SEPARATOR);
        Ok(Parsed::new(
            input.get(position..position + n).unwrap_or_default().to_string(),
            position + n,
        ))
    })
}

/// One or more ASCII alphanumeric characters.
pub fn token() -> Parser<String> {
    Parser::new("[0-9A-Za-z]+", |input: &str, position| {
        match run_length(input, position, is_token_byte) {
            0 => Err(Failure::mismatch(position, "[0-9A-Za-z]+")),
            n => Ok(Parsed::new(input[position..position + n].to_string(), position + n)),
        }
    })
}

/// The exact string `expected`, yielded as-is.
///
/// This is a plain prefix match: `exact("user")` accepts the start of
/// `"username"` and leaves `"name"` for whatever parser runs next.
pub fn exact(expected: impl Into<String>) -> Parser<String> {
    let expected: String = expected.into();
    let label = format!("{:?}", expected);
    Parser::new(label.clone(), move |input: &str, position| {
        let matches = input
            .get(position..)
            .is_some_and(|rest| rest.starts_with(expected.as_str()));
        if matches {
            Ok(Parsed::new(expected.clone(), position + expected.len()))
        } else {
            Err(Failure::mismatch(position, label.clone()))
        }
    })
}

/// Zero-width assertion that the cursor is at the end of input.
pub fn end_of_input() -> Parser<String> {
    Parser::new("end of input", |input: &str, position| {
        if position >= input.len() {
            Ok(Parsed::new(String::new(), position))
        } else {
            Err(Failure::new(
                FailureKind::IncompleteConsumption,
                position,
                "end of input",
            ))
        }
    })
}
