//! Generic combinators over [`Parser`].

use crate::parser::{Failure, FailureKind, Parsed, Parser};

/// A parser that consumes nothing and yields `value`.
pub fn succeed<T>(value: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new("succeed", move |_input: &str, position| {
        Ok(Parsed::new(value.clone(), position))
    })
}

/// A parser that consumes nothing and always fails with `kind`.
pub fn fail<T: 'static>(kind: FailureKind, expected: impl Into<String>) -> Parser<T> {
    let expected: String = expected.into();
    Parser::new(format!("fail({expected})"), move |_input: &str, position| {
        Err(Failure::new(kind, position, expected.clone()))
    })
}

/// Run `first` and then every parser in `rest`, each from the cursor the
/// previous one left, and yield the value of the last one.
///
/// The first failing parser fails the whole sequence with its own failure;
/// earlier parsers are never retried.
pub fn sequence<T, I>(first: Parser<T>, rest: I) -> Parser<T>
where
    T: 'static,
    I: IntoIterator<Item = Parser<T>>,
{
    rest.into_iter().fold(first, |acc, next| acc.then(next))
}

/// Try each alternative at the same position, in order. The first success wins.
///
/// When every alternative fails the result is a structural mismatch at the
/// starting position listing what each alternative expected.
pub fn alternation<T, I>(alternatives: I) -> Parser<T>
where
    T: 'static,
    I: IntoIterator<Item = Parser<T>>,
{
    let alternatives: Vec<Parser<T>> = alternatives.into_iter().collect();
    let label = alternatives
        .iter()
        .map(|p| p.label().to_string())
        .collect::<Vec<_>>()
        .join(" | ");

    Parser::new(label.clone(), move |input: &str, position| {
        for alternative in &alternatives {
            if let Ok(parsed) = alternative.parse_at(input, position) {
                return Ok(parsed);
            }
        }
        let expected = if label.is_empty() {
            "one of no alternatives".to_string()
        } else {
            format!("one of {label}")
        };
        Err(Failure::mismatch(position, expected))
    })
}
