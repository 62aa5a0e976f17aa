//! Parser combinator engine.
//!
//! # Data Flow
//! ```text
//! (input, position)
//!     → primitives.rs (separators, token, exact, end of input)
//!     → combinators.rs (sequence, alternation, chain)
//!     → Ok(Parsed { value, position }) | Err(Failure { kind, position })
//! ```
//!
//! # Design Decisions
//! - A parser is an immutable closure behind `Arc`; cloning shares it
//! - Failures are plain values, never panics
//! - No backtracking beyond the explicit `alternation` combinator
//! - Positions are byte offsets; every primitive stops on ASCII boundaries

pub mod combinators;
pub mod primitives;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub use combinators::{alternation, fail, sequence, succeed};
pub use primitives::{end_of_input, exact, is_token, separators0, separators1, token, SEPARATOR};

/// Why a parse attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A literal segment or separator run did not match at the cursor.
    StructuralMismatch,
    /// A captured token failed an allow-list or deny-list check.
    ValueRejected,
    /// Everything matched but input remains before end of input.
    IncompleteConsumption,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::StructuralMismatch => "structural mismatch",
            FailureKind::ValueRejected => "value rejected",
            FailureKind::IncompleteConsumption => "incomplete consumption",
        };
        f.write_str(label)
    }
}

/// A failed parse attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {position}: expected {expected}")]
pub struct Failure {
    pub kind: FailureKind,
    /// Byte offset where the failing parser gave up.
    pub position: usize,
    /// Human readable description of what would have matched.
    pub expected: String,
}

impl Failure {
    pub fn new(kind: FailureKind, position: usize, expected: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            expected: expected.into(),
        }
    }

    pub fn mismatch(position: usize, expected: impl Into<String>) -> Self {
        Self::new(FailureKind::StructuralMismatch, position, expected)
    }
}

/// A successful parse attempt: the value and the cursor after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub position: usize,
}

impl<T> Parsed<T> {
    pub fn new(value: T, position: usize) -> Self {
        Self { value, position }
    }
}

/// Result of running a parser at a position.
pub type ParseResult<T> = Result<Parsed<T>, Failure>;

type ParseFn<T> = dyn Fn(&str, usize) -> ParseResult<T> + Send + Sync;

/// An immutable, reusable parser producing a `T`.
///
/// Cloning is cheap and shares the underlying closure, so a parser can be
/// embedded in any number of larger parsers.
pub struct Parser<T> {
    label: Arc<str>,
    run: Arc<ParseFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parser").field(&self.label).finish()
    }
}

impl<T: 'static> Parser<T> {
    /// Wrap a parse function. The label names the parser in failures and logs.
    pub fn new<F>(label: impl Into<String>, run: F) -> Self
    where
        F: Fn(&str, usize) -> ParseResult<T> + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label.into()),
            run: Arc::new(run),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the parser starting at `position`.
    pub fn parse_at(&self, input: &str, position: usize) -> ParseResult<T> {
        (self.run)(input, position)
    }

    /// Run the parser over the whole of `input`.
    ///
    /// Fails with `IncompleteConsumption` when input is left over; use
    /// `parse_at` for prefix matching.
    pub fn parse(&self, input: &str) -> Result<T, Failure> {
        let parsed = self.parse_at(input, 0)?;
        end_of_input().parse_at(input, parsed.position)?;
        Ok(parsed.value)
    }

    /// Rename the parser without changing its behaviour.
    pub fn labelled(self, label: impl Into<String>) -> Self {
        Self {
            label: Arc::from(label.into()),
            run: self.run,
        }
    }

    /// Transform the produced value.
    pub fn map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let label = self.label.to_string();
        Parser::new(label, move |input, position| {
            self.parse_at(input, position)
                .map(|parsed| Parsed::new(f(parsed.value), parsed.position))
        })
    }

    /// Run `self`, then run `next` from where `self` stopped, keeping only
    /// the value of `next`.
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        let label = format!("{} {}", self.label, next.label);
        Parser::new(label, move |input, position| {
            let first = self.parse_at(input, position)?;
            next.parse_at(input, first.position)
        })
    }

    /// Feed the produced value into `f` and continue with the parser it returns.
    ///
    /// This is the capture-then-validate step: `f` usually answers with
    /// `succeed(value)` or `fail(..)`.
    pub fn chain<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> Parser<U> + Send + Sync + 'static,
    {
        let label = self.label.to_string();
        Parser::new(label, move |input, position| {
            let parsed = self.parse_at(input, position)?;
            f(parsed.value).parse_at(input, parsed.position)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requires_whole_input() {
        assert_eq!(token().parse("abc").unwrap(), "abc");

        let failure = token().parse("abc-def").unwrap_err();
        assert_eq!(failure.kind, FailureKind::IncompleteConsumption);
        assert_eq!(failure.position, 3);
    }

    #[test]
    fn test_parse_at_matches_prefix() {
        let parsed = token().parse_at("abc-def", 0).unwrap();
        assert_eq!(parsed.value, "abc");
        assert_eq!(parsed.position, 3);
    }

    #[test]
    fn test_parse_reports_value_failure_before_leftover() {
        let failure = exact("user").parse("admin").unwrap_err();
        assert_eq!(failure.kind, FailureKind::StructuralMismatch);
        assert_eq!(failure.position, 0);
    }
}
