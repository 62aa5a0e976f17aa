//! Path fragment constructors.
//!
//! # Responsibilities
//! - Turn primitive matchers into one-segment recognizers
//! - Bind a parameter name to the segment value where the fragment captures
//!
//! # Design Decisions
//! - Every fragment consumes its own leading separators
//! - Allow-lists bind the literal that matched, not an empty value
//! - Allow/deny sets are copied in at construction and never change

use std::collections::HashSet;

use crate::parser::{alternation, exact, fail, separators1, succeed, token, FailureKind, Parser};

/// One segment of a route, optionally binding a named parameter.
#[derive(Debug, Clone)]
pub struct Fragment {
    name: Option<String>,
    parser: Parser<String>,
}

impl Fragment {
    /// A fragment that binds its value under `name`.
    pub fn named(name: impl Into<String>, parser: Parser<String>) -> Self {
        Self {
            name: Some(name.into()),
            parser,
        }
    }

    /// A fragment that must match but contributes no parameter.
    pub fn unnamed(parser: Parser<String>) -> Self {
        Self { name: None, parser }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parser(&self) -> &Parser<String> {
        &self.parser
    }
}

fn literal_parser(segment: &str) -> Parser<String> {
    separators1().then(exact(segment))
}

/// Leading separators followed by exactly `segment`.
pub fn literal(segment: impl AsRef<str>) -> Fragment {
    Fragment::unnamed(literal_parser(segment.as_ref()))
}

/// Leading separators followed by any token, bound to `name`.
pub fn capture(name: impl Into<String>) -> Fragment {
    capture_with(name, token())
}

/// Leading separators followed by whatever `value` matches, bound to `name`.
pub fn capture_with(name: impl Into<String>, value: Parser<String>) -> Fragment {
    Fragment::named(name, separators1().then(value))
}

/// A segment equal to one of `allowed`, tried in the given order, bound to `name`.
pub fn allow_listed<I, S>(name: impl Into<String>, allowed: I) -> Fragment
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let alternatives = allowed
        .into_iter()
        .map(|value| literal_parser(value.as_ref()));
    Fragment::named(name, alternation(alternatives))
}

/// Any token except the ones in `denied`, bound to `name`.
pub fn deny_listed<I, S>(name: impl Into<String>, denied: I) -> Fragment
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let denied: HashSet<String> = denied.into_iter().map(Into::into).collect();
    let checked = token().chain(move |value: String| {
        if denied.contains(&value) {
            fail(FailureKind::ValueRejected, format!("a value other than {value:?}"))
        } else {
            succeed(value)
        }
    });
    Fragment::named(name, separators1().then(checked))
}
