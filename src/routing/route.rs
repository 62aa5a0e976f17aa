//! Anchored routes built from fragments.

use std::sync::Arc;

use thiserror::Error;

use crate::parser::{end_of_input, separators0, Failure, Parsed, Parser};
use crate::routing::fragment::Fragment;
use crate::routing::params::ParamMap;

/// Errors raised while building a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two fragments of the same route bind the same parameter name.
    #[error("route '{route}' binds parameter '{name}' more than once")]
    DuplicateParameter { route: String, name: String },
}

/// A named route compiled into a single anchored parser.
///
/// The parser runs every fragment in order, then an optional trailing
/// separator, then requires end of input.
#[derive(Debug, Clone)]
pub struct Route {
    name: Arc<str>,
    parser: Parser<ParamMap>,
}

impl Route {
    pub fn new(name: impl Into<String>, fragments: Vec<Fragment>) -> Result<Self, RouteError> {
        let name: String = name.into();

        let mut seen: Vec<&str> = Vec::with_capacity(fragments.len());
        for param in fragments.iter().filter_map(Fragment::name) {
            if seen.contains(&param) {
                return Err(RouteError::DuplicateParameter {
                    route: name,
                    name: param.to_string(),
                });
            }
            seen.push(param);
        }

        let parser = anchored(&name, fragments);
        Ok(Self {
            name: Arc::from(name),
            parser,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parser(&self) -> &Parser<ParamMap> {
        &self.parser
    }

    /// Match a whole request path.
    pub fn parse(&self, path: &str) -> Result<ParamMap, Failure> {
        self.parser.parse(path)
    }
}

fn anchored(name: &str, fragments: Vec<Fragment>) -> Parser<ParamMap> {
    let trailing = separators0();
    let eof = end_of_input();

    Parser::new(format!("route {name}"), move |input: &str, start| {
        let mut params = ParamMap::new();
        let mut position = start;

        for fragment in &fragments {
            let parsed = fragment.parser().parse_at(input, position)?;
            if let Some(param) = fragment.name() {
                params.insert(param, parsed.value);
            }
            position = parsed.position;
        }

        position = trailing.parse_at(input, position)?.position;
        position = eof.parse_at(input, position)?.position;

        Ok(Parsed::new(params, position))
    })
}

/// Shorthand for [`Route::new`] with a list of fragments.
#[macro_export]
macro_rules! route {
    ($name:expr $(, $fragment:expr)* $(,)?) => {
        $crate::routing::Route::new($name, vec![$($fragment),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FailureKind;
    use crate::routing::fragment::{allow_listed, capture, literal};

    fn user_route() -> Route {
        Route::new("read_one_user", vec![literal("user"), capture("id")]).unwrap()
    }

    #[test]
    fn test_route_matches_whole_path() {
        let params = user_route().parse("/user/5").unwrap();
        assert_eq!(params.get("id"), Some("5"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_trailing_separator_is_optional() {
        assert_eq!(user_route().parse("/user/5/").unwrap().get("id"), Some("5"));
        assert_eq!(user_route().parse("/user/5///").unwrap().get("id"), Some("5"));
    }

    #[test]
    fn test_remainder_is_rejected() {
        let failure = user_route().parse("/user/5/extra").unwrap_err();
        assert_eq!(failure.kind, FailureKind::IncompleteConsumption);
        assert_eq!(failure.position, 8);

        let failure = user_route().parse("/user/5?x=1").unwrap_err();
        assert_eq!(failure.kind, FailureKind::IncompleteConsumption);
    }

    #[test]
    fn test_literal_prefix_without_boundary_fails() {
        assert!(user_route().parse("/username/5").is_err());
    }

    #[test]
    fn test_empty_route_matches_root() {
        let root = Route::new("root", Vec::new()).unwrap();
        assert!(root.parse("/").unwrap().is_empty());
        assert!(root.parse("").is_ok());
        assert!(root.parse("/a").is_err());
    }

    #[test]
    fn test_duplicate_parameter_is_rejected() {
        let err = Route::new("dup", vec![capture("id"), capture("id")]).unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateParameter {
                route: "dup".into(),
                name: "id".into()
            }
        );
    }

    #[test]
    fn test_params_follow_fragment_order() {
        let route = Route::new(
            "page",
            vec![
                literal("user"),
                capture("id"),
                allow_listed("action", ["dashboard"]),
            ],
        )
        .unwrap();
        let params = route.parse("/user/7/dashboard").unwrap();
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(pairs, vec![("id", "7"), ("action", "dashboard")]);
    }

    #[test]
    fn test_route_macro() {
        let route = crate::route!("m", literal("a"), capture("b")).unwrap();
        assert_eq!(route.parse("/a/c").unwrap().get("b"), Some("c"));
    }
}
