//! Parser and evaluator for the dependency condition mini-language.
//!
//! A condition is a comma-separated list of terms, all of which must
//! hold. Each term is a pipe-separated group of field references, and a
//! group holds when exactly one of its references is satisfied. A
//! reference is either a bare parameter name, satisfied when that
//! parameter carries a non-empty value, or `name=REGEX`, satisfied when
//! the value additionally matches the pattern.
//!
//! `protocol=^(?i)nfs$,backend` holds for NFS requests that also name a
//! backend; `fromSnapshot|fromShare` holds when exactly one clone
//! source is given.

use std::collections::HashMap;

use regex::Regex;

/// A compiled condition: the AND of its comma-separated terms.
///
/// Conditions are parsed once, when the owning validator is built, and
/// evaluated as a tree walk against each parameter map.
#[derive(Debug, Clone)]
pub struct Condition {
    source: String,
    terms: Vec<Term>,
}

/// A pipe-separated group of field references. Exactly one reference
/// must be satisfied for the term to hold.
#[derive(Debug, Clone)]
struct Term {
    refs: Vec<FieldRef>,
}

/// A single field reference, optionally constrained by a pattern.
#[derive(Debug, Clone)]
struct FieldRef {
    name: String,
    pattern: Option<Regex>,
}

/// Why a condition string failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum ConditionParseError {
    #[error("Condition must not be empty")]
    Empty,

    #[error("Empty term in condition")]
    EmptyTerm,

    #[error("Empty field reference in condition")]
    EmptyReference,

    #[error("Invalid pattern {pattern:?} in reference to {name}: {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        source: regex::Error,
    },
}

impl Condition {
    /// Parse a condition string into its compiled form.
    pub fn parse(source: &str) -> Result<Self, ConditionParseError> {
        if source.is_empty() {
            return Err(ConditionParseError::Empty);
        }

        let mut terms = Vec::new();
        for term_src in source.split(',') {
            if term_src.is_empty() {
                return Err(ConditionParseError::EmptyTerm);
            }
            let refs = term_src
                .split('|')
                .map(FieldRef::parse)
                .collect::<Result<Vec<_>, _>>()?;
            terms.push(Term { refs });
        }

        Ok(Self {
            source: source.to_string(),
            terms,
        })
    }

    /// Evaluate the condition against a raw parameter map.
    ///
    /// A parameter that is absent, or present with an empty value,
    /// fails any reference to it.
    pub fn evaluate(&self, params: &HashMap<String, String>) -> bool {
        self.terms.iter().all(|term| term.evaluate(params))
    }

    /// The original condition string, for error messages.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every parameter name referenced by the condition.
    pub(crate) fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.terms
            .iter()
            .flat_map(|term| term.refs.iter())
            .map(|r| r.name.as_str())
    }
}

impl Term {
    fn evaluate(&self, params: &HashMap<String, String>) -> bool {
        let satisfied = self.refs.iter().filter(|r| r.evaluate(params)).count();
        satisfied == 1
    }
}

impl FieldRef {
    fn parse(src: &str) -> Result<Self, ConditionParseError> {
        let (name, pattern_src) = match src.split_once('=') {
            Some((name, pattern)) => (name, Some(pattern)),
            None => (src, None),
        };
        if name.is_empty() {
            return Err(ConditionParseError::EmptyReference);
        }

        let pattern = match pattern_src {
            Some(p) => Some(Regex::new(p).map_err(|source| {
                ConditionParseError::InvalidPattern {
                    name: name.to_string(),
                    pattern: p.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    fn evaluate(&self, params: &HashMap<String, String>) -> bool {
        let value = match params.get(&self.name) {
            Some(v) if !v.is_empty() => v,
            _ => return false,
        };
        match &self.pattern {
            Some(re) => re.is_match(value),
            None => true,
        }
    }
}

/// True when `name` carries a non-empty value in `params`.
pub(crate) fn provided(params: &HashMap<String, String>, name: &str) -> bool {
    params.get(name).is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bare_name_requires_non_empty_value() {
        let cond = Condition::parse("backend").unwrap();
        assert!(cond.evaluate(&params(&[("backend", "cephfs")])));
        assert!(!cond.evaluate(&params(&[])));
        assert!(!cond.evaluate(&params(&[("backend", "")])));
    }

    #[test]
    fn pattern_reference_matches_value() {
        let cond = Condition::parse("protocol=^(?i)nfs$").unwrap();
        assert!(cond.evaluate(&params(&[("protocol", "nfs")])));
        assert!(cond.evaluate(&params(&[("protocol", "NFS")])));
        assert!(!cond.evaluate(&params(&[("protocol", "cephfs")])));
        assert!(!cond.evaluate(&params(&[])));
    }

    #[test]
    fn pattern_match_is_unanchored() {
        let cond = Condition::parse("zone=east").unwrap();
        assert!(cond.evaluate(&params(&[("zone", "us-east-1")])));
        assert!(!cond.evaluate(&params(&[("zone", "us-west-2")])));
    }

    #[test]
    fn comma_terms_all_must_hold() {
        let cond = Condition::parse("a,b").unwrap();
        assert!(cond.evaluate(&params(&[("a", "1"), ("b", "2")])));
        assert!(!cond.evaluate(&params(&[("a", "1")])));
        assert!(!cond.evaluate(&params(&[("b", "2")])));
    }

    #[test]
    fn pipe_group_requires_exactly_one() {
        let cond = Condition::parse("a|b").unwrap();
        assert!(cond.evaluate(&params(&[("a", "1")])));
        assert!(cond.evaluate(&params(&[("b", "2")])));
        assert!(!cond.evaluate(&params(&[])));
        // Both satisfied is a failure, not an inclusive OR.
        assert!(!cond.evaluate(&params(&[("a", "1"), ("b", "2")])));
    }

    #[test]
    fn pipe_group_mixed_with_terms() {
        let cond = Condition::parse("a|b,c").unwrap();
        assert!(cond.evaluate(&params(&[("a", "1"), ("c", "3")])));
        assert!(cond.evaluate(&params(&[("b", "2"), ("c", "3")])));
        assert!(!cond.evaluate(&params(&[("a", "1"), ("b", "2"), ("c", "3")])));
        assert!(!cond.evaluate(&params(&[("a", "1")])));
    }

    #[test]
    fn pattern_with_equals_sign_splits_on_first() {
        let cond = Condition::parse("opts=^a=b$").unwrap();
        assert!(cond.evaluate(&params(&[("opts", "a=b")])));
        assert!(!cond.evaluate(&params(&[("opts", "a")])));
    }

    #[test]
    fn empty_condition_rejected() {
        assert_matches!(Condition::parse(""), Err(ConditionParseError::Empty));
    }

    #[test]
    fn empty_term_rejected() {
        assert_matches!(Condition::parse("a,,b"), Err(ConditionParseError::EmptyTerm));
        assert_matches!(Condition::parse("a,"), Err(ConditionParseError::EmptyTerm));
    }

    #[test]
    fn empty_reference_rejected() {
        assert_matches!(
            Condition::parse("a|"),
            Err(ConditionParseError::EmptyReference)
        );
        assert_matches!(
            Condition::parse("=^x$"),
            Err(ConditionParseError::EmptyReference)
        );
    }

    #[test]
    fn invalid_pattern_rejected() {
        assert_matches!(
            Condition::parse("a=[unclosed"),
            Err(ConditionParseError::InvalidPattern { name, .. }) if name == "a"
        );
    }

    #[test]
    fn referenced_names_cover_all_terms() {
        let cond = Condition::parse("a|b=^x$,c").unwrap();
        let names: Vec<&str> = cond.referenced_names().collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn source_is_preserved() {
        let cond = Condition::parse("a=^x$,b").unwrap();
        assert_eq!(cond.source(), "a=^x$,b");
    }
}
