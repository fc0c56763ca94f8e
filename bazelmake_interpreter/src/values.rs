/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The value universe of the mini-evaluator.
//!
//! Every expression evaluates to one of four shapes. Consumers only ever read
//! values through the total coercions [`StarValue::as_string`] and
//! [`StarValue::into_strings`], so an unexpected shape degrades to an empty
//! result instead of an error.

/// Result of evaluating a BUILD expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StarValue {
    /// Unbound identifier, unsupported call, or other construct the
    /// evaluator does not model.
    Absent,
    Str(String),
    List(Vec<String>),
    /// Dictionary literals are recognized but carry no value; consumers
    /// treat them as absent.
    Dict,
}

impl StarValue {
    /// Reads the value as a single string: a string is itself, a sequence
    /// contributes its first element, everything else is empty.
    pub fn as_string(&self) -> &str {
        match self {
            StarValue::Str(s) => s,
            StarValue::List(items) => items.first().map_or("", |s| s.as_str()),
            StarValue::Absent | StarValue::Dict => "",
        }
    }

    /// Reads the value as a sequence of strings: a lone string becomes a
    /// singleton, a sequence passes through, everything else is empty.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            StarValue::Str(s) => vec![s],
            StarValue::List(items) => items,
            StarValue::Absent | StarValue::Dict => Vec::new(),
        }
    }

    /// The binary `+` of BUILD files. String + string concatenates; when a
    /// sequence is involved both sides are coerced to sequences and joined in
    /// order; an absent side yields the other side unchanged.
    pub fn concat(self, other: StarValue) -> StarValue {
        match (self, other) {
            (StarValue::Absent | StarValue::Dict, b) => b,
            (a, StarValue::Absent | StarValue::Dict) => a,
            (StarValue::Str(a), StarValue::Str(b)) => StarValue::Str(a + &b),
            (a, b) => {
                let mut items = a.into_strings();
                items.extend(b.into_strings());
                StarValue::List(items)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> StarValue {
        StarValue::List(items.iter().map(|s| (*s).to_owned()).collect())
    }

    #[test]
    fn test_as_string() {
        assert_eq!(StarValue::Str("x".to_owned()).as_string(), "x");
        assert_eq!(list(&["a", "b"]).as_string(), "a");
        assert_eq!(StarValue::Absent.as_string(), "");
        assert_eq!(StarValue::Dict.as_string(), "");
    }

    #[test]
    fn test_into_strings() {
        assert_eq!(StarValue::Str("x".to_owned()).into_strings(), vec!["x".to_owned()]);
        assert_eq!(list(&["a", "b"]).into_strings(), vec!["a".to_owned(), "b".to_owned()]);
        assert!(StarValue::Absent.into_strings().is_empty());
    }

    #[test]
    fn test_concat() {
        assert_eq!(
            StarValue::Str("a".to_owned()).concat(StarValue::Str("b".to_owned())),
            StarValue::Str("ab".to_owned())
        );
        assert_eq!(list(&["a"]).concat(list(&["b", "c"])), list(&["a", "b", "c"]));
        assert_eq!(StarValue::Absent.concat(list(&["a"])), list(&["a"]));
        assert_eq!(list(&["a"]).concat(StarValue::Absent), list(&["a"]));
        assert_eq!(
            StarValue::Str("a".to_owned()).concat(list(&["b"])),
            list(&["a", "b"])
        );
        assert_eq!(StarValue::Dict.concat(StarValue::Absent), StarValue::Absent);
    }
}
