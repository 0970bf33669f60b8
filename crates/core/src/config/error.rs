use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One broken schema rule, located by a dotted path (`property.meta.0.name`).
///
/// The root of the update has the empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "value {}", self.message)
        } else {
            write!(f, "\"{}\" {}", self.path, self.message)
        }
    }
}

/// Every violation found in a rejected configuration update, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(transparent)]
#[error("configuration rejected with {} violation(s)", .0.len())]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![Violation::new(path, message)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
