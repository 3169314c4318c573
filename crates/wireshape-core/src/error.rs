//! # Error Types: Structured Error Hierarchy
//!
//! Validation failures are accumulated rather than raised: every schema
//! returns the full list of [`ValidationError`]s it found, each tagged
//! with the breadcrumb path leading to the offending value. Callers that
//! want a single error value wrap the list in [`ParseError`] or
//! [`JsonError`], whose message joins the individual errors.
//!
//! ## Rendering
//!
//! - A single error renders as `message` when its path is empty and as
//!   `a -> b -> c: message` otherwise.
//! - A list renders as its errors joined with `; `.

use std::fmt;

use thiserror::Error;

/// Top-level error type for wireshape.
#[derive(Error, Debug)]
pub enum WireshapeError {
    /// A wire value failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A parsed value failed to serialize to its wire form.
    #[error("json error: {0}")]
    Json(#[from] JsonError),

    /// A string is not an accepted ISO 8601 date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Breadcrumbs from the root value to the failing value: object keys,
    /// `[i]` list indices, and `<key> (key)` for record keys.
    pub path: Vec<String>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Create an error at the given path.
    pub fn new(path: impl Into<Vec<String>>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path.join(" -> "), self.message)
        }
    }
}

/// Collection of validation errors produced by one transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wrap a list of errors.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// A list holding exactly one error.
    pub fn single(path: impl Into<Vec<String>>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ValidationError::new(path, message)],
        }
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Iterate over the errors in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Append an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every error of `other`.
    pub fn append(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// A wire value could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{errors}")]
pub struct ParseError {
    /// Every error found while parsing.
    pub errors: ValidationErrors,
}

/// A parsed value could not be converted to its wire form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{errors}")]
pub struct JsonError {
    /// Every error found while serializing.
    pub errors: ValidationErrors,
}
