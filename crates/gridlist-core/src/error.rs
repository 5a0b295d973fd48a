#![forbid(unsafe_code)]

//! Error taxonomy for the collection framework.
//!
//! Every error is raised synchronously, strictly before any mutation, so a
//! failed call leaves the collection exactly as it was. The core never logs
//! and never retries; callers fix the call and retry explicitly.

/// Result alias used across the framework.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors from collection construction and operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Invalid configuration (e.g. `min_capacity > max_capacity`), detected
    /// at construction. No instance is produced.
    Configuration(String),
    /// An index, count, or length outside the legal window for the current
    /// length and capacity bounds.
    Range {
        /// Which argument was out of range ("index", "count", "length", ..).
        what: &'static str,
        /// The offending value.
        value: usize,
        /// Smallest legal value.
        min: usize,
        /// Largest legal value.
        max: usize,
    },
    /// A disallowed item value was passed to a mutating call.
    InvalidItem(String),
    /// Rejection from a pluggable validator's domain-specific rule.
    Validation(String),
}

impl CollectionError {
    /// Range error helper; `max` is clamped to be displayable even when the
    /// legal window is empty.
    #[must_use]
    pub fn range(what: &'static str, value: usize, min: usize, max: usize) -> Self {
        Self::Range {
            what,
            value,
            min,
            max,
        }
    }
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Range {
                what,
                value,
                min,
                max,
            } => write!(f, "{what} {value} out of range [{min}, {max}]"),
            Self::InvalidItem(msg) => write!(f, "invalid item: {msg}"),
            Self::Validation(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for CollectionError {}
