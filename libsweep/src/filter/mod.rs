//! Image predicates.
//!
//! Filters are pure and compose by logical AND: an image survives a chain only
//! if every filter accepts it. The order of a chain changes nothing but how
//! early a rejection short-circuits.

use crate::image::Image;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Predicate signature accepted by [`Filter::custom`].
pub type Predicate = dyn Fn(&Image) -> bool + Send + Sync;

/// A single predicate over an [`Image`].
#[derive(Clone)]
pub enum Filter {
    /// Created strictly before the given instant
    CreatedBefore(DateTime<Utc>),
    /// Tag contains the given substring
    TagContains(String),
    /// Tag does not contain the given substring
    TagExcludes(String),
    /// Caller-supplied predicate; must be free of side effects
    Custom(Arc<Predicate>),
}

impl Filter {
    /// Wraps an arbitrary predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::Filter;
    ///
    /// let no_latest = Filter::custom(|image| image.tag() != "latest");
    /// ```
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Image) -> bool + Send + Sync + 'static,
    {
        Filter::Custom(Arc::new(predicate))
    }

    /// Returns whether `image` satisfies this filter.
    pub fn evaluate(&self, image: &Image) -> bool {
        match self {
            Filter::CreatedBefore(cutoff) => image.created_at() < *cutoff,
            Filter::TagContains(needle) => image.tag().contains(needle.as_str()),
            Filter::TagExcludes(needle) => !image.tag().contains(needle.as_str()),
            Filter::Custom(predicate) => predicate(image),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::CreatedBefore(cutoff) => f.debug_tuple("CreatedBefore").field(cutoff).finish(),
            Filter::TagContains(s) => f.debug_tuple("TagContains").field(s).finish(),
            Filter::TagExcludes(s) => f.debug_tuple("TagExcludes").field(s).finish(),
            Filter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Returns true iff every filter accepts `image`. An empty chain accepts all.
pub fn passes(image: &Image, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| filter.evaluate(image))
}
