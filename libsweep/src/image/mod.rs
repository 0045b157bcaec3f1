//! The image record produced by the fetch pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

#[cfg(test)]
mod tests;

/// One tagged image as resolved from the registry.
///
/// Identity is the `(repository, tag)` pair at fetch time. The content digest
/// is what deletion is keyed on. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Image {
    repository: String,
    tag: String,
    content_digest: String,
    created_at: DateTime<Utc>,
}

impl Image {
    /// Creates an image record.
    pub fn new(
        repository: impl Into<String>,
        tag: impl Into<String>,
        content_digest: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
            content_digest: content_digest.into(),
            created_at,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn content_digest(&self) -> &str {
        &self.content_digest
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `repository:tag`
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }

    /// Result ordering: newest first, ties broken by repository then tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use libsweep::Image;
    ///
    /// let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let mut images = vec![
    ///     Image::new("web", "b", "sha256:b", t),
    ///     Image::new("web", "a", "sha256:a", t),
    /// ];
    /// images.sort_by(Image::cmp_newest_first);
    /// assert_eq!(images[0].tag(), "a");
    /// ```
    pub fn cmp_newest_first(a: &Image, b: &Image) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.repository.cmp(&b.repository))
            .then_with(|| a.tag.cmp(&b.tag))
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
