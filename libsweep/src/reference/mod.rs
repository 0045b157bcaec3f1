//! `repository[:tag]` references as typed by users.
//!
//! Unlike a full OCI reference, an [`ImageRef`] never carries a registry
//! host: the registry is chosen by the client, and the repository is used
//! verbatim as the path component of API calls.

use crate::error::{Result, SweepError};
use std::fmt;
use std::str::FromStr;


/// Tag assumed when a reference names none.
pub const DEFAULT_TAG: &str = "latest";

const MAX_TAG_LEN: usize = 128;

/// A repository plus tag within one registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    repository: String,
    tag: String,
}

impl ImageRef {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for ImageRef {
    type Err = SweepError;

    /// Parses `repository[:tag]`.
    ///
    /// The tag separator is searched for after the last `/`, so a
    /// `host:port/name` prefix is not mistaken for a tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::ImageRef;
    ///
    /// let r: ImageRef = "team/webserver:rc2".parse().unwrap();
    /// assert_eq!(r.repository(), "team/webserver");
    /// assert_eq!(r.tag(), "rc2");
    ///
    /// let r: ImageRef = "webserver".parse().unwrap();
    /// assert_eq!(r.tag(), "latest");
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SweepError::validation("Image reference is empty"));
        }
        if s.contains('@') {
            return Err(SweepError::validation(format!(
                "Digest references are not supported: '{}'",
                s
            )));
        }

        let name_start = s.rfind('/').map_or(0, |i| i + 1);
        let (repository, tag) = match s[name_start..].split_once(':') {
            None => (s, DEFAULT_TAG),
            Some((_, tag)) if tag.contains(':') => {
                return Err(SweepError::validation(format!(
                    "Invalid image reference '{}': too many ':' separators",
                    s
                )));
            }
            Some((name, tag)) => (&s[..name_start + name.len()], tag),
        };

        validate_repository(repository)?;
        validate_tag(tag)?;

        Ok(Self::new(repository, tag))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

fn validate_repository(repository: &str) -> Result<()> {
    if repository.split('/').any(str::is_empty) {
        return Err(SweepError::validation(format!(
            "Invalid repository name '{}'",
            repository
        )));
    }
    if repository.chars().any(|c| c.is_whitespace() || c.is_ascii_uppercase()) {
        return Err(SweepError::validation(format!(
            "Repository name must be lowercase without spaces: '{}'",
            repository
        )));
    }
    Ok(())
}

fn validate_tag(tag: &str) -> Result<()> {
    let mut chars = tag.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if !valid_first || !valid_rest || tag.len() > MAX_TAG_LEN {
        return Err(SweepError::validation(format!("Invalid tag '{}'", tag)));
    }
    Ok(())
}
