//! Content digest validation.
//!
//! Wraps `oci_spec::image::Digest` so that malformed digests surface as
//! [`SweepError::Validation`] before any delete request is built from them.

use crate::error::{Result, SweepError};
use oci_spec::image::Digest as OciDigest;
use std::fmt;
use std::str::FromStr;


/// A validated `algorithm:hex` content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl FromStr for Digest {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s.trim()).map_err(|e| {
            SweepError::validation_with_source(format!("Invalid digest '{}'", s), e)
        })?;
        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Digest {
    /// The algorithm part, e.g. `sha256`.
    pub fn algorithm(&self) -> String {
        self.split().0
    }

    /// The encoded hash part after the colon.
    pub fn hex(&self) -> String {
        self.split().1
    }

    fn split(&self) -> (String, String) {
        let full = self.0.to_string();
        match full.split_once(':') {
            Some((algorithm, hex)) => (algorithm.to_string(), hex.to_string()),
            None => (String::new(), full),
        }
    }
}
