//! Manifest parsing and creation-time extraction.
//!
//! A tag can resolve to three shapes of document: a Docker schema 1 manifest
//! (creation time embedded in its history), a schema 2 / OCI manifest
//! (creation time in the config blob), or an index listing per-platform
//! manifests. [`Manifest`] distinguishes them.

pub use oci_spec::image::{Descriptor, ImageIndex, ImageManifest};

use crate::error::{Result, SweepError};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[cfg(test)]
mod tests;

/// A Docker schema 1 manifest, reduced to the fields sweep reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema1Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub history: Vec<Schema1History>,
}

/// One entry of a schema 1 `history` array.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema1History {
    /// JSON-encoded v1 image description
    #[serde(rename = "v1Compatibility")]
    pub v1_compatibility: String,
}

/// Shared shape of a v1 compatibility entry and an image config blob.
#[derive(Debug, Deserialize)]
struct CreatedField {
    #[serde(default)]
    created: Option<String>,
}

impl Schema1Manifest {
    /// Creation time of the top layer, which is the image's creation time.
    pub fn created(&self) -> Result<DateTime<Utc>> {
        let top = self
            .history
            .first()
            .ok_or_else(|| SweepError::validation("Schema 1 manifest has no history"))?;
        created_from_json(top.v1_compatibility.as_bytes(), "v1Compatibility entry")
    }
}

/// A parsed manifest document.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Manifest {
    /// Docker schema 1 manifest
    Schema1(Schema1Manifest),
    /// Single-platform schema 2 or OCI manifest
    Image(ImageManifest),
    /// Multi-platform index or Docker manifest list
    Index(ImageIndex),
}

impl Manifest {
    /// Parses manifest bytes, detecting the document shape.
    ///
    /// `schemaVersion: 1` selects schema 1. Otherwise the `mediaType` field is
    /// consulted, and failing that the presence of `manifests` or `layers`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| SweepError::validation_with_source("Failed to parse manifest JSON", e))?;

        if value.get("schemaVersion").and_then(|v| v.as_u64()) == Some(1) {
            let manifest: Schema1Manifest = serde_json::from_value(value).map_err(|e| {
                SweepError::validation_with_source("Failed to parse schema 1 manifest", e)
            })?;
            return Ok(Manifest::Schema1(manifest));
        }

        let media_type = value
            .get("mediaType")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let is_index = if media_type.contains("index") || media_type.contains("list") {
            true
        } else if media_type.contains("manifest") {
            false
        } else if value.get("manifests").is_some() {
            true
        } else if value.get("layers").is_some() || value.get("config").is_some() {
            false
        } else {
            return Err(SweepError::validation(
                "Unable to determine if content is a manifest or index",
            ));
        };

        if is_index {
            let index: ImageIndex = serde_json::from_slice(bytes)
                .map_err(|e| SweepError::validation_with_source("Failed to parse image index", e))?;
            Ok(Manifest::Index(index))
        } else {
            let manifest: ImageManifest = serde_json::from_slice(bytes).map_err(|e| {
                SweepError::validation_with_source("Failed to parse image manifest", e)
            })?;
            Ok(Manifest::Image(manifest))
        }
    }

    /// Short label for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Manifest::Schema1(_) => "schema1",
            Manifest::Image(_) => "manifest",
            Manifest::Index(_) => "index",
        }
    }

    /// Digest of the config blob of a single-platform manifest.
    pub fn config_digest(&self) -> Option<String> {
        match self {
            Manifest::Image(m) => Some(m.config().digest().to_string()),
            _ => None,
        }
    }

    /// Digests of the child manifests of an index.
    pub fn child_digests(&self) -> Vec<String> {
        match self {
            Manifest::Index(index) => index
                .manifests()
                .iter()
                .map(|desc| desc.digest().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Reads the `created` timestamp of an image config blob.
pub fn created_from_config(bytes: &[u8]) -> Result<DateTime<Utc>> {
    created_from_json(bytes, "image config")
}

fn created_from_json(bytes: &[u8], what: &str) -> Result<DateTime<Utc>> {
    let parsed: CreatedField = serde_json::from_slice(bytes)
        .map_err(|e| SweepError::validation_with_source(format!("Failed to parse {}", what), e))?;

    let raw = parsed
        .created
        .ok_or_else(|| SweepError::validation(format!("{} has no created timestamp", what)))?;

    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SweepError::validation_with_source(format!("Invalid created timestamp '{}'", raw), e)
        })
}
