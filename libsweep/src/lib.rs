//! Sweep - Container Registry Image Inventory Library
//!
//! libsweep enumerates the tagged images of an OCI Distribution v2 registry,
//! resolves each tag's content digest and creation time, and selects images
//! for removal through composable filters.
//!
//! # Quick Start
//!
//! ```no_run
//! use libsweep::client::ClientConfig;
//! use libsweep::{Filter, Pipeline, Registry, RegistryApi};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to a registry
//!     let registry = Registry::connect("http://localhost:5000", ClientConfig::new()).await?;
//!     let repos = registry.list_repositories().await?;
//!
//!     // Fetch every dev build, newest first
//!     let pipeline = Pipeline::new(Arc::new(registry));
//!     let filters = vec![Filter::TagContains("dev".to_string())];
//!     for image in pipeline.fetch_images(&repos, &filters).await {
//!         println!("{} {}", image.created_at(), image);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Pipeline`] - Rate-limited concurrent fetch of image metadata
//! - [`RegistryApi`] - The registry operations the pipeline depends on
//! - [`Registry`] - HTTP implementation of [`RegistryApi`]
//! - [`Image`] - One resolved `repository:tag`
//! - [`Filter`] - Predicates composed by logical AND
//! - [`RateLimiter`] - Admission pacing shared by a pipeline run
//!
//! A failed registry call inside a pipeline drops the affected repository or
//! tag and is logged through `tracing`; it never aborts the run.

#![warn(clippy::all)]

/// Returns the libsweep crate version.
///
/// # Examples
///
/// ```
/// let version = libsweep::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use config::Config;
pub use digest::Digest;
pub use error::{Result, SweepError};
pub use filter::Filter;
pub use image::Image;
pub use pipeline::Pipeline;
pub use reference::ImageRef;
pub use registry::{Registry, RegistryApi};
pub use throttle::RateLimiter;

pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod filter;
pub mod format;
pub mod image;
pub mod pipeline;
pub mod reference;
pub mod registry;
pub mod throttle;

#[doc(hidden)]
pub mod oci;
