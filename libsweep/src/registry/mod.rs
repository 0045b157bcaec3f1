//! Registry operations used by the fetch pipeline.
//!
//! [`RegistryApi`] is the contract the pipeline depends on. [`Registry`] is
//! the HTTP implementation: it resolves a tag to an [`Image`] by reading the
//! manifest digest and the creation time recorded in the image config.

use crate::client::{Client, ClientConfig};
use crate::error::{Result, SweepError};
use crate::image::Image;
use crate::oci::{Manifest, created_from_config};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};


/// Request/response operations against a container registry.
///
/// Every call may fail independently of the others. Implementations must be
/// shareable across tasks.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Lists every repository in the registry catalog.
    async fn list_repositories(&self) -> Result<Vec<String>>;

    /// Lists the tags of one repository.
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>>;

    /// Resolves `repository:tag` to its digest and creation time.
    async fn get_image_metadata(&self, repository: &str, tag: &str) -> Result<Image>;

    /// Deletes the manifest addressed by the image's content digest.
    async fn delete_image(&self, image: &Image) -> Result<()>;
}

/// HTTP-backed [`RegistryApi`].
#[derive(Debug, Clone)]
pub struct Registry {
    client: Client,
}

impl Registry {
    /// Wraps an existing client without contacting the registry.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client for `url` and verifies the registry answers on `/v2/`.
    ///
    /// An unreachable registry is fatal here, before any pipeline starts.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libsweep::client::ClientConfig;
    /// use libsweep::registry::Registry;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let registry = Registry::connect("http://localhost:5000", ClientConfig::new()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str, config: ClientConfig) -> Result<Self> {
        let client = Client::with_config(url, config)?;
        let version = client.check_version().await?;
        info!(
            registry = client.registry_url(),
            api_version = version.api_version.as_deref().unwrap_or("unknown"),
            "connected to registry"
        );
        Ok(Self { client })
    }

    /// Creation time of a single-platform manifest, read from its config blob.
    async fn config_created(&self, repository: &str, manifest: &Manifest) -> Result<DateTime<Utc>> {
        let config_digest = manifest
            .config_digest()
            .ok_or_else(|| SweepError::validation("Manifest has no config descriptor"))?;
        let config_bytes = self.client.fetch_blob(repository, &config_digest).await?;
        created_from_config(&config_bytes)
    }

    async fn child_created(&self, repository: &str, digest: &str) -> Result<DateTime<Utc>> {
        let child = self.client.fetch_manifest(repository, digest).await?;
        let child_manifest = Manifest::from_bytes(&child.bytes)?;
        self.config_created(repository, &child_manifest).await
    }

    /// Resolves the creation time of whatever document a tag points at.
    ///
    /// For an index the newest creation time across its platforms wins.
    /// Children without a usable timestamp (attestation manifests, for one)
    /// are skipped; the index fails only when none has a time.
    async fn resolve_created(
        &self,
        repository: &str,
        manifest: &Manifest,
    ) -> Result<DateTime<Utc>> {
        match manifest {
            Manifest::Schema1(schema1) => schema1.created(),
            Manifest::Image(_) => self.config_created(repository, manifest).await,
            Manifest::Index(_) => {
                let mut newest: Option<DateTime<Utc>> = None;
                for child_digest in manifest.child_digests() {
                    match self.child_created(repository, &child_digest).await {
                        Ok(created) => newest = Some(newest.map_or(created, |n| n.max(created))),
                        Err(e) => {
                            debug!(
                                repository = %repository,
                                digest = %child_digest,
                                error = %e,
                                "skipping index child without creation time"
                            );
                        }
                    }
                }
                newest.ok_or_else(|| {
                    SweepError::validation("Image index has no manifest with a creation time")
                })
            }
        }
    }
}

#[async_trait]
impl RegistryApi for Registry {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        self.client.fetch_catalog().await
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        self.client.fetch_tags(repository).await
    }

    async fn get_image_metadata(&self, repository: &str, tag: &str) -> Result<Image> {
        let response = self.client.fetch_manifest(repository, tag).await?;
        let manifest = Manifest::from_bytes(&response.bytes)?;
        let created = self.resolve_created(repository, &manifest).await?;

        debug!(
            repository,
            tag,
            kind = manifest.kind(),
            media_type = response.media_type.as_deref().unwrap_or("unknown"),
            digest = %response.digest,
            "resolved image metadata"
        );

        Ok(Image::new(repository, tag, response.digest, created))
    }

    async fn delete_image(&self, image: &Image) -> Result<()> {
        self.client
            .delete_manifest(image.repository(), image.content_digest())
            .await
    }
}
