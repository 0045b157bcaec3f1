//! HTTP client for OCI registry communication.
//!
//! A thin reqwest wrapper speaking the Distribution v2 API: catalog and tag
//! listing with pagination, manifest and blob retrieval, and manifest
//! deletion by digest. Status codes are translated into [`SweepError`].

use crate::digest::Digest;
use crate::error::{Result, SweepError};
use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde::Deserialize;
use sha2::{Digest as Sha2Digest, Sha256};
use std::str::FromStr;
use std::time::Duration;


/// Media types we are willing to receive for a manifest request.
pub const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.manifest.v1+json, \
     application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.v2+json, \
     application/vnd.docker.distribution.manifest.list.v2+json, \
     application/vnd.docker.distribution.manifest.v1+prettyjws";

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    repositories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    name: String,
    // Registries answer `null` for a repository whose tags were all deleted
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Error envelope returned by Distribution-compliant registries.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    code: String,
    #[serde(default)]
    message: String,
}

/// Version information returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryVersion {
    /// The Docker-Distribution-API-Version header value, if present.
    pub api_version: Option<String>,
}

/// A manifest as served by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResponse {
    /// Raw manifest body
    pub bytes: Vec<u8>,
    /// Content digest, from `Docker-Content-Digest` or computed from the body
    pub digest: String,
    /// `Content-Type` of the response, if present
    pub media_type: Option<String>,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libsweep::client::ClientConfig;
///
/// let config = ClientConfig::new().with_timeout(10).with_insecure(true);
/// assert_eq!(config.timeout_seconds, 10);
/// assert!(config.insecure);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 5)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Accept invalid TLS certificates (default: false)
    pub insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            max_idle_per_host: 10,
            insecure: false,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    /// Disables TLS certificate verification.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

/// HTTP client for OCI registry operations.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: ReqwestClient,
    /// Base registry URL without the `/v2` suffix
    registry_url: String,
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::client::Client;
    ///
    /// let client = Client::new("localhost:5000").unwrap();
    /// assert_eq!(client.registry_url(), "http://localhost:5000");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default())
    }

    /// Creates a new client with a custom configuration.
    pub fn with_config(registry_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| SweepError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL: default scheme, no trailing slash, no `/v2`.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(SweepError::validation("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };

        let url = url.trim_end_matches('/');
        let url = url.strip_suffix("/v2").unwrap_or(url);

        Ok(url.to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Checks that the registry answers on the `/v2/` endpoint.
    ///
    /// # Errors
    ///
    /// Fails if the registry is unreachable, rejects the request, or does not
    /// implement the Distribution v2 API.
    pub async fn check_version(&self) -> Result<RegistryVersion> {
        let url = format!("{}/v2/", self.registry_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;

        let api_version = response
            .headers()
            .get("Docker-Distribution-API-Version")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Self::check_response_status(response).await?;

        Ok(RegistryVersion { api_version })
    }

    /// Fetches every repository name from `/v2/_catalog`, following pagination.
    pub async fn fetch_catalog(&self) -> Result<Vec<String>> {
        self.fetch_catalog_paginated(None).await
    }

    /// Fetches the catalog with an optional page size.
    pub async fn fetch_catalog_paginated(&self, limit: Option<usize>) -> Result<Vec<String>> {
        let mut all_repositories = Vec::new();
        let mut url = format!("{}/v2/_catalog", self.registry_url);

        if let Some(n) = limit {
            url.push_str(&format!("?n={}", n));
        }

        loop {
            let response = self
                .http_client
                .get(&url)
                .send()
                .await
                .map_err(|e| self.translate_reqwest_error(e))?;

            let next_path = Self::extract_next_link(response.headers());
            let response = Self::check_response_status(response).await?;

            let catalog: CatalogResponse = response.json().await.map_err(|e| {
                SweepError::validation_with_source("Failed to parse catalog response", e)
            })?;

            all_repositories.extend(catalog.repositories);

            match next_path {
                Some(link) => url = self.next_page_url(&link),
                None => break,
            }
        }

        Ok(all_repositories)
    }

    /// Fetches every tag of a repository, following pagination.
    pub async fn fetch_tags(&self, repository: &str) -> Result<Vec<String>> {
        self.fetch_tags_paginated(repository, None).await
    }

    /// Fetches the tag list with an optional page size.
    pub async fn fetch_tags_paginated(
        &self,
        repository: &str,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        let mut all_tags = Vec::new();
        let mut url = format!("{}/v2/{}/tags/list", self.registry_url, repository);

        if let Some(n) = limit {
            url.push_str(&format!("?n={}", n));
        }

        loop {
            let response = self
                .http_client
                .get(&url)
                .send()
                .await
                .map_err(|e| self.translate_reqwest_error(e))?;

            let next_path = Self::extract_next_link(response.headers());
            let response = Self::check_response_status(response).await?;

            let tags_response: TagsResponse = response.json().await.map_err(|e| {
                SweepError::validation_with_source("Failed to parse tags response", e)
            })?;

            if tags_response.name != repository {
                return Err(SweepError::validation(format!(
                    "Registry returned tags for '{}' but expected '{}'",
                    tags_response.name, repository
                )));
            }

            all_tags.extend(tags_response.tags.unwrap_or_default());

            match next_path {
                Some(link) => url = self.next_page_url(&link),
                None => break,
            }
        }

        Ok(all_tags)
    }

    /// Fetches the manifest for a tag or digest.
    ///
    /// The digest is taken from `Docker-Content-Digest`. Registries that omit
    /// the header get the sha256 of the body instead, which is what the header
    /// would have carried for any schema 2 or OCI manifest.
    pub async fn fetch_manifest(
        &self,
        repository: &str,
        reference: &str,
    ) -> Result<ManifestResponse> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, reference
        );

        let response = self
            .http_client
            .get(&url)
            .header("Accept", MANIFEST_ACCEPT)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;

        let response = Self::check_response_status(response).await?;

        let header_digest = response
            .headers()
            .get("Docker-Content-Digest")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SweepError::network_with_source("Failed to read manifest response", e))?
            .to_vec();

        let digest = match header_digest {
            Some(d) => d,
            None => format!("sha256:{:x}", Sha256::digest(&bytes)),
        };

        Ok(ManifestResponse {
            bytes,
            digest,
            media_type,
        })
    }

    /// Fetches a blob and verifies it against its sha256 digest.
    pub async fn fetch_blob(&self, repository: &str, digest: &str) -> Result<Vec<u8>> {
        let expected_digest = Digest::from_str(digest)?;

        if expected_digest.algorithm() != "sha256" {
            return Err(SweepError::validation(format!(
                "Unsupported digest algorithm: {}",
                expected_digest.algorithm()
            )));
        }

        let url = format!("{}/v2/{}/blobs/{}", self.registry_url, repository, digest);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;

        let response = Self::check_response_status(response).await?;

        let blob_bytes = response
            .bytes()
            .await
            .map_err(|e| SweepError::network_with_source("Failed to read blob response", e))?;

        let computed_hash = format!("{:x}", Sha256::digest(&blob_bytes));
        if computed_hash != expected_digest.hex() {
            return Err(SweepError::validation(format!(
                "Blob digest mismatch: expected {}, computed sha256:{}",
                digest, computed_hash
            )));
        }

        Ok(blob_bytes.to_vec())
    }

    /// Deletes a manifest by digest.
    ///
    /// Tags are never used here: a tag may have moved since it was resolved,
    /// the digest cannot.
    pub async fn delete_manifest(&self, repository: &str, digest: &str) -> Result<()> {
        let digest = Digest::from_str(digest)?;
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, digest
        );

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;

        Self::check_response_status(response).await?;
        Ok(())
    }

    /// Extracts the next page path from a `Link: <...>; rel="next"` header.
    fn extract_next_link(headers: &HeaderMap) -> Option<String> {
        let link_str = headers.get(LINK)?.to_str().ok()?;

        link_str
            .split(',')
            .map(str::trim)
            .filter(|part| part.contains("rel=\"next\"") || part.contains("rel='next'"))
            .find_map(|part| {
                let start = part.find('<')?;
                let end = part.find('>')?;
                Some(part[start + 1..end].to_string())
            })
    }

    /// Absolute `Link` targets are used as-is; paths are joined to the registry URL.
    fn next_page_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.registry_url, link)
        }
    }

    fn translate_reqwest_error(&self, error: reqwest::Error) -> SweepError {
        let registry_url = &self.registry_url;
        if error.is_timeout() {
            SweepError::network(format!(
                "Request to {} timed out after {} seconds",
                registry_url, self.timeout_seconds
            ))
        } else if error.is_connect() {
            SweepError::network_with_source(
                format!("Failed to connect to registry at {}", registry_url),
                error,
            )
        } else {
            SweepError::network_with_source(
                format!("Network error communicating with {}", registry_url),
                error,
            )
        }
    }

    /// Passes successful responses through and maps everything else to an error.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));
        let registry_errors = serde_json::from_str::<ErrorEnvelope>(&error_body)
            .ok()
            .filter(|envelope| !envelope.errors.is_empty())
            .map(|envelope| {
                envelope
                    .errors
                    .into_iter()
                    .map(|e| format!("{} - {}", e.code, e.message))
                    .collect::<Vec<_>>()
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SweepError::authentication(
                format!("Access denied for {}: {}", url, error_body),
                Some(status.as_u16()),
            )),
            StatusCode::NOT_FOUND => Err(SweepError::not_found("resource", url.as_str())),
            StatusCode::TOO_MANY_REQUESTS => Err(SweepError::rate_limit(
                format!("Rate limit exceeded for {}", url),
                retry_after,
            )),
            s if s.is_server_error() => Err(SweepError::server(
                format!("Server error from {}: {}", url, error_body),
                s.as_u16(),
            )),
            s => match registry_errors {
                Some(errors) => Err(SweepError::registry(s.as_u16(), errors)),
                None => Err(SweepError::network(format!(
                    "HTTP {} from {}: {}",
                    s.as_u16(),
                    url,
                    error_body
                ))),
            },
        }
    }
}
