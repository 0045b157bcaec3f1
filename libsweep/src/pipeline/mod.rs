//! Rate-limited concurrent metadata fetch.
//!
//! A run has three stages connected by channels:
//!
//! 1. **Tag discovery** spawns one task per repository that lists its tags.
//! 2. **Metadata fetch** consumes tag sets as they arrive and spawns one task
//!    per tag that resolves the image.
//! 3. **Collection** drains the image channel, applies the filter chain and
//!    sorts the survivors newest first.
//!
//! Every task holds its own clone of the stage's sender, so a stage's channel
//! closes exactly when its last task finishes. A single [`RateLimiter`] paces
//! task admission across both fetching stages. Failed calls are logged and the
//! item is dropped; a run always returns a (possibly shorter) list.

use crate::filter::{Filter, passes};
use crate::image::Image;
use crate::registry::RegistryApi;
use crate::throttle::RateLimiter;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};


/// Default admission interval: 10 requests per second.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// The tags discovered for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTagSet {
    pub repository: String,
    pub tags: Vec<String>,
}

/// Fetches, filters and orders images from a registry.
///
/// # Examples
///
/// ```no_run
/// use libsweep::client::ClientConfig;
/// use libsweep::registry::Registry;
/// use libsweep::{Filter, Pipeline};
/// use std::num::NonZeroUsize;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = Registry::connect("http://localhost:5000", ClientConfig::new()).await?;
/// let pipeline = Pipeline::new(Arc::new(registry));
///
/// let repos = vec!["webserver".to_string()];
/// let filters = vec![Filter::TagContains("dev".to_string())];
/// let keep = NonZeroUsize::new(3).unwrap();
///
/// for image in pipeline
///     .fetch_images_excluding_latest_per_repo(&repos, &filters, keep)
///     .await
/// {
///     println!("{} {}", image.created_at(), image.reference());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<R: RegistryApi + ?Sized> {
    registry: Arc<R>,
    interval: Duration,
}

impl<R: RegistryApi + ?Sized + 'static> Pipeline<R> {
    /// Creates a pipeline admitting requests at [`DEFAULT_INTERVAL`].
    pub fn new(registry: Arc<R>) -> Self {
        Self::with_interval(registry, DEFAULT_INTERVAL)
    }

    /// Creates a pipeline admitting one request per `interval`.
    pub fn with_interval(registry: Arc<R>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// The registry this pipeline reads from.
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Fetches every image of `repositories` that passes `filters`, newest first.
    ///
    /// Images with equal creation times are ordered by repository, then tag.
    pub async fn fetch_images(&self, repositories: &[String], filters: &[Filter]) -> Vec<Image> {
        let limiter = Arc::new(RateLimiter::new(self.interval));
        self.run(repositories.to_vec(), filters, &limiter).await
    }

    /// Like [`fetch_images`](Self::fetch_images), but per repository the `keep`
    /// most recent surviving images are withheld.
    ///
    /// Each repository runs through its own pipeline, one after another, so
    /// "most recent" is never judged across repositories. The result is the
    /// concatenation of each repository's remainder in the order given.
    pub async fn fetch_images_excluding_latest_per_repo(
        &self,
        repositories: &[String],
        filters: &[Filter],
        keep: NonZeroUsize,
    ) -> Vec<Image> {
        let limiter = Arc::new(RateLimiter::new(self.interval));
        let mut candidates = Vec::new();

        for repository in repositories {
            let images = self.run(vec![repository.clone()], filters, &limiter).await;
            let found = images.len();
            let before = candidates.len();
            candidates.extend(images.into_iter().skip(keep.get()));
            debug!(
                repository = %repository,
                found,
                kept = found.min(keep.get()),
                candidates = candidates.len() - before,
                "excluded latest images"
            );
        }

        candidates
    }

    async fn run(
        &self,
        repositories: Vec<String>,
        filters: &[Filter],
        limiter: &Arc<RateLimiter>,
    ) -> Vec<Image> {
        let tag_sets = discover_tags(
            Arc::clone(&self.registry),
            repositories,
            Arc::clone(limiter),
        );
        let images = fetch_metadata(Arc::clone(&self.registry), tag_sets, Arc::clone(limiter));
        collect(images, filters).await
    }
}

/// Spawns one tag-listing task per repository, each admitted by `limiter`.
fn discover_tags<R: RegistryApi + ?Sized + 'static>(
    registry: Arc<R>,
    repositories: Vec<String>,
    limiter: Arc<RateLimiter>,
) -> UnboundedReceiver<RepositoryTagSet> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for repository in repositories {
            limiter.acquire().await;
            let registry = Arc::clone(&registry);
            let tx = tx.clone();
            tokio::spawn(async move {
                match registry.list_tags(&repository).await {
                    Ok(tags) => {
                        debug!(repository = %repository, tags = tags.len(), "discovered tags");
                        let _ = tx.send(RepositoryTagSet { repository, tags });
                    }
                    Err(e) => {
                        warn!(repository = %repository, error = %e, "unable to list tags");
                    }
                }
            });
        }
    });

    rx
}

/// Spawns one metadata task per discovered tag as tag sets arrive.
fn fetch_metadata<R: RegistryApi + ?Sized + 'static>(
    registry: Arc<R>,
    mut tag_sets: UnboundedReceiver<RepositoryTagSet>,
    limiter: Arc<RateLimiter>,
) -> UnboundedReceiver<Image> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(tag_set) = tag_sets.recv().await {
            for tag in tag_set.tags {
                limiter.acquire().await;
                let registry = Arc::clone(&registry);
                let repository = tag_set.repository.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match registry.get_image_metadata(&repository, &tag).await {
                        Ok(image) => {
                            let _ = tx.send(image);
                        }
                        Err(e) => {
                            warn!(
                                repository = %repository,
                                tag = %tag,
                                error = %e,
                                "unable to get image"
                            );
                        }
                    }
                });
            }
        }
    });

    rx
}

/// Drains `images` until every fetch task is done, keeping filter survivors.
async fn collect(mut images: UnboundedReceiver<Image>, filters: &[Filter]) -> Vec<Image> {
    let mut received = 0usize;
    let mut survivors = Vec::new();

    while let Some(image) = images.recv().await {
        received += 1;
        if passes(&image, filters) {
            survivors.push(image);
        }
    }

    survivors.sort_by(Image::cmp_newest_first);
    debug!(received, survived = survivors.len(), "collected images");
    survivors
}
