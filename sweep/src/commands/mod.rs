use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, Formattable};
use libsweep::format::{format_created, format_timestamp, short_digest};
use libsweep::{Filter, Image, Pipeline, RateLimiter, Registry, RegistryApi};
use serde::Serialize;
use std::collections::HashSet;
use std::io;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// `sweep delete` handler
pub mod delete;

/// `sweep images` handler
pub mod images;

/// `sweep repos` handler
pub mod repos;

/// Version command handlers
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

/// Connect to the configured registry, failing if `/v2/` does not answer
pub async fn connect(ctx: &AppContext) -> Result<Registry, String> {
    let url = &ctx.config.registry.url;
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Connecting to registry {}...", url),
    );

    Registry::connect(url, ctx.config.client_config())
        .await
        .map_err(|e| format!("Failed to connect to registry {}: {}", url, e))
}

/// Pipeline over `registry` paced by the configured throttle
pub fn pipeline<R: RegistryApi + ?Sized + 'static>(
    ctx: &AppContext,
    registry: Arc<R>,
) -> Pipeline<R> {
    Pipeline::with_interval(registry, ctx.config.throttle.interval())
}

/// Run the pipeline behind a spinner
pub async fn fetch_with_progress<R: RegistryApi + ?Sized + 'static>(
    ctx: &AppContext,
    pipeline: &Pipeline<R>,
    repositories: &[String],
    filters: &[Filter],
    exclude_latest: Option<NonZeroUsize>,
) -> Vec<Image> {
    let formatter = format::create_formatter(ctx.config.output.color);
    let spinner = formatter.spinner(&format!(
        "Fetching images from {} repositories...",
        repositories.len()
    ));

    let images = match exclude_latest {
        Some(keep) => {
            pipeline
                .fetch_images_excluding_latest_per_repo(repositories, filters, keep)
                .await
        }
        None => pipeline.fetch_images(repositories, filters).await,
    };

    formatter.finish_progress(spinner, &format!("Found {} images", images.len()));
    images
}

/// One image listing line: `created  digest  repository:tag`
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ImageLine<'a>(pub &'a Image);

impl Formattable for ImageLine<'_> {
    fn format_pretty(&self) -> String {
        format!(
            "{}  {}  {}",
            format_created(&self.0.created_at()),
            short_digest(self.0.content_digest()),
            self.0
        )
    }
}

/// Print images in the requested format
pub fn print_images(images: &[Image], output: format::OutputFormat) -> Result<(), String> {
    let lines: Vec<ImageLine<'_>> = images.iter().map(ImageLine).collect();
    println!("{}", format::format_output_vec(&lines, output)?);
    Ok(())
}

/// A deletion that the registry refused
#[derive(Debug, Clone, Serialize)]
pub struct FailedDeletion {
    pub reference: String,
    pub error: String,
}

/// Outcome of deleting a batch of images
#[derive(Debug, Default, Serialize)]
pub struct DeletionReport {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
}

impl DeletionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Formattable for DeletionReport {
    fn format_pretty(&self) -> String {
        let total = self.deleted.len() + self.failed.len();
        let mut output = format!("Deleted {} of {} images", self.deleted.len(), total);
        for failure in &self.failed {
            output.push_str(&format!("\n  {}: {}", failure.reference, failure.error));
        }
        output
    }
}

/// Delete each image by digest, one request per throttle interval
///
/// Tags of one repository sharing a digest go away with the first deletion of
/// that digest, so later images of the same repository and digest are counted
/// without a request. Manifests are per repository; the same digest elsewhere
/// is deleted separately.
pub async fn delete_images<R: RegistryApi + ?Sized>(
    ctx: &AppContext,
    registry: &R,
    images: &[Image],
) -> DeletionReport {
    let limiter = RateLimiter::new(ctx.config.throttle.interval());
    let mut removed_digests = HashSet::new();
    let mut report = DeletionReport::default();

    for image in images {
        let key = (
            image.repository().to_string(),
            image.content_digest().to_string(),
        );
        if removed_digests.contains(&key) {
            format::print(
                ctx,
                VerbosityLevel::Verbose,
                &format!("{} shares an already deleted digest", image),
            );
            report.deleted.push(image.reference());
            continue;
        }

        limiter.acquire().await;
        match registry.delete_image(image).await {
            Ok(()) => {
                format::success(
                    ctx,
                    &format!(
                        "Deleted {} (created {})",
                        image,
                        format_timestamp(&image.created_at())
                    ),
                );
                removed_digests.insert(key);
                report.deleted.push(image.reference());
            }
            Err(e) => {
                format::error(ctx, &format!("Failed to delete {}: {}", image, e));
                report.failed.push(FailedDeletion {
                    reference: image.reference(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

/// Ask on stdin whether `count` images should be deleted
pub fn confirm_deletion(count: usize) -> Result<bool, String> {
    format::confirm(
        &format!("Do you really want to delete these {} images?", count),
        &mut io::stdin().lock(),
        &mut io::stderr(),
    )
    .map_err(|e| format!("Failed to read confirmation: {}", e))
}

/// Print the report and turn failed deletions into an error
pub fn finish_deletion(report: &DeletionReport, output: format::OutputFormat) -> Result<(), String> {
    if output != format::OutputFormat::Pretty {
        println!("{}", format::format_output(report, output)?);
    } else {
        eprintln!("{}", report.format_pretty());
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} deletions failed", report.failed.len()))
    }
}
