use super::{confirm_deletion, delete_images, fetch_with_progress, finish_deletion, print_images};
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use libsweep::Filter;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Arguments of `sweep images`
#[derive(Args, Debug, Clone, Default)]
pub struct ImagesArgs {
    /// Repository to scan (repeatable)
    #[arg(short, long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Only images created before this date (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE")]
    pub older_than: Option<NaiveDate>,

    /// Only tags containing this text
    #[arg(long, value_name = "TEXT")]
    pub tag_contains: Option<String>,

    /// Skip tags containing this text
    #[arg(long, value_name = "TEXT")]
    pub tag_exclude: Option<String>,

    /// Keep the N most recent matching images of every repository
    #[arg(long, value_name = "N")]
    pub exclude_latest: Option<NonZeroUsize>,

    /// Delete the listed images after confirmation
    #[arg(long)]
    pub delete: bool,

    /// Do not ask for confirmation before deleting
    #[arg(short, long, requires = "delete")]
    pub yes: bool,

    /// Output format: pretty, json, yaml
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Filter chain for the given arguments, in flag order
pub fn build_filters(args: &ImagesArgs) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(date) = args.older_than {
        let cutoff = date.and_time(NaiveTime::MIN).and_utc();
        filters.push(Filter::CreatedBefore(cutoff));
    }
    if let Some(text) = args.tag_contains.as_deref().filter(|t| !t.is_empty()) {
        filters.push(Filter::TagContains(text.to_string()));
    }
    if let Some(text) = args.tag_exclude.as_deref().filter(|t| !t.is_empty()) {
        filters.push(Filter::TagExcludes(text.to_string()));
    }

    filters
}

/// Handle the images command
pub async fn handle_images(ctx: &AppContext, args: &ImagesArgs) -> Result<(), String> {
    if args.repos.is_empty() {
        return Err("You must specify at least one repository (--repo)".to_string());
    }

    let output = args.format.unwrap_or(ctx.config.output.format);
    let filters = build_filters(args);
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Using {} filters: {:?}", filters.len(), filters),
    );

    let registry = Arc::new(super::connect(ctx).await?);
    let pipeline = super::pipeline(ctx, registry);
    let images =
        fetch_with_progress(ctx, &pipeline, &args.repos, &filters, args.exclude_latest).await;

    if images.is_empty() && output == OutputFormat::Pretty {
        println!("No images found.");
        return Ok(());
    }
    print_images(&images, output)?;

    if !args.delete || images.is_empty() {
        return Ok(());
    }
    if !args.yes && !confirm_deletion(images.len())? {
        println!("Aborted.");
        return Ok(());
    }

    let report = delete_images(ctx, pipeline.registry().as_ref(), &images).await;
    finish_deletion(&report, output)
}

#[cfg(test)]
#[path = "images_tests.rs"]
mod tests;
