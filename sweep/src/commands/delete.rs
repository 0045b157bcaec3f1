use super::{delete_images, fetch_with_progress, finish_deletion, print_images};
use crate::context::AppContext;
use crate::format::{self, OutputFormat};
use clap::Args;
use libsweep::{Filter, Image, ImageRef, Pipeline, RegistryApi};
use std::collections::HashSet;
use std::io::{self, BufRead};
use std::sync::Arc;

/// Arguments of `sweep delete`
#[derive(Args, Debug, Clone, Default)]
pub struct DeleteArgs {
    /// Delete the resolved images; without it the command only lists them
    #[arg(short, long)]
    pub yes: bool,

    /// Output format: pretty, json, yaml
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Read `repository[:tag]` lines, skipping blanks and `#` comments
///
/// Repeated references are kept once, in first-seen order.
pub fn read_references<R: BufRead>(reader: R) -> Result<Vec<ImageRef>, String> {
    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let reference: ImageRef = line
            .parse()
            .map_err(|e| format!("Line {}: {}", index + 1, e))?;
        if seen.insert(reference.clone()) {
            references.push(reference);
        }
    }

    Ok(references)
}

/// Repositories named by `references`, in first-seen order
pub fn repositories_of(references: &[ImageRef]) -> Vec<String> {
    let mut seen = HashSet::new();
    references
        .iter()
        .map(ImageRef::repository)
        .filter(|repo| seen.insert(*repo))
        .map(str::to_string)
        .collect()
}

/// Resolve references through the pipeline
///
/// Returns the resolved images and the references the registry did not yield.
pub async fn resolve_references<R: RegistryApi + ?Sized + 'static>(
    ctx: &AppContext,
    pipeline: &Pipeline<R>,
    references: &[ImageRef],
) -> (Vec<Image>, Vec<ImageRef>) {
    let wanted: HashSet<ImageRef> = references.iter().cloned().collect();
    let filter = Filter::custom(move |image| {
        wanted.contains(&ImageRef::new(image.repository(), image.tag()))
    });

    let repositories = repositories_of(references);
    let images = fetch_with_progress(ctx, pipeline, &repositories, &[filter], None).await;

    let found: HashSet<ImageRef> = images
        .iter()
        .map(|image| ImageRef::new(image.repository(), image.tag()))
        .collect();
    let missing = references
        .iter()
        .filter(|reference| !found.contains(*reference))
        .cloned()
        .collect();

    (images, missing)
}

/// Handle the delete command
pub async fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> Result<(), String> {
    let output = args.format.unwrap_or(ctx.config.output.format);
    let references = read_references(io::stdin().lock())?;
    if references.is_empty() {
        format::warning(ctx, "No image references on stdin");
        return Ok(());
    }

    let registry = Arc::new(super::connect(ctx).await?);
    let pipeline = super::pipeline(ctx, registry);
    let (images, missing) = resolve_references(ctx, &pipeline, &references).await;

    for reference in &missing {
        format::warning(ctx, &format!("Image {} not found", reference));
    }
    if images.is_empty() {
        return Err("None of the given images could be resolved".to_string());
    }

    print_images(&images, output)?;
    if !args.yes {
        eprintln!(
            "Would delete {} images; re-run with --yes to delete them",
            images.len()
        );
        return Ok(());
    }

    let report = delete_images(ctx, pipeline.registry().as_ref(), &images).await;
    finish_deletion(&report, output)
}

#[cfg(test)]
#[path = "delete_tests.rs"]
mod tests;
