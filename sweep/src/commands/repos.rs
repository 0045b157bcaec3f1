use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, Formattable, OutputFormat};
use libsweep::{RateLimiter, RegistryApi};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Repository name with its tag count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryItem {
    pub name: String,
    /// `None` when the tag list could not be fetched
    pub tag_count: Option<usize>,
}

impl Formattable for RepositoryItem {
    fn format_pretty(&self) -> String {
        let count = self
            .tag_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        format!("{:40} {:>6}", self.name, count)
    }
}

/// List every repository with its tag count
///
/// Tag lists are fetched concurrently, one request started per `interval`.
pub async fn list_repository_items<R: RegistryApi + ?Sized + 'static>(
    registry: Arc<R>,
    interval: Duration,
) -> libsweep::Result<Vec<RepositoryItem>> {
    let names = registry.list_repositories().await?;
    let limiter = RateLimiter::new(interval);

    let mut handles = Vec::with_capacity(names.len());
    for name in names {
        limiter.acquire().await;
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            let tag_count = match registry.list_tags(&name).await {
                Ok(tags) => Some(tags.len()),
                Err(e) => {
                    warn!(repository = %name, error = %e, "unable to list tags");
                    None
                }
            };
            RepositoryItem { name, tag_count }
        }));
    }

    let mut items = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(item) => items.push(item),
            Err(e) => warn!(error = %e, "tag count task failed"),
        }
    }
    Ok(items)
}

/// Handle the repos command
pub async fn handle_repos(ctx: &AppContext, output: Option<OutputFormat>) -> Result<(), String> {
    let output = output.unwrap_or(ctx.config.output.format);
    let registry = Arc::new(super::connect(ctx).await?);

    format::print(ctx, VerbosityLevel::Verbose, "Listing repositories...");
    let items = list_repository_items(registry, ctx.config.throttle.interval())
        .await
        .map_err(|e| format!("Failed to list repositories: {}", e))?;

    if items.is_empty() && output == OutputFormat::Pretty {
        println!("No repositories found.");
        return Ok(());
    }

    println!("{}", format::format_output_vec(&items, output)?);
    Ok(())
}

#[cfg(test)]
#[path = "repos_tests.rs"]
mod tests;
