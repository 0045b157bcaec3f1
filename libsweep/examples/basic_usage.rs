//! Lists images older than 30 days across every repository.
//!
//! Run with: cargo run --example basic_usage

use chrono::{Duration, Utc};
use libsweep::client::ClientConfig;
use libsweep::format::{format_created, short_digest};
use libsweep::{Filter, Pipeline, Registry, RegistryApi};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:5000".to_string());

    let registry = match Registry::connect(&url, ClientConfig::new()).await {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            eprintln!("  Make sure a registry is running at {}", url);
            eprintln!("  You can start one with: docker run -d -p 5000:5000 registry:2");
            return Ok(());
        }
    };

    let repos = registry.list_repositories().await?;
    println!("Scanning {} repositories...\n", repos.len());

    let cutoff = Utc::now() - Duration::days(30);
    let pipeline = Pipeline::new(Arc::new(registry));
    let images = pipeline
        .fetch_images(&repos, &[Filter::CreatedBefore(cutoff)])
        .await;

    for image in &images {
        println!(
            "{}  {}  {}",
            format_created(&image.created_at()),
            short_digest(image.content_digest()),
            image
        );
    }
    println!("\n{} images older than 30 days", images.len());

    Ok(())
}
