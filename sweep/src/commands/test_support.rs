//! In-memory registry for command tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use libsweep::{Image, RegistryApi, Result, SweepError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeRegistry {
    repositories: BTreeMap<String, Vec<Image>>,
    undeletable: HashSet<String>,
    deleted: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn with_image(mut self, repository: &str, tag: &str, digest: &str, day: u32) -> Self {
        self.repositories
            .entry(repository.to_string())
            .or_default()
            .push(Image::new(repository, tag, digest, day_of_jan(day)));
        self
    }

    pub fn with_undeletable(mut self, digest: &str) -> Self {
        self.undeletable.insert(digest.to_string());
        self
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

pub fn day_of_jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

#[async_trait]
impl RegistryApi for FakeRegistry {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        Ok(self.repositories.keys().cloned().collect())
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        self.repositories
            .get(repository)
            .map(|images| images.iter().map(|i| i.tag().to_string()).collect())
            .ok_or_else(|| SweepError::not_found("repository", repository))
    }

    async fn get_image_metadata(&self, repository: &str, tag: &str) -> Result<Image> {
        self.repositories
            .get(repository)
            .and_then(|images| images.iter().find(|i| i.tag() == tag))
            .cloned()
            .ok_or_else(|| SweepError::not_found("tag", tag))
    }

    async fn delete_image(&self, image: &Image) -> Result<()> {
        if self.undeletable.contains(image.content_digest()) {
            return Err(SweepError::registry(
                405,
                vec!["UNSUPPORTED: The operation is unsupported.".to_string()],
            ));
        }
        self.deleted
            .lock()
            .unwrap()
            .push(image.content_digest().to_string());
        Ok(())
    }
}
