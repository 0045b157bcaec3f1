use super::*;
use crate::commands::test_support::FakeRegistry;

#[test]
fn test_repository_item_pretty() {
    let item = RepositoryItem {
        name: "webserver".to_string(),
        tag_count: Some(7),
    };
    let line = item.format_pretty();
    assert!(line.starts_with("webserver "));
    assert!(line.ends_with("     7"));
}

#[test]
fn test_repository_item_unknown_count() {
    let item = RepositoryItem {
        name: "api".to_string(),
        tag_count: None,
    };
    assert!(item.format_pretty().ends_with('-'));

    let json = serde_json::to_value(&item).unwrap();
    assert!(json["tag_count"].is_null());
}

#[tokio::test]
async fn test_list_repository_items_counts_tags() {
    let registry = FakeRegistry::default()
        .with_image("api", "v1", "sha256:1", 1)
        .with_image("api", "v2", "sha256:2", 2)
        .with_image("webserver", "rc2", "sha256:3", 3);

    let items = list_repository_items(Arc::new(registry), Duration::from_millis(1))
        .await
        .unwrap();

    assert_eq!(
        items,
        vec![
            RepositoryItem {
                name: "api".to_string(),
                tag_count: Some(2)
            },
            RepositoryItem {
                name: "webserver".to_string(),
                tag_count: Some(1)
            },
        ]
    );
}

#[tokio::test]
async fn test_list_repository_items_empty_registry() {
    let items = list_repository_items(Arc::new(FakeRegistry::default()), Duration::from_millis(1))
        .await
        .unwrap();
    assert!(items.is_empty());
}
