use super::*;
use chrono::TimeZone;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn image(tag: &str, day: u32) -> Image {
    Image::new("webserver", tag, format!("sha256:{tag}"), at(day))
}

#[test]
fn test_created_before_is_strict() {
    let filter = Filter::CreatedBefore(at(10));
    assert!(filter.evaluate(&image("old", 9)));
    assert!(!filter.evaluate(&image("same", 10)));
    assert!(!filter.evaluate(&image("new", 11)));
}

#[test]
fn test_tag_contains() {
    let filter = Filter::TagContains("dev".to_string());
    assert!(filter.evaluate(&image("devbuild-1", 1)));
    assert!(filter.evaluate(&image("nightly-dev", 1)));
    assert!(!filter.evaluate(&image("rc2", 1)));
}

#[test]
fn test_tag_excludes() {
    let filter = Filter::TagExcludes("rc".to_string());
    assert!(filter.evaluate(&image("devbuild-1", 1)));
    assert!(!filter.evaluate(&image("rc3", 1)));
}

#[test]
fn test_custom_filter() {
    let filter = Filter::custom(|image| image.tag().ends_with("-2"));
    assert!(filter.evaluate(&image("devbuild-2", 1)));
    assert!(!filter.evaluate(&image("devbuild-3", 1)));
}

#[test]
fn test_empty_chain_accepts_everything() {
    assert!(passes(&image("anything", 1), &[]));
}

#[test]
fn test_chain_is_logical_and() {
    let chain = vec![
        Filter::TagContains("dev".to_string()),
        Filter::CreatedBefore(at(5)),
    ];
    assert!(passes(&image("devbuild-1", 1), &chain));
    assert!(!passes(&image("devbuild-9", 9), &chain));
    assert!(!passes(&image("rc2", 1), &chain));
}

#[test]
fn test_chain_matches_set_definition() {
    let images: Vec<Image> = (1..=9)
        .map(|day| {
            let tag = if day % 2 == 0 {
                format!("rc{day}")
            } else {
                format!("devbuild-{day}")
            };
            image(&tag, day)
        })
        .collect();
    let chain = vec![
        Filter::TagExcludes("rc".to_string()),
        Filter::CreatedBefore(at(7)),
    ];

    let survivors: Vec<&Image> = images.iter().filter(|i| passes(i, &chain)).collect();
    let expected: Vec<&Image> = images
        .iter()
        .filter(|i| chain.iter().all(|f| f.evaluate(i)))
        .collect();

    assert_eq!(survivors, expected);
    let tags: Vec<&str> = survivors.iter().map(|i| i.tag()).collect();
    assert_eq!(tags, vec!["devbuild-1", "devbuild-3", "devbuild-5"]);
}

#[test]
fn test_chain_order_does_not_change_result() {
    let forward = vec![
        Filter::TagContains("dev".to_string()),
        Filter::TagExcludes("-2".to_string()),
    ];
    let reversed: Vec<Filter> = forward.iter().rev().cloned().collect();

    for candidate in [image("devbuild-1", 1), image("devbuild-2", 1), image("rc3", 1)] {
        assert_eq!(passes(&candidate, &forward), passes(&candidate, &reversed));
    }
}

#[test]
fn test_debug_hides_closure() {
    let filter = Filter::custom(|_| true);
    assert_eq!(format!("{filter:?}"), "Custom(..)");
    assert_eq!(
        format!("{:?}", Filter::TagContains("dev".into())),
        "TagContains(\"dev\")"
    );
}
