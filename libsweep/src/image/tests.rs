use super::*;
use chrono::TimeZone;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
}

#[test]
fn test_accessors() {
    let image = Image::new("webserver", "rc2", "sha256:abc", at(3));
    assert_eq!(image.repository(), "webserver");
    assert_eq!(image.tag(), "rc2");
    assert_eq!(image.content_digest(), "sha256:abc");
    assert_eq!(image.created_at(), at(3));
}

#[test]
fn test_reference_and_display() {
    let image = Image::new("team/webserver", "devbuild-4", "sha256:abc", at(1));
    assert_eq!(image.reference(), "team/webserver:devbuild-4");
    assert_eq!(image.to_string(), "team/webserver:devbuild-4");
}

#[test]
fn test_newer_sorts_first() {
    let old = Image::new("web", "old", "sha256:1", at(1));
    let new = Image::new("web", "new", "sha256:2", at(2));
    assert_eq!(Image::cmp_newest_first(&new, &old), Ordering::Less);
    assert_eq!(Image::cmp_newest_first(&old, &new), Ordering::Greater);
}

#[test]
fn test_equal_timestamps_break_ties_by_repository_then_tag() {
    let mut images = vec![
        Image::new("web", "b", "sha256:1", at(1)),
        Image::new("api", "z", "sha256:2", at(1)),
        Image::new("web", "a", "sha256:3", at(1)),
    ];
    images.sort_by(Image::cmp_newest_first);

    let refs: Vec<String> = images.iter().map(Image::reference).collect();
    assert_eq!(refs, vec!["api:z", "web:a", "web:b"]);
}

#[test]
fn test_serializes_all_fields() {
    let image = Image::new("webserver", "rc3", "sha256:abc", at(4));
    let json = serde_json::to_value(&image).unwrap();
    assert_eq!(json["repository"], "webserver");
    assert_eq!(json["tag"], "rc3");
    assert_eq!(json["content_digest"], "sha256:abc");
    assert_eq!(json["created_at"], "2024-05-04T12:00:00Z");
}
