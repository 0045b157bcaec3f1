use super::*;
use chrono::TimeZone;

const OCI_MANIFEST: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.oci.image.manifest.v1+json",
    "config": {
        "mediaType": "application/vnd.oci.image.config.v1+json",
        "size": 7023,
        "digest": "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7"
    },
    "layers": [
        {
            "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip",
            "size": 32654,
            "digest": "sha256:9834876dcfb05cb167a5c24953eba58c4ac89b1adf57f28f2f9d09af107ee8f0"
        }
    ]
}"#;

const DOCKER_LIST: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.docker.distribution.manifest.list.v2+json",
    "manifests": [
        {
            "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
            "size": 528,
            "digest": "sha256:1111111111111111111111111111111111111111111111111111111111111111",
            "platform": { "architecture": "amd64", "os": "linux" }
        },
        {
            "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
            "size": 528,
            "digest": "sha256:2222222222222222222222222222222222222222222222222222222222222222",
            "platform": { "architecture": "arm64", "os": "linux" }
        }
    ]
}"#;

const SCHEMA1: &str = r#"{
    "schemaVersion": 1,
    "name": "webserver",
    "tag": "rc2",
    "architecture": "amd64",
    "history": [
        { "v1Compatibility": "{\"id\":\"abc\",\"created\":\"2016-06-02T21:43:31.291506236Z\"}" },
        { "v1Compatibility": "{\"id\":\"def\",\"created\":\"2016-05-01T00:00:00Z\"}" }
    ]
}"#;

#[test]
fn test_parse_oci_manifest() {
    let manifest = Manifest::from_bytes(OCI_MANIFEST.as_bytes()).unwrap();
    assert_eq!(manifest.kind(), "manifest");
    assert_eq!(
        manifest.config_digest().as_deref(),
        Some("sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7")
    );
    assert!(manifest.child_digests().is_empty());
}

#[test]
fn test_parse_manifest_list() {
    let manifest = Manifest::from_bytes(DOCKER_LIST.as_bytes()).unwrap();
    assert_eq!(manifest.kind(), "index");
    assert_eq!(manifest.config_digest(), None);
    assert_eq!(manifest.child_digests().len(), 2);
}

#[test]
fn test_parse_schema1_uses_top_history_entry() {
    let manifest = Manifest::from_bytes(SCHEMA1.as_bytes()).unwrap();
    let Manifest::Schema1(schema1) = manifest else {
        panic!("expected schema 1 manifest");
    };
    assert_eq!(schema1.name, "webserver");
    assert_eq!(schema1.tag, "rc2");

    let created = schema1.created().unwrap();
    assert_eq!(
        created.date_naive(),
        chrono::NaiveDate::from_ymd_opt(2016, 6, 2).unwrap()
    );
}

#[test]
fn test_schema1_without_history_fails() {
    let manifest = Manifest::from_bytes(br#"{"schemaVersion":1,"name":"x","tag":"y"}"#).unwrap();
    let Manifest::Schema1(schema1) = manifest else {
        panic!("expected schema 1 manifest");
    };
    assert!(matches!(
        schema1.created(),
        Err(SweepError::Validation { .. })
    ));
}

#[test]
fn test_parse_unknown_document_fails() {
    let result = Manifest::from_bytes(br#"{"schemaVersion":2}"#);
    assert!(result.is_err());
}

#[test]
fn test_parse_invalid_json_fails() {
    assert!(Manifest::from_bytes(b"not json").is_err());
}

#[test]
fn test_created_from_config() {
    let config = br#"{"architecture":"amd64","os":"linux","created":"2024-03-05T10:20:30Z"}"#;
    let created = created_from_config(config).unwrap();
    assert_eq!(created, Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap());
}

#[test]
fn test_created_from_config_with_offset_normalizes_to_utc() {
    let config = br#"{"created":"2024-03-05T12:20:30+02:00"}"#;
    let created = created_from_config(config).unwrap();
    assert_eq!(created, Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap());
}

#[test]
fn test_created_from_config_missing_field() {
    let err = created_from_config(br#"{"os":"linux"}"#).unwrap_err();
    assert!(err.to_string().contains("no created timestamp"));
}

#[test]
fn test_created_from_config_bad_timestamp() {
    assert!(created_from_config(br#"{"created":"yesterday"}"#).is_err());
}
