//! 注册表存储集成测试
//!
//! 覆盖格式不变量、更新隔离、元数据保留、拒绝非法更新以及时间戳单调性。

use medlingo::core::{SnapshotSource, VersionSnapshot};
use medlingo::models::ModelRole;
use medlingo::storage::{validate_version, RegistryError, RegistryStore};
use std::path::PathBuf;
use tempfile::TempDir;

const INITIAL: &str = r#"{
  "embedding_model": "v1.0.0",
  "emergency_classifier": "v1.0.0",
  "translation_model": "v1.0.0",
  "last_updated": "2024-01-01T00:00:00Z",
  "metadata": {
    "embedding_model": {
      "dimension": 768,
      "base": "test-model"
    },
    "retired_model": {
      "notes": "kept for audit"
    }
  }
}
"#;

fn setup() -> (TempDir, PathBuf, RegistryStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.json");
    std::fs::write(&path, INITIAL).unwrap();
    let store = RegistryStore::new(&path);
    (dir, path, store)
}

#[test]
fn test_read_missing_document() {
    let dir = TempDir::new().unwrap();
    let store = RegistryStore::new(dir.path().join("registry.json"));
    assert!(matches!(store.read(), Err(RegistryError::NotFound(_))));
}

#[test]
fn test_read_corrupt_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.json");
    let store = RegistryStore::new(&path);

    for content in ["", "{", "[]", r#"{"embedding_model": "1.0"}"#] {
        std::fs::write(&path, content).unwrap();
        assert!(
            matches!(store.read(), Err(RegistryError::CorruptDocument { .. })),
            "content {:?} should be corrupt",
            content
        );
    }
}

#[test]
fn test_every_entry_matches_version_format() {
    let (_dir, _path, store) = setup();
    store.update_entry("translation_model", "v3.14.15").unwrap();

    let document = store.read().unwrap();
    assert!(document.entries.values().all(|v| validate_version(v)));
}

#[test]
fn test_update_is_isolated() {
    let (_dir, _path, store) = setup();
    let before = store.read().unwrap();

    let after = store.update_entry("embedding_model", "v1.1.0").unwrap();

    assert_eq!(after.version("embedding_model"), Some("v1.1.0"));
    assert_eq!(after.version("emergency_classifier"), Some("v1.0.0"));
    assert_eq!(after.version("translation_model"), Some("v1.0.0"));
    assert_eq!(after.metadata_json(), before.metadata_json());
    assert_ne!(after.last_updated, before.last_updated);

    // 返回值与磁盘内容一致
    assert_eq!(store.read().unwrap(), after);
}

#[test]
fn test_metadata_survives_unrelated_update() {
    let (_dir, _path, store) = setup();
    store.update_entry("translation_model", "v1.0.1").unwrap();

    let document = store.read().unwrap();
    let embedding = document.model_metadata("embedding_model").unwrap();
    assert_eq!(embedding["dimension"], 768);
    assert_eq!(embedding["base"], "test-model");
    // 没有对应 entries 的元数据也保留
    assert_eq!(
        document.model_metadata("retired_model").unwrap()["notes"],
        "kept for audit"
    );
}

#[test]
fn test_metadata_bytes_survive_update() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.json");
    let metadata = r#"{"seed":123456789012345678901234567890,"lr":1e-5,"scale":2.50}"#;
    std::fs::write(
        &path,
        format!(r#"{{"embedding_model": "v1.0.0", "metadata": {}}}"#, metadata),
    )
    .unwrap();
    let store = RegistryStore::new(&path);

    store.update_entry("embedding_model", "v1.0.1").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains(metadata), "metadata rewritten: {}", content);
    assert_eq!(store.read().unwrap().metadata_json(), Some(metadata));
}

#[test]
fn test_update_keeps_every_other_byte() {
    let (_dir, path, store) = setup();
    store.update_entry("translation_model", "v1.0.1").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let stamp = store.read().unwrap().last_updated.unwrap();
    let expected = INITIAL
        .replace(
            r#""translation_model": "v1.0.0""#,
            r#""translation_model": "v1.0.1""#,
        )
        .replace("2024-01-01T00:00:00Z", &stamp);
    assert_eq!(content, expected);
}

#[cfg(unix)]
#[test]
fn test_update_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path, store) = setup();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

    store.update_entry("embedding_model", "v1.0.1").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
}

#[cfg(unix)]
#[test]
fn test_provisioned_file_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.json");
    let store = RegistryStore::new(&path).with_allow_create(true);

    store.provision(&ModelRole::default_ids()).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn test_unknown_model_rejected_without_change() {
    let (_dir, path, store) = setup();

    let err = store.update_entry("nonexistent_model", "v1.0.0").unwrap_err();

    match err {
        RegistryError::UnknownModel { model, available } => {
            assert_eq!(model, "nonexistent_model");
            assert_eq!(
                available,
                vec!["embedding_model", "emergency_classifier", "translation_model"]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), INITIAL);
}

#[test]
fn test_invalid_version_rejected_without_change() {
    let (_dir, path, store) = setup();

    let err = store.update_entry("embedding_model", "1.0.0").unwrap_err();

    assert!(matches!(err, RegistryError::InvalidVersion(ref v) if v == "1.0.0"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), INITIAL);
}

#[test]
fn test_timestamps_do_not_decrease() {
    let (_dir, _path, store) = setup();

    let first = store.update_entry("embedding_model", "v1.0.1").unwrap();
    let second = store.update_entry("embedding_model", "v1.0.2").unwrap();

    let parse = |s: Option<String>| {
        chrono::DateTime::parse_from_rfc3339(&s.unwrap()).unwrap()
    };
    assert!(parse(first.last_updated) <= parse(second.last_updated));
}

#[test]
fn test_update_leaves_no_temporary_files() {
    let (dir, _path, store) = setup();
    store.update_entry("embedding_model", "v2.0.0").unwrap();

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files, vec![std::ffi::OsString::from("registry.json")]);
}

#[test]
fn test_replace_entry_reports_previous_version() {
    let (_dir, _path, store) = setup();
    let update = store.replace_entry("emergency_classifier", "v1.2.0").unwrap();
    assert_eq!(update.previous, "v1.0.0");
    assert_eq!(update.current, "v1.2.0");
}

#[test]
fn test_provision_only_when_allowed_and_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("registry.json");

    let store = RegistryStore::new(&path);
    assert!(matches!(
        store.provision(&ModelRole::default_ids()),
        Err(RegistryError::ProvisioningDisabled)
    ));

    let store = store.with_allow_create(true);
    let document = store.provision(&ModelRole::default_ids()).unwrap();
    assert_eq!(document.version("translation_model"), Some("v1.0.0"));
    assert!(document.last_updated.is_some());
    assert_eq!(store.read().unwrap(), document);

    assert!(matches!(
        store.provision(&ModelRole::default_ids()),
        Err(RegistryError::AlreadyExists(_))
    ));
}

#[test]
fn test_missing_document_startup_fallback() {
    let dir = TempDir::new().unwrap();
    let store = RegistryStore::new(dir.path().join("registry.json"));

    let snapshot = VersionSnapshot::load_or_default(&store).unwrap();

    assert_eq!(snapshot.source, SnapshotSource::Defaults);
    let expected: Vec<(String, String)> = [
        ("embedding_model", "v1.0.0"),
        ("emergency_classifier", "v1.0.0"),
        ("translation_model", "v1.0.0"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(snapshot.versions.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_reads_reflect_external_changes() {
    let (_dir, path, store) = setup();
    assert_eq!(store.read().unwrap().version("embedding_model"), Some("v1.0.0"));

    std::fs::write(&path, r#"{"embedding_model": "v9.0.0"}"#).unwrap();
    assert_eq!(store.read().unwrap().version("embedding_model"), Some("v9.0.0"));
}
