//! 注册表客户端协议
//!
//! 服务进程和训练流程与注册表交互的两条路径：
//! - 服务启动时读取版本快照，注册表缺失或损坏时告警并使用默认版本；
//! - 训练完成后按升级策略计算新版本并写回，写回失败不影响训练结果，
//!   但必须报告给操作者。

use crate::models::ModelRole;
use crate::storage::registry::{EntryUpdate, RegistryError, RegistryStore};
use crate::storage::version::BumpKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 注册表不可用时每个模型使用的版本
pub const FALLBACK_VERSION: &str = "v1.0.0";

const UNKNOWN: &str = "unknown";

/// 版本快照来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// 读自注册表文件
    Registry,
    /// 注册表不可用，使用默认值
    Defaults,
}

/// 服务启动时读取的版本快照
///
/// 快照在启动后不再变化，注册表的后续更新要到下次重启才可见。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSnapshot {
    /// 模型标识 -> 版本号
    pub versions: BTreeMap<String, String>,
    /// 注册表中的最近更新时间
    pub last_updated: Option<String>,
    /// 快照来源
    pub source: SnapshotSource,
}

impl VersionSnapshot {
    /// 所有默认模型均为 `v1.0.0`
    pub fn defaults() -> Self {
        Self {
            versions: ModelRole::ALL
                .iter()
                .map(|role| (role.id().to_string(), FALLBACK_VERSION.to_string()))
                .collect(),
            last_updated: None,
            source: SnapshotSource::Defaults,
        }
    }

    /// 读取注册表，缺失或损坏时回退到默认值
    ///
    /// 只有 `NotFound` 和 `CorruptDocument` 会被转换为告警，其余错误照常返回。
    pub fn load_or_default(store: &RegistryStore) -> Result<Self, RegistryError> {
        match store.read() {
            Ok(document) => {
                let snapshot = Self {
                    versions: document.entries,
                    last_updated: document.last_updated,
                    source: SnapshotSource::Registry,
                };
                for (model, version) in &snapshot.versions {
                    tracing::info!(model = %model, version = %version, "Model registry entry");
                }
                Ok(snapshot)
            }
            Err(e @ RegistryError::NotFound(_))
            | Err(e @ RegistryError::CorruptDocument { .. }) => {
                tracing::warn!(
                    error = %e,
                    fallback = FALLBACK_VERSION,
                    "Model registry unavailable, using default versions"
                );
                Ok(Self::defaults())
            }
            Err(e) => Err(e),
        }
    }

    /// 某个角色的版本号
    pub fn version(&self, role: ModelRole) -> Option<&str> {
        self.versions.get(role.id()).map(String::as_str)
    }

    /// `/versions` 接口使用的扁平映射
    ///
    /// 固定包含三个默认模型和 `last_updated`，缺失的值为 `unknown`；
    /// 注册表里的其他条目不对外报告。
    pub fn as_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = ModelRole::ALL
            .iter()
            .map(|role| {
                let version = self.version(*role).unwrap_or(UNKNOWN);
                (role.id().to_string(), version.to_string())
            })
            .collect();
        map.insert(
            "last_updated".to_string(),
            self.last_updated
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
        );
        map
    }
}

/// 基于注册表当前值升级版本并写回
pub fn publish_trained_version(
    store: &RegistryStore,
    model_id: &str,
    bump: BumpKind,
) -> Result<EntryUpdate, RegistryError> {
    let document = store.read()?;
    let current = document
        .version(model_id)
        .ok_or_else(|| RegistryError::UnknownModel {
            model: model_id.to_string(),
            available: document.model_ids(),
        })?;
    let next = bump.apply(current)?;
    store.replace_entry(model_id, &next)
}

/// 训练错误
#[derive(Debug, Error)]
pub enum TrainingError {
    /// 训练产物不存在
    #[error("Training artifact not found at {}", .0.display())]
    ArtifactMissing(PathBuf),
}

/// 一次训练运行的登记结果
#[derive(Debug)]
pub struct TrainingOutcome {
    /// 训练产物路径
    pub artifact: PathBuf,
    /// 注册表写回的结果；失败不影响训练本身
    pub registry: Result<EntryUpdate, RegistryError>,
}

impl TrainingOutcome {
    /// 版本是否已登记到注册表
    pub fn is_recorded(&self) -> bool {
        self.registry.is_ok()
    }
}

/// 训练完成后登记新版本
///
/// 只要产物存在，训练即视为成功；注册表写回失败会记录错误日志并放在
/// `TrainingOutcome::registry` 中交给调用方展示。
pub fn record_training_run(
    store: &RegistryStore,
    artifact: &Path,
    model_id: &str,
    bump: BumpKind,
) -> Result<TrainingOutcome, TrainingError> {
    if !artifact.exists() {
        return Err(TrainingError::ArtifactMissing(artifact.to_path_buf()));
    }

    let registry = publish_trained_version(store, model_id, bump);
    match &registry {
        Ok(update) => tracing::info!(
            model = model_id,
            version = %update.current,
            artifact = %artifact.display(),
            "Training run recorded"
        ),
        Err(e) => tracing::error!(
            model = model_id,
            artifact = %artifact.display(),
            error = %e,
            "Training artifact saved but registry update failed"
        ),
    }

    Ok(TrainingOutcome {
        artifact: artifact.to_path_buf(),
        registry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_registry(dir: &TempDir, content: &str) -> RegistryStore {
        let path = dir.path().join("registry.json");
        std::fs::write(&path, content).unwrap();
        RegistryStore::new(path)
    }

    #[test]
    fn test_missing_registry_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = RegistryStore::new(dir.path().join("registry.json"));

        let snapshot = VersionSnapshot::load_or_default(&store).unwrap();

        assert_eq!(snapshot.source, SnapshotSource::Defaults);
        assert_eq!(snapshot.versions.len(), 3);
        assert_eq!(snapshot.version(ModelRole::Embedding), Some("v1.0.0"));
        assert_eq!(snapshot.version(ModelRole::EmergencyClassifier), Some("v1.0.0"));
        assert_eq!(snapshot.version(ModelRole::Translation), Some("v1.0.0"));
    }

    #[test]
    fn test_corrupt_registry_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = write_registry(&dir, "{ not json");

        let snapshot = VersionSnapshot::load_or_default(&store).unwrap();
        assert_eq!(snapshot, VersionSnapshot::defaults());
    }

    #[test]
    fn test_snapshot_from_registry() {
        let dir = TempDir::new().unwrap();
        let store = write_registry(
            &dir,
            r#"{"embedding_model": "v1.3.0", "last_updated": "2024-01-01T00:00:00Z"}"#,
        );

        let snapshot = VersionSnapshot::load_or_default(&store).unwrap();
        assert_eq!(snapshot.source, SnapshotSource::Registry);
        assert_eq!(snapshot.version(ModelRole::Embedding), Some("v1.3.0"));
        assert_eq!(snapshot.version(ModelRole::Translation), None);
        assert_eq!(snapshot.as_map()["last_updated"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_as_map_reports_default_models_only() {
        let dir = TempDir::new().unwrap();
        let store = write_registry(
            &dir,
            r#"{"embedding_model": "v2.0.0", "speech_model": "v0.1.0"}"#,
        );

        let map = VersionSnapshot::load_or_default(&store).unwrap().as_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map["embedding_model"], "v2.0.0");
        assert_eq!(map["emergency_classifier"], "unknown");
        assert_eq!(map["translation_model"], "unknown");
        assert_eq!(map["last_updated"], "unknown");
        assert!(!map.contains_key("speech_model"));
    }

    #[test]
    fn test_as_map_marks_unknown_timestamp() {
        let map = VersionSnapshot::defaults().as_map();
        assert_eq!(map["last_updated"], "unknown");
        assert_eq!(map["translation_model"], "v1.0.0");
    }

    #[test]
    fn test_publish_trained_version_bumps_patch() {
        let dir = TempDir::new().unwrap();
        let store = write_registry(&dir, r#"{"embedding_model": "v1.0.9"}"#);

        let update = publish_trained_version(&store, "embedding_model", BumpKind::Patch).unwrap();
        assert_eq!(update.previous, "v1.0.9");
        assert_eq!(update.current, "v1.0.10");
        assert_eq!(store.read().unwrap().version("embedding_model"), Some("v1.0.10"));
    }

    #[test]
    fn test_training_run_survives_registry_failure() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("model_v2");
        std::fs::create_dir(&artifact).unwrap();
        let store = RegistryStore::new(dir.path().join("missing.json"));

        let outcome =
            record_training_run(&store, &artifact, "embedding_model", BumpKind::Minor).unwrap();
        assert!(!outcome.is_recorded());
        assert!(matches!(outcome.registry, Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_training_run_requires_artifact() {
        let dir = TempDir::new().unwrap();
        let store = write_registry(&dir, r#"{"embedding_model": "v1.0.0"}"#);

        let result = record_training_run(
            &store,
            &dir.path().join("nothing-here"),
            "embedding_model",
            BumpKind::Patch,
        );
        assert!(matches!(result, Err(TrainingError::ArtifactMissing(_))));
        assert_eq!(store.read().unwrap().version("embedding_model"), Some("v1.0.0"));
    }
}
