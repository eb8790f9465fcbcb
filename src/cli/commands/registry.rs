//! 注册表维护命令
//!
//! 这些命令面向操作者，任何注册表错误都直接返回，由调用方以非零状态退出。

use crate::core::registry::{publish_trained_version, record_training_run};
use crate::models::ModelRole;
use crate::storage::{BumpKind, EntryUpdate, RegistryStore};
use crate::Result;
use std::path::Path;

/// 打印当前注册表
pub fn show(store: &RegistryStore) -> Result<()> {
    let document = store.read()?;
    let content = document
        .to_pretty_json()
        .map_err(crate::api::error::ApiError::Internal)?;
    print!("{}", content);
    Ok(())
}

/// 创建初始注册表
pub fn init(store: &RegistryStore) -> Result<()> {
    let document = store.provision(&ModelRole::default_ids())?;
    println!(
        "Created registry at {} with {} models",
        store.path().display(),
        document.entries.len()
    );
    Ok(())
}

/// 设置模型版本
///
/// 不以 `v` 开头的版本号会先告警再自动补上前缀。
pub fn update(store: &RegistryStore, model: &str, version: &str) -> Result<EntryUpdate> {
    let version = normalize_version_arg(version);
    let update = store.replace_entry(model, &version)?;
    print_update(store, &update);
    Ok(update)
}

/// 按升级策略提升版本
pub fn bump(store: &RegistryStore, model: &str, kind: BumpKind) -> Result<()> {
    let update = publish_trained_version(store, model, kind)?;
    print_update(store, &update);
    Ok(())
}

/// 登记训练结果
///
/// 注册表写回失败时仍返回成功（训练产物已存在），但会把错误打印给操作者。
pub fn record_training(
    store: &RegistryStore,
    model: &str,
    artifact: &Path,
    kind: BumpKind,
) -> Result<()> {
    let outcome = record_training_run(store, artifact, model, kind)?;
    match &outcome.registry {
        Ok(update) => print_update(store, update),
        Err(e) => eprintln!(
            "Warning: artifact saved at {} but its version was not recorded: {}",
            outcome.artifact.display(),
            e
        ),
    }
    Ok(())
}

/// 补全缺失的 `v` 前缀
pub fn normalize_version_arg(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        tracing::warn!(
            version,
            "Version should start with 'v' (e.g. v1.0.0), prefixing it"
        );
        format!("v{}", version)
    }
}

fn print_update(store: &RegistryStore, update: &EntryUpdate) {
    println!(
        "Updated {}: {} -> {}",
        update.model_id, update.previous, update.current
    );
    println!("Registry saved to {}", store.path().display());
}
