//! 模型版本注册表
//!
//! 以单个 JSON 文件持久化每个模型当前生效的版本号。每次读取都重新解析磁盘
//! 内容，不做内存缓存；写入先落到同目录的临时文件，再原子替换目标文件，
//! 并发读者只会看到完整的旧文档或完整的新文档。

use crate::config::Config;
use crate::storage::document::RegistryDocument;
use crate::storage::version::validate_version;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::Permissions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// 注册表错误
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 文档不存在
    #[error("Registry not found at {}", .0.display())]
    NotFound(PathBuf),

    /// 文档无法解析或违反版本格式
    #[error("Registry at {} is corrupt: {reason}", path.display())]
    CorruptDocument {
        /// 注册表路径
        path: PathBuf,
        /// 解析失败的原因
        reason: String,
    },

    /// 模型标识不在注册表中
    #[error(
        "Model '{model}' not found in registry (available: {})",
        available.join(", ")
    )]
    UnknownModel {
        /// 请求的模型标识
        model: String,
        /// 注册表中已有的模型标识
        available: Vec<String>,
    },

    /// 版本号格式错误
    #[error("Invalid version '{0}', expected v<major>.<minor>.<patch>")]
    InvalidVersion(String),

    /// 创建时目标文件已存在
    #[error("Registry already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    /// 配置不允许创建文档
    #[error("Registry provisioning is disabled (set registry.allow_create = true)")]
    ProvisioningDisabled,

    /// 其他文件系统错误
    #[error("Registry I/O error at {}: {source}", path.display())]
    Io {
        /// 注册表路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },
}

/// 一次版本更新的结果
#[derive(Debug, Clone)]
pub struct EntryUpdate {
    /// 模型标识
    pub model_id: String,
    /// 更新前的版本
    pub previous: String,
    /// 更新后的版本
    pub current: String,
    /// 已持久化的完整文档
    pub document: RegistryDocument,
}

/// 注册表存储
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
    allow_create: bool,
}

impl RegistryStore {
    /// 创建指向给定路径的注册表，默认不允许自行创建文档
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            allow_create: false,
        }
    }

    /// 从配置创建
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.registry.path).with_allow_create(config.registry.allow_create)
    }

    /// 是否允许 `provision` 创建文档
    pub fn with_allow_create(mut self, allow_create: bool) -> Self {
        self.allow_create = allow_create;
        self
    }

    /// 注册表文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取并解析当前磁盘上的文档
    ///
    /// 文档不存在时返回 `NotFound`，无法解析时返回 `CorruptDocument`；
    /// 不会用默认值代替。
    pub fn read(&self) -> Result<RegistryDocument, RegistryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RegistryError::NotFound(self.path.clone()));
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(self.corrupt(format!("not valid UTF-8: {}", e)));
            }
            Err(e) => return Err(self.io_error(e)),
        };

        RegistryDocument::parse(&content).map_err(|reason| self.corrupt(reason))
    }

    /// 更新单个模型的版本号，返回持久化后的文档
    pub fn update_entry(
        &self,
        model_id: &str,
        new_version: &str,
    ) -> Result<RegistryDocument, RegistryError> {
        self.replace_entry(model_id, new_version)
            .map(|update| update.document)
    }

    /// 与 `update_entry` 相同，但同时返回旧版本号
    ///
    /// 只替换 `entries[model_id]` 和 `last_updated`，其余内容原样写回。
    /// 模型标识必须已存在；这里不会新建模型槽位。
    pub fn replace_entry(
        &self,
        model_id: &str,
        new_version: &str,
    ) -> Result<EntryUpdate, RegistryError> {
        let mut document = self.read()?;

        let previous = match document.entries.get(model_id) {
            Some(version) => version.clone(),
            None => {
                return Err(RegistryError::UnknownModel {
                    model: model_id.to_string(),
                    available: document.model_ids(),
                });
            }
        };

        if !validate_version(new_version) {
            return Err(RegistryError::InvalidVersion(new_version.to_string()));
        }

        document
            .entries
            .insert(model_id.to_string(), new_version.to_string());
        document.last_updated = Some(next_timestamp(document.last_updated.as_deref()));

        self.persist(&document, true)?;

        tracing::info!(
            model = model_id,
            from = %previous,
            to = new_version,
            path = %self.path.display(),
            "Registry entry updated"
        );

        Ok(EntryUpdate {
            model_id: model_id.to_string(),
            previous,
            current: new_version.to_string(),
            document,
        })
    }

    /// 首次创建注册表文档，所有模型版本为 `v1.0.0`
    ///
    /// 仅在配置允许时可用；目标文件已存在时拒绝覆盖。
    pub fn provision<S: AsRef<str>>(
        &self,
        models: &[S],
    ) -> Result<RegistryDocument, RegistryError> {
        if !self.allow_create {
            return Err(RegistryError::ProvisioningDisabled);
        }
        if self.path.exists() {
            return Err(RegistryError::AlreadyExists(self.path.clone()));
        }

        if let Some(parent) = self.parent_dir() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut document =
            RegistryDocument::with_models(models.iter().map(|m| m.as_ref().to_string()), "v1.0.0");
        document.last_updated = Some(next_timestamp(None));

        self.persist(&document, false)?;

        tracing::info!(
            path = %self.path.display(),
            models = document.entries.len(),
            "Registry provisioned"
        );

        Ok(document)
    }

    /// 写临时文件后原子替换
    fn persist(&self, document: &RegistryDocument, overwrite: bool) -> Result<(), RegistryError> {
        let content = document
            .to_pretty_json()
            .map_err(|reason| self.corrupt(reason))?;

        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;

        // 临时文件默认仅属主可读写，替换前沿用目标文件的权限
        let permissions = match std::fs::metadata(&self.path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(),
            Err(e) => return Err(self.io_error(e)),
        };
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| self.io_error(e))?;
        }

        tmp.write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;

        let result = if overwrite {
            tmp.persist(&self.path)
        } else {
            tmp.persist_noclobber(&self.path)
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                Err(RegistryError::AlreadyExists(self.path.clone()))
            }
            Err(e) => Err(self.io_error(e.error)),
        }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn corrupt(&self, reason: String) -> RegistryError {
        RegistryError::CorruptDocument {
            path: self.path.clone(),
            reason,
        }
    }

    fn io_error(&self, source: std::io::Error) -> RegistryError {
        RegistryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// 新建注册表文件的权限
#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

/// 新的 `last_updated` 值，不早于上一次记录的时间
fn next_timestamp(previous: Option<&str>) -> String {
    let now = Utc::now();
    let stamp = previous
        .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
        .map(|p| p.with_timezone(&Utc))
        .filter(|p| *p > now)
        .unwrap_or(now);
    stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
