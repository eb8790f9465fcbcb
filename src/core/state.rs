//! 服务进程状态
//!
//! 启动阶段构造一次，之后通过 `Arc` 共享给所有请求处理函数，只读不写。

use crate::api::error::{ConfigError, InferenceError};
use crate::api::response::LoadedModels;
use crate::config::Config;
use crate::core::registry::VersionSnapshot;
use crate::models::{Embedder, EmergencyScorer, TranslationFamily, Translator};
use crate::storage::registry::RegistryStore;
use crate::Result;
use std::sync::Arc;

/// 服务状态
pub struct ServiceState {
    config: Config,
    versions: VersionSnapshot,
    embedder: Option<Arc<dyn Embedder>>,
    scorer: Option<Arc<dyn EmergencyScorer>>,
    translator: Option<Arc<dyn Translator>>,
}

impl ServiceState {
    /// 创建构建器
    pub fn builder(config: Config) -> ServiceStateBuilder {
        ServiceStateBuilder {
            config,
            versions: None,
            embedder: None,
            scorer: None,
            translator: None,
        }
    }

    /// 当前配置
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 启动时读取的版本快照
    pub fn versions(&self) -> &VersionSnapshot {
        &self.versions
    }

    /// 翻译模型族
    pub fn translation_family(&self) -> TranslationFamily {
        self.config.models.translation_family
    }

    /// 嵌入编码器，未加载时返回 `ModelNotLoaded`
    pub fn embedder(&self) -> Result<&dyn Embedder> {
        self.embedder
            .as_deref()
            .ok_or_else(|| InferenceError::ModelNotLoaded("embedding model".to_string()).into())
    }

    /// 紧急情况打分器
    pub fn emergency_scorer(&self) -> Result<&dyn EmergencyScorer> {
        self.scorer.as_deref().ok_or_else(|| {
            InferenceError::ModelNotLoaded("emergency classifier".to_string()).into()
        })
    }

    /// 翻译模型
    pub fn translator(&self) -> Result<&dyn Translator> {
        self.translator
            .as_deref()
            .ok_or_else(|| InferenceError::ModelNotLoaded("translation model".to_string()).into())
    }

    /// 各角色加载情况
    pub fn loaded_models(&self) -> LoadedModels {
        LoadedModels {
            embedding: self.embedder.is_some(),
            emergency_classifier: self.scorer.is_some(),
            translation: self.translator.is_some(),
        }
    }
}

/// 服务状态构建器
pub struct ServiceStateBuilder {
    config: Config,
    versions: Option<VersionSnapshot>,
    embedder: Option<Arc<dyn Embedder>>,
    scorer: Option<Arc<dyn EmergencyScorer>>,
    translator: Option<Arc<dyn Translator>>,
}

impl ServiceStateBuilder {
    /// 直接指定版本快照，不再读取注册表
    pub fn versions(mut self, versions: VersionSnapshot) -> Self {
        self.versions = Some(versions);
        self
    }

    /// 注入嵌入编码器
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// 注入紧急情况打分器
    pub fn emergency_scorer(mut self, scorer: Arc<dyn EmergencyScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// 注入翻译模型，其模型族必须与配置一致
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// 完成构建
    ///
    /// 未指定版本快照时按启动协议读取注册表。
    pub fn build(self) -> Result<ServiceState> {
        let configured = self.config.models.translation_family;
        if let Some(translator) = &self.translator {
            if translator.family() != configured {
                return Err(ConfigError::Invalid(format!(
                    "translator family '{}' does not match models.translation_family '{}'",
                    translator.family(),
                    configured
                ))
                .into());
            }
        }

        let versions = match self.versions {
            Some(versions) => versions,
            None => VersionSnapshot::load_or_default(&RegistryStore::from_config(&self.config))?,
        };

        let state = ServiceState {
            config: self.config,
            versions,
            embedder: self.embedder,
            scorer: self.scorer,
            translator: self.translator,
        };

        let loaded = state.loaded_models();
        tracing::info!(
            embedding = loaded.embedding,
            emergency_classifier = loaded.emergency_classifier,
            translation = loaded.translation,
            translation_family = %configured,
            "Service state initialized"
        );

        Ok(state)
    }
}
