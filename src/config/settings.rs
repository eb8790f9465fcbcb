use crate::config::defaults::*;
use crate::models::TranslationFamily;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 主配置结构
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务
    pub server: ServerConfig,
    /// 模型版本注册表
    pub registry: RegistryConfig,
    /// 模型行为
    pub models: ModelsConfig,
    /// 日志
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 缺省时允许任意来源
    pub cors: Option<CorsConfig>,
}

/// CORS 配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源，`*` 表示任意
    pub allowed_origins: Vec<String>,
    /// 允许的方法，为空时不限
    pub allowed_methods: Vec<String>,
    /// 允许的请求头，为空时不限
    pub allowed_headers: Vec<String>,
}

/// 注册表配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 注册表文件路径
    pub path: PathBuf,
    /// 是否允许注册表在不存在时自行创建文档
    pub allow_create: bool,
}

/// 模型配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// 判定为紧急情况的概率阈值
    pub emergency_threshold: f32,
    /// 请求未指定时是否启用关键词兜底
    pub keyword_fallback: bool,
    /// 翻译模型族，启动时确定
    pub translation_family: TranslationFamily,
    /// 批量嵌入时每批文本数
    pub embed_batch_size: usize,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 优先
    pub level: String,
    /// json、pretty 或 compact
    pub format: String,
    /// stdout、stderr 或文件路径
    pub output: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors: None,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            allow_create: false,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            emergency_threshold: DEFAULT_EMERGENCY_THRESHOLD,
            keyword_fallback: true,
            translation_family: TranslationFamily::default(),
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: DEFAULT_LOG_FORMAT.to_string(),
            output: vec![DEFAULT_LOG_OUTPUT.to_string()],
        }
    }
}

impl Config {
    /// 从文件加载配置（环境变量可覆盖）
    pub fn from_file(path: &str) -> crate::Result<Self> {
        crate::config::loader::load_from_file(path)
    }

    /// 从环境变量加载配置
    pub fn from_env() -> crate::Result<Self> {
        crate::config::loader::load_from_env()
    }

    /// 检查取值范围
    pub fn validate(&self) -> crate::Result<()> {
        let threshold = self.models.emergency_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(crate::api::error::ConfigError::Invalid(format!(
                "models.emergency_threshold must be within [0, 1], got {}",
                threshold
            ))
            .into());
        }
        if self.models.embed_batch_size == 0 {
            return Err(crate::api::error::ConfigError::Invalid(
                "models.embed_batch_size must be greater than 0".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.registry.path, PathBuf::from("./models/registry.json"));
        assert!(!config.registry.allow_create);
        assert_eq!(config.models.emergency_threshold, 0.75);
        assert_eq!(config.models.translation_family, TranslationFamily::M2m100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"registry": {"allow_create": true}}"#).unwrap();
        assert!(config.registry.allow_create);
        assert_eq!(config.registry.path, PathBuf::from(DEFAULT_REGISTRY_PATH));
        assert_eq!(config.server.host, DEFAULT_HOST);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = Config::default();
        config.models.emergency_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.models.embed_batch_size = 0;
        assert!(config.validate().is_err());
    }
}
