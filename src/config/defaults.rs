// 默认配置常量

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_REGISTRY_PATH: &str = "./models/registry.json";

pub const DEFAULT_EMERGENCY_THRESHOLD: f32 = 0.75;
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FORMAT: &str = "pretty";
pub const DEFAULT_LOG_OUTPUT: &str = "stdout";

/// 环境变量前缀，例如 `MEDLINGO_REGISTRY__PATH`
pub const ENV_PREFIX: &str = "MEDLINGO";
pub const ENV_SEPARATOR: &str = "__";
