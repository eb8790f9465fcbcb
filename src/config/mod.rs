//! 配置加载：文件 + `MEDLINGO_` 前缀的环境变量

pub mod defaults;
pub mod loader;
pub mod settings;

pub use settings::{Config, CorsConfig, LoggingConfig, ModelsConfig, RegistryConfig, ServerConfig};
