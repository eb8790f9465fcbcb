use crate::config::defaults::{ENV_PREFIX, ENV_SEPARATOR};
use crate::config::settings::Config;
use crate::Result;
use config::{Config as ConfigBuilder, Environment, File};

/// 从文件加载配置
pub fn load_from_file(path: &str) -> Result<Config> {
    let config = ConfigBuilder::builder()
        .add_source(File::with_name(path))
        .add_source(environment())
        .build()
        .map_err(|e| crate::api::error::ConfigError::LoadFailed(e.to_string()))?;

    finish(config)
}

/// 从环境变量加载配置
pub fn load_from_env() -> Result<Config> {
    let config = ConfigBuilder::builder()
        .add_source(environment())
        .build()
        .map_err(|e| crate::api::error::ConfigError::LoadFailed(e.to_string()))?;

    finish(config)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn finish(config: ConfigBuilder) -> Result<Config> {
    let config: Config = config
        .try_deserialize()
        .map_err(|e| crate::api::error::ConfigError::Invalid(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
