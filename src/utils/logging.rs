//! 日志系统
//!
//! 基于 tracing 的日志初始化，支持：
//! - 可配置的日志级别（`RUST_LOG` 优先）
//! - 多种日志格式（JSON、Pretty、Compact）
//! - 输出到 stdout、stderr 或文件

use crate::config::settings::LoggingConfig;
use crate::Result;
use std::path::PathBuf;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志系统
///
/// 只使用 `output` 中的第一个目标；列表为空时输出到 stdout。
///
/// # 示例
///
/// ```no_run
/// use medlingo::config::LoggingConfig;
/// use medlingo::utils::logging::init_logging;
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: "json".to_string(),
///     output: vec!["logs/medlingo.log".to_string()],
/// };
///
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| {
            // 日志系统尚未初始化，只能直接写 stderr
            eprintln!(
                "Warning: Invalid log level '{}', using 'info' as default",
                config.level
            );
            EnvFilter::new("info")
        })
    });

    let primary_output = config
        .output
        .first()
        .map(|s| s.as_str())
        .unwrap_or("stdout");

    match primary_output {
        "stdout" => init_subscriber(&config.format, filter, std::io::stdout)?,
        "stderr" => init_subscriber(&config.format, filter, std::io::stderr)?,
        file_path => {
            let path = PathBuf::from(file_path);

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    crate::api::error::ConfigError::Invalid(format!(
                        "Failed to create log directory: {}",
                        e
                    ))
                })?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    crate::api::error::ConfigError::Invalid(format!(
                        "Failed to open log file {}: {}",
                        file_path, e
                    ))
                })?;

            init_subscriber(&config.format, filter, file)?;
        }
    }

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        output = primary_output,
        "Logging initialized"
    );

    Ok(())
}

/// 命令行工具使用的日志：compact 格式，输出到 stderr，不干扰 stdout
pub fn init_cli_logging(level: &str) -> Result<()> {
    let config = LoggingConfig {
        level: level.to_string(),
        format: "compact".to_string(),
        output: vec!["stderr".to_string()],
    };
    init_logging(&config)
}

fn init_subscriber<W>(format: &str, filter: EnvFilter, writer: W) -> Result<()>
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = Registry::default().with(filter);

    let layer = match format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .with_writer(writer)
            .json()
            .with_target(true)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .boxed(),
        "pretty" | "human" => fmt::layer()
            .with_writer(writer)
            .pretty()
            .with_target(true)
            .with_level(true)
            .boxed(),
        _ => fmt::layer()
            .with_writer(writer)
            .compact()
            .with_target(false)
            .with_level(true)
            .boxed(),
    };

    registry.with(layer).try_init().map_err(|e| {
        crate::api::error::ConfigError::Invalid(format!("Failed to initialize logging: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_cli_logging() {
        // 全局 subscriber 只能初始化一次，重复调用返回错误即可
        let _ = init_cli_logging("warn");
        assert!(init_cli_logging("warn").is_err());
    }
}
