//! medlingo - 多语言健康模型推理门面
//!
//! 为三个预训练模型（嵌入编码器、紧急情况分类器、翻译模型）提供统一的
//! HTTP 服务，并维护一个基于 JSON 的模型版本注册表。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use crate::api::error::{MedlingoError, Result};
pub use crate::config::Config;

/// medlingo 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
