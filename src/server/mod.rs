pub mod http;

use crate::config::Config;
use crate::core::ServiceState;
use crate::Result;
use std::sync::Arc;

/// 启动服务器
///
/// 按启动协议读取注册表后构造服务状态。没有注入模型后端时，推理接口返回 503，
/// `/health` 与 `/versions` 仍可用。
pub async fn serve(config: Config) -> Result<()> {
    tracing::info!("Starting server...");
    let state = ServiceState::builder(config).build()?;
    http::serve(Arc::new(state)).await
}

/// 使用已构建的服务状态启动服务器
pub async fn serve_with_state(state: ServiceState) -> Result<()> {
    http::serve(Arc::new(state)).await
}
