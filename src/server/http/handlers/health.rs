use crate::api::response::HealthResponse;
use crate::core::ServiceState;
use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 健康检查端点
pub async fn health(State(state): State<Arc<ServiceState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        models: state.loaded_models(),
        versions: state.versions().as_map(),
    })
}

/// 版本信息端点，返回启动时读取的注册表快照
pub async fn versions(State(state): State<Arc<ServiceState>>) -> Json<BTreeMap<String, String>> {
    Json(state.versions().as_map())
}
