use crate::core::ServiceState;
use crate::server::http::handlers;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// 定义路由
pub fn create_router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/versions", get(handlers::versions))
        .route("/embed", post(handlers::embed))
        .route("/embed-batch", post(handlers::embed_batch))
        .route("/classify-emergency", post(handlers::classify_emergency))
        .route("/translate", post(handlers::translate))
        .with_state(state)
}
