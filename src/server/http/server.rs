use crate::api::error::{ApiError, ConfigError};
use crate::config::{Config, CorsConfig};
use crate::core::ServiceState;
use crate::server::http::routes;
use crate::Result;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 构建带中间件的应用
pub fn build_app(state: Arc<ServiceState>) -> Result<Router> {
    let cors = cors_layer(state.config().server.cors.as_ref())?;
    Ok(routes::create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    ))
}

/// 启动 HTTP 服务器
pub async fn serve(state: Arc<ServiceState>) -> Result<()> {
    let config: &Config = state.config();
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(state.clone())?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// 未配置时允许任意来源
fn cors_layer(cors: Option<&CorsConfig>) -> Result<CorsLayer> {
    let Some(cors) = cors else {
        return Ok(CorsLayer::permissive());
    };

    let origin = if cors.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins = cors
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|e| invalid("origin", o, e)))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if cors.allowed_methods.is_empty()
        || cors.allowed_methods.iter().any(|m| m == "*")
    {
        AllowMethods::from(Any)
    } else {
        let methods = cors
            .allowed_methods
            .iter()
            .map(|m| Method::from_bytes(m.as_bytes()).map_err(|e| invalid("method", m, e)))
            .collect::<Result<Vec<_>>>()?;
        AllowMethods::list(methods)
    };

    let headers = if cors.allowed_headers.is_empty()
        || cors.allowed_headers.iter().any(|h| h == "*")
    {
        AllowHeaders::from(Any)
    } else {
        let headers = cors
            .allowed_headers
            .iter()
            .map(|h| HeaderName::from_bytes(h.as_bytes()).map_err(|e| invalid("header", h, e)))
            .collect::<Result<Vec<_>>>()?;
        AllowHeaders::list(headers)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers))
}

fn invalid(kind: &str, value: &str, err: impl std::fmt::Display) -> crate::MedlingoError {
    ConfigError::Invalid(format!("Invalid CORS {} '{}': {}", kind, value, err)).into()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
