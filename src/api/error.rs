use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub use crate::core::registry::TrainingError;
pub use crate::storage::registry::RegistryError;

/// medlingo 错误类型
#[derive(Debug, Error)]
pub enum MedlingoError {
    /// 注册表读写失败
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 训练结果登记失败
    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    /// 模型推理失败
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// 配置无效或无法加载
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 请求处理失败
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// 推理错误
#[derive(Debug, Error)]
pub enum InferenceError {
    /// 后端返回错误
    #[error("Inference failed: {0}")]
    Failed(String),

    /// 对应角色没有注入后端
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    /// 后端结果条数与输入不一致
    #[error("Backend returned {actual} results for {expected} inputs")]
    ShapeMismatch {
        /// 输入条数
        expected: usize,
        /// 后端返回条数
        actual: usize,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置源读取失败
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// 配置取值非法
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// API 错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求参数非法
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 服务内部错误
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MedlingoError>;

impl MedlingoError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            MedlingoError::Api(ApiError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            MedlingoError::Inference(InferenceError::ModelNotLoaded(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 内层错误信息，不带分类前缀
    pub fn detail(&self) -> String {
        match self {
            MedlingoError::Registry(e) => e.to_string(),
            MedlingoError::Training(e) => e.to_string(),
            MedlingoError::Inference(e) => e.to_string(),
            MedlingoError::Config(e) => e.to_string(),
            MedlingoError::Api(e) => e.to_string(),
        }
    }
}

impl IntoResponse for MedlingoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err: MedlingoError = ApiError::InvalidRequest("texts is empty".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: MedlingoError = InferenceError::ModelNotLoaded("translation".into()).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: MedlingoError = InferenceError::Failed("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
