use crate::api::error::ApiError;
use crate::api::request::ClassifyRequest;
use crate::api::response::ClassifyResponse;
use crate::core::ServiceState;
use crate::models::emergency;
use crate::Result;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// 紧急情况分类
pub async fn classify_emergency(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>> {
    let scorer = state.emergency_scorer()?;
    if request.texts.is_empty() {
        return Err(ApiError::InvalidRequest("texts must not be empty".to_string()).into());
    }

    let models = &state.config().models;
    let use_fallback = request.use_keyword_fallback && models.keyword_fallback;
    let predictions = emergency::classify(
        scorer,
        &request.texts,
        models.emergency_threshold,
        use_fallback,
    )
    .await?;

    Ok(Json(ClassifyResponse { predictions }))
}
