use crate::api::error::ApiError;
use crate::api::request::TranslateRequest;
use crate::api::response::TranslateResponse;
use crate::core::ServiceState;
use crate::models::translation;
use crate::Result;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// 翻译
pub async fn translate(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>> {
    let translator = state.translator()?;
    if request.texts.is_empty() {
        return Err(ApiError::InvalidRequest("texts must not be empty".to_string()).into());
    }

    let output = translation::translate_texts(
        translator,
        state.translation_family(),
        &request.texts,
        request.source_lang.as_deref(),
        &request.target_lang,
    )
    .await?;

    Ok(Json(TranslateResponse {
        translations: output.translations,
        detected_languages: output.detected_languages,
    }))
}
