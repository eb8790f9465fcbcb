use crate::api::error::ApiError;
use crate::api::request::EmbedRequest;
use crate::api::response::EmbedResponse;
use crate::core::ServiceState;
use crate::models::embedding;
use crate::Result;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// 生成嵌入
pub async fn embed(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>> {
    // 单次请求整批送入编码器
    let batch_size = request.texts.len();
    run(&state, request, batch_size).await
}

/// 批量生成嵌入，用于知识库导入，按配置的批大小分批编码
pub async fn embed_batch(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>> {
    tracing::info!(texts = request.texts.len(), "Batch embedding request");
    let batch_size = state.config().models.embed_batch_size;
    run(&state, request, batch_size).await
}

async fn run(
    state: &ServiceState,
    request: EmbedRequest,
    batch_size: usize,
) -> Result<Json<EmbedResponse>> {
    let embedder = state.embedder()?;
    if request.texts.is_empty() {
        return Err(ApiError::InvalidRequest("texts must not be empty".to_string()).into());
    }

    let embeddings =
        embedding::embed_texts(embedder, &request.texts, batch_size, request.normalize).await?;

    Ok(Json(EmbedResponse {
        dimension: embedding::dimension(&embeddings),
        embeddings,
        model: request.model,
    }))
}
