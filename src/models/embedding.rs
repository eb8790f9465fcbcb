//! 嵌入生成：分批调用编码器并按需归一化

use crate::api::error::InferenceError;
use crate::models::traits::Embedder;
use crate::Result;

/// L2 归一化，零向量保持不变
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// 以 `batch_size` 为单位分批编码，结果顺序与输入一致
pub async fn embed_texts(
    embedder: &dyn Embedder,
    texts: &[String],
    batch_size: usize,
    normalize: bool,
) -> Result<Vec<Vec<f32>>> {
    let mut embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size.max(1)) {
        let vectors = embedder.embed(batch).await?;
        if vectors.len() != batch.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: batch.len(),
                actual: vectors.len(),
            }
            .into());
        }
        embeddings.extend(vectors);
    }

    if normalize {
        embeddings.iter_mut().for_each(|v| l2_normalize(v));
    }

    Ok(embeddings)
}

/// 向量维度，取第一条向量的长度
pub fn dimension(embeddings: &[Vec<f32>]) -> usize {
    embeddings.first().map(Vec::len).unwrap_or(0)
}
