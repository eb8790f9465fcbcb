use serde::Serialize;
use std::collections::BTreeMap;

/// 嵌入响应
#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    /// 与输入顺序一致的向量
    pub embeddings: Vec<Vec<f32>>,
    /// 向量维度
    pub dimension: usize,
    /// 请求中的模型名，原样返回
    pub model: String,
}

/// 单条分类结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmergencyPrediction {
    /// 是否判定为紧急情况
    pub is_emergency: bool,
    /// 置信度
    pub confidence: f32,
}

/// 分类响应
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    /// 逐条分类结果
    pub predictions: Vec<EmergencyPrediction>,
}

/// 翻译响应
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    /// 译文
    pub translations: Vec<String>,
    /// 每条文本的源语言
    pub detected_languages: Vec<String>,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 固定为 `healthy`
    pub status: &'static str,
    /// 各模型是否已加载
    pub models: LoadedModels,
    /// 启动时读取的版本
    pub versions: BTreeMap<String, String>,
}

/// 各模型角色是否已加载
#[derive(Debug, Serialize)]
pub struct LoadedModels {
    /// 嵌入编码器
    pub embedding: bool,
    /// 紧急情况分类器
    pub emergency_classifier: bool,
    /// 翻译模型
    pub translation: bool,
}
