use serde::Deserialize;

/// 嵌入请求
#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    /// 待编码文本
    pub texts: Vec<String>,
    /// 模型版本标签，原样回显
    #[serde(default = "default_model_label")]
    pub model: String,
    /// 是否做 L2 归一化
    #[serde(default = "default_true")]
    pub normalize: bool,
}

/// 紧急情况分类请求
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// 待分类的健康咨询
    pub texts: Vec<String>,
    /// 低置信度时是否启用关键词兜底
    #[serde(default = "default_true")]
    pub use_keyword_fallback: bool,
}

/// 翻译请求
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    /// 待翻译文本
    pub texts: Vec<String>,
    /// 源语言代码，缺省时自动检测
    pub source_lang: Option<String>,
    /// 目标语言代码
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_model_label() -> String {
    "default".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}
