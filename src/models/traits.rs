//! 模型 Trait 定义
//!
//! 三个模型角色的推理接口。具体实现（加载预训练权重、分词、生成）由宿主程序
//! 在构造 `ServiceState` 时注入。

use crate::models::types::{GenerationPlan, TranslationFamily};
use crate::Result;
use async_trait::async_trait;

/// 嵌入编码器
#[async_trait]
pub trait Embedder: Send + Sync {
    /// 将一批文本编码为向量（未归一化）
    ///
    /// 返回的向量数必须与输入文本数一致。
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// 紧急情况打分器
#[async_trait]
pub trait EmergencyScorer: Send + Sync {
    /// 每条文本属于紧急类别的概率，取值 [0, 1]
    async fn emergency_probabilities(&self, texts: &[String]) -> Result<Vec<f32>>;
}

/// 翻译模型
#[async_trait]
pub trait Translator: Send + Sync {
    /// 模型族
    fn family(&self) -> TranslationFamily;

    /// 按给定生成参数翻译单条文本
    async fn translate(&self, text: &str, plan: &GenerationPlan) -> Result<String>;
}
