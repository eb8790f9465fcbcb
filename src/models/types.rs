//! 模型相关的基础类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 模型角色
///
/// 每个角色在注册表中对应一个固定的模型标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// 嵌入编码器
    Embedding,
    /// 紧急情况二分类器
    EmergencyClassifier,
    /// 序列到序列翻译模型
    Translation,
}

impl ModelRole {
    /// 全部角色，顺序与注册表默认文档一致
    pub const ALL: [ModelRole; 3] = [
        ModelRole::Embedding,
        ModelRole::EmergencyClassifier,
        ModelRole::Translation,
    ];

    /// 注册表中的模型标识
    pub fn id(&self) -> &'static str {
        match self {
            ModelRole::Embedding => "embedding_model",
            ModelRole::EmergencyClassifier => "emergency_classifier",
            ModelRole::Translation => "translation_model",
        }
    }

    /// 根据模型标识查找角色
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    /// 所有默认模型标识
    pub fn default_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|role| role.id()).collect()
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// 英语
    English,
    /// 印地语
    Hindi,
    /// 奥里亚语
    Odia,
    /// 阿萨姆语
    Assamese,
}

impl Language {
    /// 语言代码
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Odia => "or",
            Language::Assamese => "as",
        }
    }

    /// 根据语言代码查找
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "hi" => Some(Language::Hindi),
            "or" => Some(Language::Odia),
            "as" => Some(Language::Assamese),
            _ => None,
        }
    }
}

/// 翻译模型族
///
/// 在配置中显式指定，启动时确定一次；不根据模型名称推断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationFamily {
    /// M2M100：需要设置源语言并强制目标语言起始 token
    #[default]
    M2m100,
    /// 通用 seq2seq 模型
    Seq2seq,
}

/// 束搜索宽度
pub const TRANSLATION_NUM_BEAMS: usize = 5;
/// 最大序列长度
pub const TRANSLATION_MAX_LENGTH: usize = 512;

/// 一次翻译生成的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// 需要写入 tokenizer 的源语言
    pub source_lang: Option<String>,
    /// 强制作为首 token 的目标语言
    pub forced_target_lang: Option<String>,
    /// 束搜索宽度
    pub num_beams: usize,
    /// 最大生成长度
    pub max_length: usize,
}

impl TranslationFamily {
    /// 为一对语言生成该模型族的生成参数
    pub fn plan(&self, source: &str, target: &str) -> GenerationPlan {
        let (source_lang, forced_target_lang) = match self {
            TranslationFamily::M2m100 => (Some(source.to_string()), Some(target.to_string())),
            TranslationFamily::Seq2seq => (None, None),
        };
        GenerationPlan {
            source_lang,
            forced_target_lang,
            num_beams: TRANSLATION_NUM_BEAMS,
            max_length: TRANSLATION_MAX_LENGTH,
        }
    }
}

impl fmt::Display for TranslationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationFamily::M2m100 => f.write_str("m2m100"),
            TranslationFamily::Seq2seq => f.write_str("seq2seq"),
        }
    }
}
