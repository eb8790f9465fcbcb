//! 紧急情况分类
//!
//! 模型概率超过阈值即判定为紧急；启用关键词兜底时，模型判定为非紧急但
//! 文本包含紧急关键词的，改判为紧急并赋予固定置信度。

use crate::api::error::InferenceError;
use crate::api::response::EmergencyPrediction;
use crate::models::traits::EmergencyScorer;
use crate::models::types::Language;
use crate::Result;

/// 关键词命中时的置信度
pub const KEYWORD_MATCH_CONFIDENCE: f32 = 0.90;

/// 各语言的紧急关键词（小写）
pub const EMERGENCY_KEYWORDS: &[(Language, &[&str])] = &[
    (
        Language::English,
        &[
            "chest pain",
            "heart attack",
            "severe breathing",
            "can't breathe",
            "difficulty breathing",
            "unconscious",
            "seizure",
            "heavy bleeding",
            "severe injury",
            "stroke",
            "anaphylaxis",
            "baby not breathing",
            "high fever child",
            "severe allergic reaction",
            "loss of consciousness",
        ],
    ),
    (
        Language::Hindi,
        &[
            "सीने में दर्द",
            "हार्ट अटैक",
            "सांस लेने में तकलीफ",
            "बेहोश",
            "दौरा",
            "भारी रक्तस्राव",
            "गंभीर चोट",
            "stroke",
        ],
    ),
    (
        Language::Odia,
        &["ଛାତି ବଥା", "ହାର୍ଟ ଆଟାକ୍", "ନିଶ୍ୱାସ ନେବାରେ କଷ୍ଟ", "ଚେତାଶୂନ୍ୟ"],
    ),
    (
        Language::Assamese,
        &["বুকুৰ বিষ", "হাৰ্ট এটেক", "উশাহ লোৱাত কষ্ট", "অজ্ঞান"],
    ),
];

/// 文本是否包含任一语言的紧急关键词
pub fn keyword_match(text: &str) -> bool {
    let lowered = text.to_lowercase();
    EMERGENCY_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter())
        .any(|keyword| lowered.contains(keyword))
}

/// 根据模型概率和关键词兜底得出单条结论
pub fn decide(
    text: &str,
    probability: f32,
    threshold: f32,
    use_keyword_fallback: bool,
) -> EmergencyPrediction {
    if probability > threshold {
        return EmergencyPrediction {
            is_emergency: true,
            confidence: probability,
        };
    }
    if use_keyword_fallback && keyword_match(text) {
        return EmergencyPrediction {
            is_emergency: true,
            confidence: KEYWORD_MATCH_CONFIDENCE,
        };
    }
    EmergencyPrediction {
        is_emergency: false,
        confidence: probability,
    }
}

/// 对一批文本分类
pub async fn classify(
    scorer: &dyn EmergencyScorer,
    texts: &[String],
    threshold: f32,
    use_keyword_fallback: bool,
) -> Result<Vec<EmergencyPrediction>> {
    let probabilities = scorer.emergency_probabilities(texts).await?;
    if probabilities.len() != texts.len() {
        return Err(InferenceError::ShapeMismatch {
            expected: texts.len(),
            actual: probabilities.len(),
        }
        .into());
    }

    Ok(texts
        .iter()
        .zip(probabilities)
        .map(|(text, p)| decide(text, p, threshold, use_keyword_fallback))
        .collect())
}
