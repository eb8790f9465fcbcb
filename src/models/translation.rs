//! 翻译流程：语言检测、同语种跳过、按模型族生成参数调用后端

use crate::models::language::detect_language;
use crate::models::traits::Translator;
use crate::models::types::TranslationFamily;
use crate::Result;

/// 一批翻译的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutput {
    /// 与输入顺序一致的译文
    pub translations: Vec<String>,
    /// 给定源语言时为该语言的重复，否则为逐条检测结果
    pub detected_languages: Vec<String>,
}

/// 翻译一批文本
///
/// 源语言与目标语言相同的文本直接原样返回，不调用后端。
pub async fn translate_texts(
    translator: &dyn Translator,
    family: TranslationFamily,
    texts: &[String],
    source_lang: Option<&str>,
    target_lang: &str,
) -> Result<TranslationOutput> {
    let detected_languages: Vec<String> = texts
        .iter()
        .map(|text| match source_lang {
            Some(source) => source.to_string(),
            None => detect_language(text).code().to_string(),
        })
        .collect();

    let mut translations = Vec::with_capacity(texts.len());
    for (text, source) in texts.iter().zip(&detected_languages) {
        if source == target_lang {
            translations.push(text.clone());
            continue;
        }
        let plan = family.plan(source, target_lang);
        translations.push(translator.translate(text, &plan).await?);
    }

    Ok(TranslationOutput {
        translations,
        detected_languages,
    })
}
