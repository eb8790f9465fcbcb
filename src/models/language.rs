//! 基于 Unicode 区块的语言检测

use crate::models::types::Language;

/// 检测文本语言
///
/// 依次检查奥里亚文、天城文、孟加拉-阿萨姆文区块，命中任一字符即返回；
/// 都不命中时视为英语。
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(is_odia) {
        Language::Odia
    } else if text.chars().any(is_devanagari) {
        Language::Hindi
    } else if text.chars().any(is_bengali) {
        Language::Assamese
    } else {
        Language::English
    }
}

fn is_odia(c: char) -> bool {
    matches!(c, '\u{0B00}'..='\u{0B7F}')
}

fn is_devanagari(c: char) -> bool {
    matches!(c, '\u{0900}'..='\u{097F}')
}

fn is_bengali(c: char) -> bool {
    matches!(c, '\u{0980}'..='\u{09FF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("मुझे बुखार है"), Language::Hindi);
        assert_eq!(detect_language("ଛାତି ବଥା"), Language::Odia);
        assert_eq!(detect_language("বুকুৰ বিষ"), Language::Assamese);
        assert_eq!(detect_language("What are malaria symptoms?"), Language::English);
        assert_eq!(detect_language(""), Language::English);
    }

    #[test]
    fn test_mixed_script_prefers_odia() {
        assert_eq!(detect_language("fever ଜ୍ୱର बुखार"), Language::Odia);
        assert_eq!(detect_language("fever बुखार"), Language::Hindi);
    }
}
