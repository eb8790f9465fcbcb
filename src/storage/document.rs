//! 注册表文档
//!
//! 磁盘上是一个扁平的 JSON 对象：除保留键 `last_updated` 和 `metadata` 外，
//! 每个顶层键都是一个模型标识，值为版本号。

use crate::storage::version::validate_version;
use serde::de::IgnoredAny;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 时间戳保留键
pub const LAST_UPDATED_KEY: &str = "last_updated";
/// 元数据保留键
pub const METADATA_KEY: &str = "metadata";

/// 注册表文档
#[derive(Debug, Clone, Default)]
pub struct RegistryDocument {
    /// 模型标识 -> 版本号
    pub entries: BTreeMap<String, String>,

    /// 最近一次成功修改的 UTC 时间（RFC 3339）
    pub last_updated: Option<String>,

    /// 模型标识 -> 描述属性
    ///
    /// 保存原始 JSON 文本，写回时逐字节不变；注册表只校验它是一个对象。
    pub metadata: Option<Box<RawValue>>,
}

impl RegistryDocument {
    /// 用给定模型标识和统一的初始版本创建文档
    pub fn with_models<I, S>(models: I, version: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: models
                .into_iter()
                .map(|m| (m.into(), version.to_string()))
                .collect(),
            last_updated: None,
            metadata: None,
        }
    }

    /// 解析并校验文档内容
    ///
    /// 返回的错误字符串用于 `CorruptDocument` 的原因说明。
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if !content.trim_start().starts_with('{') {
            return Err("top-level value is not a JSON object".to_string());
        }
        let fields: BTreeMap<String, Box<RawValue>> =
            serde_json::from_str(content).map_err(|e| e.to_string())?;

        let mut document = RegistryDocument::default();
        for (key, raw) in fields {
            match key.as_str() {
                LAST_UPDATED_KEY => {
                    document.last_updated = serde_json::from_str(raw.get())
                        .map_err(|e| format!("'{}' is not a string: {}", LAST_UPDATED_KEY, e))?;
                }
                METADATA_KEY => {
                    serde_json::from_str::<BTreeMap<String, IgnoredAny>>(raw.get())
                        .map_err(|e| format!("'{}' is not a JSON object: {}", METADATA_KEY, e))?;
                    document.metadata = Some(raw);
                }
                model => {
                    let version: String = serde_json::from_str(raw.get())
                        .map_err(|_| format!("entry '{}' is not a string", model))?;
                    if !validate_version(&version) {
                        return Err(format!(
                            "entry '{}' has malformed version '{}'",
                            model, version
                        ));
                    }
                    document.entries.insert(model.to_string(), version);
                }
            }
        }

        Ok(document)
    }

    /// 序列化为带缩进的 JSON 文本
    pub fn to_pretty_json(&self) -> std::result::Result<String, String> {
        let mut content = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        content.push('\n');
        Ok(content)
    }

    /// 获取模型当前版本
    pub fn version(&self, model_id: &str) -> Option<&str> {
        self.entries.get(model_id).map(String::as_str)
    }

    /// 所有模型标识
    pub fn model_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// 元数据的原始 JSON 文本
    pub fn metadata_json(&self) -> Option<&str> {
        self.metadata.as_deref().map(RawValue::get)
    }

    /// 解析出某个模型的元数据，只用于展示
    pub fn model_metadata(&self, model_id: &str) -> Option<Value> {
        let metadata: Map<String, Value> = serde_json::from_str(self.metadata_json()?).ok()?;
        metadata.get(model_id).cloned()
    }
}

// 条目在前（按模型标识排序），其后依次为时间戳和元数据
impl Serialize for RegistryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (model, version) in &self.entries {
            map.serialize_entry(model, version)?;
        }
        if let Some(last_updated) = &self.last_updated {
            map.serialize_entry(LAST_UPDATED_KEY, last_updated)?;
        }
        if let Some(metadata) = &self.metadata {
            map.serialize_entry(METADATA_KEY, metadata)?;
        }
        map.end()
    }
}

impl PartialEq for RegistryDocument {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
            && self.last_updated == other.last_updated
            && self.metadata_json() == other.metadata_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "embedding_model": "v1.2.0",
        "emergency_classifier": "v1.0.0",
        "translation_model": "v1.0.3",
        "last_updated": "2024-01-01T00:00:00Z",
        "metadata": {
            "embedding_model": { "dimension": 768, "base": "test-model" },
            "unrelated_model": { "notes": ["a", "b"] }
        }
    }"#;

    #[test]
    fn test_parse_document() {
        let doc = RegistryDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.entries.len(), 3);
        assert_eq!(doc.version("embedding_model"), Some("v1.2.0"));
        assert_eq!(doc.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(
            doc.model_metadata("embedding_model").unwrap()["dimension"],
            768
        );
        // metadata 与 entries 相互独立
        assert!(doc.model_metadata("unrelated_model").is_some());
        assert!(doc.version("unrelated_model").is_none());
    }

    #[test]
    fn test_parse_without_optional_keys() {
        let doc = RegistryDocument::parse(r#"{"embedding_model": "v1.0.0"}"#).unwrap();
        assert!(doc.last_updated.is_none());
        assert!(doc.metadata.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_documents() {
        assert!(RegistryDocument::parse("not json").is_err());
        assert!(RegistryDocument::parse("[1, 2]").is_err());
        assert!(RegistryDocument::parse(r#"{"embedding_model": 3}"#).is_err());
        assert!(RegistryDocument::parse(r#"{"embedding_model": "1.0.0"}"#).is_err());
        assert!(RegistryDocument::parse(r#"{"metadata": "oops"}"#).is_err());
        assert!(RegistryDocument::parse(r#"{"metadata": [1]}"#).is_err());
        assert!(RegistryDocument::parse(r#"{"last_updated": 5}"#).is_err());
    }

    #[test]
    fn test_serialization_layout() {
        let doc = RegistryDocument::parse(SAMPLE).unwrap();
        let json = doc.to_pretty_json().unwrap();

        let embedding = json.find("\"embedding_model\": \"v1.2.0\"").unwrap();
        let last_updated = json.find("\"last_updated\"").unwrap();
        let metadata = json.find("\"metadata\"").unwrap();
        assert!(embedding < last_updated);
        assert!(last_updated < metadata);
        assert!(json.ends_with('\n'));

        assert_eq!(RegistryDocument::parse(&json).unwrap(), doc);
    }

    #[test]
    fn test_with_models() {
        let doc = RegistryDocument::with_models(["a", "b"], "v1.0.0");
        assert_eq!(doc.version("a"), Some("v1.0.0"));
        assert_eq!(doc.model_ids(), vec!["a".to_string(), "b".to_string()]);
        assert!(!doc.to_pretty_json().unwrap().contains("last_updated"));
    }

    #[test]
    fn test_metadata_rewritten_verbatim() {
        let metadata = r#"{"seed":123456789012345678901234567890,"lr":1e-5,"scale":2.50}"#;
        let content = format!(r#"{{"embedding_model": "v1.0.0", "metadata": {}}}"#, metadata);
        let doc = RegistryDocument::parse(&content).unwrap();
        let json = doc.to_pretty_json().unwrap();

        assert!(json.contains(&format!(r#""metadata": {}"#, metadata)));
    }
}
