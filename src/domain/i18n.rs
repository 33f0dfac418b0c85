//! Internationalized text

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Language code → translated text. A missing key means "not translated".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct I18NText(BTreeMap<String, String>);

impl I18NText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-language text
    pub fn create(language: impl Into<String>, text: impl Into<String>) -> Self {
        let mut i18n = Self::new();
        i18n.set(language, text);
        i18n
    }

    /// Parse a raw JSON value; only an object of strings is accepted.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut i18n = Self::new();
        for (language, text) in object {
            i18n.set(language.clone(), text.as_str()?);
        }
        Some(i18n)
    }

    pub fn set(&mut self, language: impl Into<String>, text: impl Into<String>) {
        self.0.insert(language.into(), text.into());
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_language_map() {
        let text = I18NText::from_json(&json!({"de": "Ladestation", "en": "Charging station"})).unwrap();
        assert_eq!(text.get("en"), Some("Charging station"));
        assert_eq!(text.get("fr"), None);
    }

    #[test]
    fn rejects_scalars_and_nested_values() {
        assert!(I18NText::from_json(&json!("just text")).is_none());
        assert!(I18NText::from_json(&json!(["en", "text"])).is_none());
        assert!(I18NText::from_json(&json!({"en": 42})).is_none());
    }

    #[test]
    fn equality_is_structural() {
        let a = I18NText::from_json(&json!({"en": "a", "de": "b"})).unwrap();
        let b = I18NText::from_json(&json!({"de": "b", "en": "a"})).unwrap();
        assert_eq!(a, b);
        assert_eq!(I18NText::new().to_json(), json!({}));
    }
}
