use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{errors::AppError, i18n::Language};

/// Per-language overlay for translatable text fields: `language -> field -> value`.
///
/// The base columns hold the default-language text; the overlay is opaque to
/// the store and only read back through a `Localizer`. Language keys are
/// kept as lowercase primary subtags, the form `Language` resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, BTreeMap<String, String>>);

impl<'de> Deserialize<'de> for Translations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, BTreeMap<String, String>>::deserialize(deserializer)?;
        let mut overlay = Translations::new();
        for (language, fields) in raw {
            overlay.0.entry(normalize_language(&language)).or_default().extend(fields);
        }
        Ok(overlay)
    }
}

/// `es-MX` and `ES` both become `es`; keys that are not language tags are kept
/// verbatim so that `ensure_fields` can report them.
fn normalize_language(raw: &str) -> String {
    Language::parse(raw).map_or_else(|| raw.to_string(), |language| language.as_str().to_string())
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, language: &str, field: &str, value: impl Into<String>) -> Self {
        self.0
            .entry(normalize_language(language))
            .or_default()
            .insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, language: &str, field: &str) -> Option<&str> {
        self.0
            .get(language)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Rejects overlay entries for fields that are not translatable on the
    /// entity, and keys that are not language codes.
    pub fn ensure_fields(&self, allowed: &[&str]) -> Result<(), AppError> {
        for (language, fields) in &self.0 {
            if Language::parse(language).is_none() {
                return Err(AppError::invalid_field(
                    "translations",
                    format!("'{language}' is not a language code."),
                ));
            }
            if let Some(field) = fields.keys().find(|f| !allowed.contains(&f.as_str())) {
                return Err(AppError::invalid_field(
                    "translations",
                    format!("Field '{field}' is not translatable (language '{language}')."),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_values_per_language_and_field() {
        let overlay = Translations::new()
            .with("ES", "title", "Hola")
            .with("es", "content", "Contenido");

        assert_eq!(overlay.get("es", "title"), Some("Hola"));
        assert_eq!(overlay.get("es", "content"), Some("Contenido"));
        assert_eq!(overlay.get("pt", "title"), None);
    }

    #[test]
    fn serializes_as_plain_nested_map() {
        let overlay = Translations::new().with("es", "title", "Hola");
        let json = serde_json::to_value(&overlay).unwrap();
        assert_eq!(json, serde_json::json!({"es": {"title": "Hola"}}));
    }

    #[test]
    fn rejects_unknown_fields() {
        let overlay = Translations::new().with("es", "slug", "hola");
        assert!(overlay.ensure_fields(&["title"]).is_err());
        assert!(Translations::new().with("es", "title", "x").ensure_fields(&["title"]).is_ok());
    }

    #[test]
    fn language_keys_are_normalized_on_deserialize() {
        let overlay: Translations = serde_json::from_str(
            r#"{"ES": {"title": "Hola"}, "pt-BR": {"title": "Olá"}}"#,
        )
        .unwrap();

        assert_eq!(overlay.get("es", "title"), Some("Hola"));
        assert_eq!(overlay.get("pt", "title"), Some("Olá"));
        assert!(overlay.ensure_fields(&["title"]).is_ok());
    }

    #[test]
    fn non_language_keys_are_rejected() {
        let overlay: Translations = serde_json::from_str(r#"{"*": {"title": "x"}}"#).unwrap();
        assert!(overlay.ensure_fields(&["title"]).is_err());
    }
}
