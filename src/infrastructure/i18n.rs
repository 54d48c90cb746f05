//! Per-request language resolution and translation lookup.
//!
//! A request resolves exactly one [`Language`]: the `?lang=` parameter if it
//! names a supported language, else the best supported `Accept-Language`
//! entry, else the configured default. Serializers then ask a [`Localizer`]
//! for the value of each translatable field in that language.

use std::{fmt, sync::Arc};

use crate::{entities::translations::Translations, settings::AppConfig};

/// Lowercase primary language subtag, e.g. `es` for `es-MX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    pub fn parse(raw: &str) -> Option<Self> {
        let primary = raw.trim().split(['-', '_']).next()?.trim().to_ascii_lowercase();
        if primary.is_empty() || primary == "*" || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Language(primary))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strategy for picking the value of a translatable field.
pub trait Localizer: Send + Sync {
    fn localize(&self, base: &str, translations: &Translations, field: &str, language: &Language) -> String;
}

/// Uses the overlay value when present and non-blank, else the base column.
#[derive(Debug, Clone)]
pub struct FallbackLocalizer {
    default_language: Language,
}

impl FallbackLocalizer {
    pub fn new(default_language: Language) -> Self {
        FallbackLocalizer { default_language }
    }
}

impl Localizer for FallbackLocalizer {
    fn localize(&self, base: &str, translations: &Translations, field: &str, language: &Language) -> String {
        if *language == self.default_language {
            return base.to_string();
        }
        match translations.get(language.as_str(), field) {
            Some(value) if !value.trim().is_empty() => value.to_string(),
            _ => base.to_string(),
        }
    }
}

/// Ignores the overlay entirely.
#[derive(Debug, Clone, Default)]
pub struct BaseLocalizer;

impl Localizer for BaseLocalizer {
    fn localize(&self, base: &str, _translations: &Translations, _field: &str, _language: &Language) -> String {
        base.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct LanguageSettings {
    pub default: Language,
    pub supported: Vec<Language>,
    pub enabled: bool,
}

impl LanguageSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let default = Language::parse(&config.default_language).unwrap_or_else(|| Language("en".into()));
        let mut supported: Vec<Language> = config
            .supported_languages()
            .iter()
            .filter_map(|raw| Language::parse(raw))
            .collect();
        if !supported.contains(&default) {
            supported.push(default.clone());
        }

        LanguageSettings {
            default,
            supported,
            enabled: config.localization_enabled,
        }
    }

    pub fn is_supported(&self, language: &Language) -> bool {
        self.supported.contains(language)
    }

    /// Picks the response language for one request.
    pub fn negotiate(&self, query: Option<&str>, accept_language: Option<&str>) -> Language {
        if !self.enabled {
            return self.default.clone();
        }

        if let Some(language) = query.and_then(Language::parse).filter(|l| self.is_supported(l)) {
            return language;
        }

        accept_language
            .and_then(|header| {
                parse_accept_language(header)
                    .into_iter()
                    .find(|l| self.is_supported(l))
            })
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn localizer(&self) -> Arc<dyn Localizer> {
        if self.enabled {
            Arc::new(FallbackLocalizer::new(self.default.clone()))
        } else {
            Arc::new(BaseLocalizer)
        }
    }
}

/// Accept-Language entries by descending quality; ties keep header order.
fn parse_accept_language(header: &str) -> Vec<Language> {
    let mut weighted: Vec<(Language, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let language = Language::parse(parts.next()?)?;
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((language, quality))
        })
        .collect();

    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    weighted.into_iter().map(|(language, _)| language).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LanguageSettings {
        let config = AppConfig {
            default_language: "en".into(),
            languages: vec!["en".into(), "es".into(), "pt".into()],
            ..AppConfig::default()
        };
        LanguageSettings::from_config(&config)
    }

    fn lang(code: &str) -> Language {
        Language::parse(code).unwrap()
    }

    #[test]
    fn parses_primary_subtag() {
        assert_eq!(lang("es-MX").as_str(), "es");
        assert_eq!(lang(" PT_br ").as_str(), "pt");
        assert!(Language::parse("*").is_none());
        assert!(Language::parse("").is_none());
    }

    #[test]
    fn query_parameter_wins_over_header() {
        let language = settings().negotiate(Some("pt"), Some("es;q=1.0"));
        assert_eq!(language, lang("pt"));
    }

    #[test]
    fn unsupported_query_falls_back_to_header() {
        let language = settings().negotiate(Some("de"), Some("de-DE, es;q=0.8, en;q=0.5"));
        assert_eq!(language, lang("es"));
    }

    #[test]
    fn header_quality_ordering_is_respected() {
        let language = settings().negotiate(None, Some("en;q=0.3, pt;q=0.9"));
        assert_eq!(language, lang("pt"));
    }

    #[test]
    fn falls_back_to_default_language() {
        assert_eq!(settings().negotiate(None, None), lang("en"));
        assert_eq!(settings().negotiate(None, Some("fr, de")), lang("en"));
    }

    #[test]
    fn disabled_localization_always_uses_default() {
        let mut settings = settings();
        settings.enabled = false;
        assert_eq!(settings.negotiate(Some("es"), Some("pt")), lang("en"));
    }

    #[test]
    fn fallback_localizer_skips_missing_and_blank_values() {
        let localizer = FallbackLocalizer::new(lang("en"));
        let overlay = Translations::new()
            .with("es", "title", "Hola")
            .with("es", "content", "  ");

        assert_eq!(localizer.localize("Hello", &overlay, "title", &lang("es")), "Hola");
        assert_eq!(localizer.localize("Body", &overlay, "content", &lang("es")), "Body");
        assert_eq!(localizer.localize("Hello", &overlay, "title", &lang("pt")), "Hello");
        assert_eq!(localizer.localize("Hello", &overlay, "title", &lang("en")), "Hello");
    }

    #[test]
    fn base_localizer_ignores_overlay() {
        let overlay = Translations::new().with("es", "title", "Hola");
        assert_eq!(BaseLocalizer.localize("Hello", &overlay, "title", &lang("es")), "Hello");
    }
}
