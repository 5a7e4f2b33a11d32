//! Language registry: the ordered set of supported languages and its default.
//!
//! The registry is built once from configuration and shared by reference;
//! nothing in the crate hardcodes a language. Adding a language is a
//! configuration change only.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::LanguageTag;

static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn code_regex() -> &'static Regex {
    CODE_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(-[a-z0-9]{2,8})?$").expect("language code regex is valid")
    })
}

/// Problems with a configured language set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("At least one supported language is required")]
    Empty,

    #[error("Invalid language code: '{0}'")]
    InvalidCode(String),

    #[error("Language '{0}' is listed more than once")]
    Duplicate(String),

    #[error("Default language '{0}' is not in the supported set")]
    UnknownDefault(String),
}

/// Supported languages in configured order, with one designated default.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageTag>,
    default_index: usize,
}

impl LanguageRegistry {
    /// Build a registry from language codes and the default code.
    ///
    /// Codes are trimmed and lowercased. The order given is the order used
    /// when listing available languages.
    pub fn new<I, S>(codes: I, default: &str) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut languages: Vec<LanguageTag> = Vec::new();

        for code in codes {
            let code = code.as_ref().trim().to_lowercase();
            if !code_regex().is_match(&code) {
                return Err(RegistryError::InvalidCode(code));
            }
            if languages.iter().any(|lang| lang.code() == code) {
                return Err(RegistryError::Duplicate(code));
            }
            languages.push(LanguageTag::new(&code));
        }

        if languages.is_empty() {
            return Err(RegistryError::Empty);
        }

        let default = default.trim().to_lowercase();
        let default_index = languages
            .iter()
            .position(|lang| lang.code() == default)
            .ok_or(RegistryError::UnknownDefault(default))?;

        Ok(Self {
            languages,
            default_index,
        })
    }

    /// The default language (fallback and response language for unsupported requests).
    pub fn default_language(&self) -> &LanguageTag {
        &self.languages[self.default_index]
    }

    /// All supported languages in configured order.
    pub fn languages(&self) -> &[LanguageTag] {
        &self.languages
    }

    /// Look up a supported language by exact code.
    pub fn get(&self, code: &str) -> Option<&LanguageTag> {
        self.languages.iter().find(|lang| lang.code() == code)
    }

    /// Check whether a code is in the supported set.
    ///
    /// # Arguments
    /// * `code` - An exact, already lowercased language code
    ///
    /// # Returns
    /// `true` only for configured codes; no normalization is applied.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Map an arbitrary requested code to a supported language.
    ///
    /// Surrounding whitespace and case are ignored; anything still unsupported
    /// (including an empty string) becomes the default language.
    pub fn normalize(&self, requested: &str) -> LanguageTag {
        let requested = requested.trim();
        self.languages
            .iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(requested))
            .unwrap_or_else(|| self.default_language())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::new(["en", "es"], "en").expect("Should build")
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_keeps_configured_order() {
        let registry = LanguageRegistry::new(["es", "en", "fr"], "en").unwrap();
        let codes: Vec<&str> = registry.languages().iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["es", "en", "fr"]);
        assert_eq!(registry.default_language().code(), "en");
    }

    #[test]
    fn test_new_lowercases_codes() {
        let registry = LanguageRegistry::new([" EN ", "Es"], "ES").unwrap();
        assert!(registry.is_supported("en"));
        assert!(registry.is_supported("es"));
        assert_eq!(registry.default_language().code(), "es");
    }

    #[test]
    fn test_new_rejects_empty_set() {
        let result = LanguageRegistry::new(Vec::<String>::new(), "en");
        assert_eq!(result.unwrap_err(), RegistryError::Empty);
    }

    #[test]
    fn test_new_rejects_unknown_default() {
        let result = LanguageRegistry::new(["en", "es"], "fr");
        assert_eq!(
            result.unwrap_err(),
            RegistryError::UnknownDefault("fr".to_string())
        );
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = LanguageRegistry::new(["en", "es", "EN"], "en");
        assert_eq!(result.unwrap_err(), RegistryError::Duplicate("en".to_string()));
    }

    #[test]
    fn test_new_rejects_malformed_codes() {
        assert!(matches!(
            LanguageRegistry::new(["en", "e s"], "en"),
            Err(RegistryError::InvalidCode(_))
        ));
        assert!(matches!(
            LanguageRegistry::new(["english"], "english"),
            Err(RegistryError::InvalidCode(_))
        ));
        assert!(LanguageRegistry::new(["pt-br", "en"], "en").is_ok());
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_by_code() {
        let registry = registry();
        assert_eq!(registry.get("es").map(|l| l.code()), Some("es"));
        assert!(registry.get("fr").is_none());
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_supported() {
        assert_eq!(registry().normalize("es"), "es");
        assert_eq!(registry().normalize("en"), "en");
    }

    #[test]
    fn test_normalize_ignores_case_and_whitespace() {
        assert_eq!(registry().normalize(" ES "), "es");
    }

    #[test]
    fn test_normalize_unsupported_falls_back_to_default() {
        let registry = registry();
        assert_eq!(registry.normalize("fr"), "en");
        assert_eq!(registry.normalize(""), "en");
        assert_eq!(registry.normalize("es-MX"), "en");
    }
}
