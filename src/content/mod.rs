//! Raw content entities as supplied by the loader.
//!
//! A [`ContentEntity`] is an immutable snapshot of one stored record. Its
//! translatable attributes keep every language variant side by side; turning
//! them into a single-language view is the job of
//! [`crate::i18n::TranslationResolver`].

mod dates;

pub use dates::{format_date, parse_date, DateRange, DATE_FORMAT};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building content values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("Unknown resource: '{0}'")]
    UnknownResource(String),

    #[error("Invalid date: '{0}' (expected YYYY/MM/DD)")]
    InvalidDate(String),

    #[error("End date {end} is earlier than start date {start}")]
    InvalidDateRange { start: String, end: String },
}

/// The fixed set of resources served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    About,
    Skills,
    Projects,
    Experience,
    Education,
    Contact,
    SiteConfig,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::About,
        ResourceKind::Skills,
        ResourceKind::Projects,
        ResourceKind::Experience,
        ResourceKind::Education,
        ResourceKind::Contact,
        ResourceKind::SiteConfig,
    ];

    /// Token used in URLs, cache keys and seed documents.
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceKind::About => "about",
            ResourceKind::Skills => "skills",
            ResourceKind::Projects => "projects",
            ResourceKind::Experience => "experience",
            ResourceKind::Education => "education",
            ResourceKind::Contact => "contact",
            ResourceKind::SiteConfig => "site-config",
        }
    }

    /// Singletons are served as one object rather than a list.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            ResourceKind::About | ResourceKind::Contact | ResourceKind::SiteConfig
        )
    }

    /// Dated resources carry a [`DateRange`] and are served in date order.
    pub fn is_dated(&self) -> bool {
        matches!(self, ResourceKind::Experience | ResourceKind::Education)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ResourceKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| ContentError::UnknownResource(s.to_string()))
    }
}

/// All language variants of one translatable attribute, keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    variants: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text for a language, replacing any previous value.
    pub fn set(&mut self, language: &str, text: impl Into<String>) {
        self.variants.insert(language.to_string(), text.into());
    }

    /// Text for a language, or `None` when missing or empty.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.variants
            .get(language)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    pub fn has(&self, language: &str) -> bool {
        self.get(language).is_some()
    }
}

impl<K, V> FromIterator<(K, V)> for LocalizedText
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variants: iter
                .into_iter()
                .map(|(language, text)| (language.into(), text.into()))
                .collect(),
        }
    }
}

/// One stored record: identifier, plain attributes, per-language attributes
/// and, for dated resources, its date range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentEntity {
    pub id: i64,
    pub attributes: Map<String, Value>,
    pub translations: BTreeMap<String, LocalizedText>,
    pub dates: Option<DateRange>,
}

impl ContentEntity {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Add one language variant of a translatable attribute.
    pub fn with_text(mut self, field: &str, language: &str, text: impl Into<String>) -> Self {
        self.translations
            .entry(field.to_string())
            .or_default()
            .set(language, text);
        self
    }

    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = Some(dates);
        self
    }

    /// Names of translatable attributes lacking text in `language`.
    pub fn missing_fields(&self, language: &str) -> Vec<&str> {
        self.translations
            .iter()
            .filter(|(_, text)| !text.has(language))
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ResourceKind Tests ====================

    #[test]
    fn test_resource_from_slug() {
        assert_eq!("about".parse::<ResourceKind>(), Ok(ResourceKind::About));
        assert_eq!(
            "site-config".parse::<ResourceKind>(),
            Ok(ResourceKind::SiteConfig)
        );
        assert_eq!(
            "experience".parse::<ResourceKind>(),
            Ok(ResourceKind::Experience)
        );
    }

    #[test]
    fn test_resource_from_unknown_slug() {
        let result = "blog".parse::<ResourceKind>();
        assert_eq!(result, Err(ContentError::UnknownResource("blog".to_string())));
    }

    #[test]
    fn test_every_slug_round_trips() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.slug().parse::<ResourceKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.slug());
        }
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&ResourceKind::SiteConfig).unwrap();
        assert_eq!(json, "\"site-config\"");
    }

    #[test]
    fn test_singletons_and_dated_kinds() {
        assert!(ResourceKind::About.is_singleton());
        assert!(ResourceKind::Contact.is_singleton());
        assert!(ResourceKind::SiteConfig.is_singleton());
        assert!(!ResourceKind::Projects.is_singleton());

        assert!(ResourceKind::Experience.is_dated());
        assert!(ResourceKind::Education.is_dated());
        assert!(!ResourceKind::Skills.is_dated());
    }

    // ==================== LocalizedText Tests ====================

    #[test]
    fn test_empty_text_counts_as_missing() {
        let text: LocalizedText = [("en", "Engineer"), ("es", "")].into_iter().collect();
        assert_eq!(text.get("en"), Some("Engineer"));
        assert_eq!(text.get("es"), None);
        assert!(!text.has("es"));
        assert!(!text.has("fr"));
    }

    // ==================== ContentEntity Tests ====================

    #[test]
    fn test_missing_fields() {
        let entity = ContentEntity::new(1)
            .with_text("title", "en", "Portfolio")
            .with_text("title", "es", "Portafolio")
            .with_text("description", "en", "A site");

        assert!(entity.missing_fields("en").is_empty());
        assert_eq!(entity.missing_fields("es"), vec!["description"]);
    }
}
