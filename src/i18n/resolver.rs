//! Translation resolution: collapse every translatable attribute of an entity
//! to a single language.
//!
//! Responses expose only the resolved value of each attribute plus the
//! `language` / `available_languages` metadata. Per-language variants never
//! leave this module.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::content::{ContentEntity, DateRange};
use crate::i18n::{LanguageRegistry, LanguageTag};

/// Keys the projection itself emits; attributes may not shadow them.
pub(crate) const RESERVED_KEYS: &[&str] = &[
    "id",
    "language",
    "available_languages",
    "start_date",
    "end_date",
];

/// An entity resolved for one language, ready for the serializer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProjection {
    pub id: i64,

    /// Non-translatable attributes, unchanged.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,

    /// One string per translatable attribute.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,

    /// Present only for dated resources.
    #[serde(flatten)]
    pub dates: Option<DateRange>,

    /// The requested language after normalization (before any per-field fallback).
    pub language: LanguageTag,

    /// Languages in which every translatable attribute has text.
    pub available_languages: Vec<LanguageTag>,
}

/// Resolves entities against an injected [`LanguageRegistry`].
#[derive(Debug, Clone)]
pub struct TranslationResolver {
    registry: Arc<LanguageRegistry>,
}

impl TranslationResolver {
    pub fn new(registry: Arc<LanguageRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Resolve an entity for an arbitrary requested language code.
    ///
    /// Unsupported codes are treated as the default language.
    pub fn resolve(&self, entity: &ContentEntity, requested: &str) -> ResolvedProjection {
        let language = self.registry.normalize(requested);
        self.resolve_for(entity, &language)
    }

    /// Resolve an entity for an already normalized language.
    ///
    /// Each attribute uses the requested language's text when non-empty, then
    /// the default language's text, then an empty string.
    pub fn resolve_for(&self, entity: &ContentEntity, language: &LanguageTag) -> ResolvedProjection {
        let default = self.registry.default_language();

        let fields: BTreeMap<String, String> = entity
            .translations
            .iter()
            .map(|(field, text)| {
                let resolved = text
                    .get(language.code())
                    .or_else(|| text.get(default.code()))
                    .unwrap_or_default();
                (field.clone(), resolved.to_string())
            })
            .collect();

        let attributes: Map<String, Value> = entity
            .attributes
            .iter()
            .filter(|(name, _)| {
                let shadowed = RESERVED_KEYS.contains(&name.as_str())
                    || entity.translations.contains_key(name.as_str());
                if shadowed {
                    debug!(
                        entity_id = entity.id,
                        attribute = name.as_str(),
                        "Dropping attribute that collides with a projection key"
                    );
                }
                !shadowed
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        ResolvedProjection {
            id: entity.id,
            attributes,
            fields,
            dates: entity.dates,
            language: language.clone(),
            available_languages: self.available_languages(entity),
        }
    }

    /// Languages for which every translatable attribute is non-empty, in
    /// registry order. A title-only translation does not make an entity
    /// available in that language.
    pub fn available_languages(&self, entity: &ContentEntity) -> Vec<LanguageTag> {
        self.registry
            .languages()
            .iter()
            .filter(|language| {
                entity
                    .translations
                    .values()
                    .all(|text| text.has(language.code()))
            })
            .cloned()
            .collect()
    }
}
