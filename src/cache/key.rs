//! Cache keys and TTL classes.

use std::fmt;

use crate::content::ResourceKind;
use crate::i18n::LanguageTag;

/// Identifies one cached response.
///
/// The language is always a registry tag, so unsupported request codes share
/// the default language's entry instead of growing the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: ResourceKind,
    id: Option<i64>,
    language: LanguageTag,
}

impl CacheKey {
    /// Key for a whole collection, or for a singleton resource.
    pub fn collection(resource: ResourceKind, language: LanguageTag) -> Self {
        Self {
            resource,
            id: None,
            language,
        }
    }

    /// Key for one record of a collection.
    pub fn item(resource: ResourceKind, id: i64, language: LanguageTag) -> Self {
        Self {
            resource,
            id: Some(id),
            language,
        }
    }

    /// Create a key for a collection (`id = None`) or one of its records.
    ///
    /// # Arguments
    /// * `resource` - The resource being served
    /// * `id` - Record identifier, or `None` for the whole collection or a singleton
    /// * `language` - The normalized request language
    pub fn new(resource: ResourceKind, id: Option<i64>, language: LanguageTag) -> Self {
        Self {
            resource,
            id,
            language,
        }
    }

    /// Get the resource this key belongs to.
    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Get the record identifier, if the key addresses a single record.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Get the language the cached payload was resolved for.
    pub fn language(&self) -> &LanguageTag {
        &self.language
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}:{}:lang:{}", self.resource, id, self.language),
            None => write!(f, "{}:all:lang:{}", self.resource, self.language),
        }
    }
}

/// Which configured TTL applies to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Regular content; short TTL.
    Content,
    /// Rarely changing resources such as site configuration; long TTL.
    Static,
}

impl TtlClass {
    /// Get the TTL class for a resource: static for site configuration,
    /// content for everything else.
    pub fn for_resource(resource: ResourceKind) -> Self {
        match resource {
            ResourceKind::SiteConfig => TtlClass::Static,
            _ => TtlClass::Content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageRegistry;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::new(["en", "es"], "en").unwrap()
    }

    #[test]
    fn test_keys_differ_by_language() {
        let registry = registry();
        let en = CacheKey::collection(ResourceKind::Projects, registry.normalize("en"));
        let es = CacheKey::collection(ResourceKind::Projects, registry.normalize("es"));
        assert_ne!(en, es);
    }

    #[test]
    fn test_unsupported_language_shares_default_key() {
        let registry = registry();
        let fr = CacheKey::collection(ResourceKind::Skills, registry.normalize("fr"));
        let en = CacheKey::collection(ResourceKind::Skills, registry.normalize("en"));
        assert_eq!(fr, en);
    }

    #[test]
    fn test_item_and_collection_keys_differ() {
        let lang = registry().normalize("en");
        assert_ne!(
            CacheKey::item(ResourceKind::Projects, 1, lang.clone()),
            CacheKey::collection(ResourceKind::Projects, lang)
        );
    }

    #[test]
    fn test_display() {
        let lang = registry().normalize("es");
        assert_eq!(
            CacheKey::item(ResourceKind::Experience, 4, lang.clone()).to_string(),
            "experience:4:lang:es"
        );
        assert_eq!(
            CacheKey::collection(ResourceKind::SiteConfig, lang).to_string(),
            "site-config:all:lang:es"
        );
    }

    #[test]
    fn test_ttl_class_for_resource() {
        assert_eq!(TtlClass::for_resource(ResourceKind::SiteConfig), TtlClass::Static);
        assert_eq!(TtlClass::for_resource(ResourceKind::About), TtlClass::Content);
        assert_eq!(TtlClass::for_resource(ResourceKind::Experience), TtlClass::Content);
    }
}
