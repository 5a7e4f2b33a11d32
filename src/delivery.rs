//! The read pipeline: cache lookup, load, order, resolve, serialize, store.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheKey, ResponseCache, TtlClass};
use crate::content::{ContentEntity, ResourceKind};
use crate::i18n::{LanguageRegistry, LanguageTag, ResolvedProjection, TranslationResolver};
use crate::ordering::{self, MissingDateRange};
use crate::source::{ContentSource, SourceError};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{resource} record {id} not found")]
    NotFound { resource: ResourceKind, id: i64 },

    #[error("{resource} has not been configured")]
    NotConfigured { resource: ResourceKind },

    #[error("{resource} is a single record and cannot be fetched by id")]
    IdOnSingleton { resource: ResourceKind },

    #[error("{resource} record {id} has no date range")]
    MissingDateRange { resource: ResourceKind, id: i64 },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where a delivered payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Caching is disabled in this environment.
    Bypass,
}

impl CacheStatus {
    /// Get the `x-cache` header value.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Bypass => "BYPASS",
        }
    }
}

/// A serialized response and what is needed to describe it.
#[derive(Debug, Clone)]
pub struct Delivered {
    pub payload: Bytes,
    /// The normalized request language.
    pub language: LanguageTag,
    pub status: CacheStatus,
    /// How long the payload stays fresh: the full TTL for a newly built
    /// response, what is left of it for a cache hit.
    pub ttl: Duration,
}

pub struct ContentDelivery {
    source: Arc<dyn ContentSource>,
    resolver: TranslationResolver,
    cache: Arc<ResponseCache>,
}

impl ContentDelivery {
    /// Create a pipeline over a content source and a shared cache.
    ///
    /// # Arguments
    /// * `source` - Where raw entities are loaded from on a cache miss
    /// * `registry` - Supported languages and the default
    /// * `cache` - The response cache, shared with whoever reports its statistics
    pub fn new(
        source: Arc<dyn ContentSource>,
        registry: Arc<LanguageRegistry>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            source,
            resolver: TranslationResolver::new(registry),
            cache,
        }
    }

    /// Get the response cache shared with the HTTP layer.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Get the language registry requests are normalized against.
    pub fn registry(&self) -> &LanguageRegistry {
        self.resolver.registry()
    }

    /// Deliver a resource (`id = None`) or one of its records, resolved for
    /// `requested` (normalized to the default language when unsupported).
    pub fn fetch(
        &self,
        resource: ResourceKind,
        id: Option<i64>,
        requested: &str,
    ) -> Result<Delivered, DeliveryError> {
        if id.is_some() && resource.is_singleton() {
            return Err(DeliveryError::IdOnSingleton { resource });
        }

        let language = self.resolver.registry().normalize(requested);
        let class = TtlClass::for_resource(resource);
        let key = CacheKey::new(resource, id, language.clone());

        if let Some(hit) = self.cache.lookup(&key) {
            debug!(key = %key, "Serving cached response");
            return Ok(Delivered {
                payload: hit.payload,
                language,
                status: CacheStatus::Hit,
                ttl: hit.remaining,
            });
        }

        let payload = Bytes::from(self.render(resource, id, &language)?);
        self.cache.put(key, payload.clone(), class);

        let status = if self.cache.is_bypassed() {
            CacheStatus::Bypass
        } else {
            CacheStatus::Miss
        };

        Ok(Delivered {
            payload,
            language,
            status,
            ttl: self.cache.policy().ttl_for(class),
        })
    }

    fn render(
        &self,
        resource: ResourceKind,
        id: Option<i64>,
        language: &LanguageTag,
    ) -> Result<Vec<u8>, DeliveryError> {
        match id {
            Some(id) => {
                let entity = self
                    .source
                    .get(resource, id)?
                    .ok_or(DeliveryError::NotFound { resource, id })?;
                check_dated(resource, &entity)?;
                Ok(serde_json::to_vec(&self.resolver.resolve_for(&entity, language))?)
            }
            None if resource.is_singleton() => {
                let entity = self
                    .source
                    .list(resource)?
                    .into_iter()
                    .next()
                    .ok_or(DeliveryError::NotConfigured { resource })?;
                Ok(serde_json::to_vec(&self.resolver.resolve_for(&entity, language))?)
            }
            None => {
                let entities = self.source.list(resource)?;
                let entities = if resource.is_dated() {
                    ordering::order_entities(entities).map_err(|MissingDateRange { id }| {
                        DeliveryError::MissingDateRange { resource, id }
                    })?
                } else {
                    ordering::order_by_display(entities)
                };
                let projections: Vec<ResolvedProjection> = entities
                    .iter()
                    .map(|entity| self.resolver.resolve_for(entity, language))
                    .collect();
                Ok(serde_json::to_vec(&projections)?)
            }
        }
    }
}

fn check_dated(resource: ResourceKind, entity: &ContentEntity) -> Result<(), DeliveryError> {
    if resource.is_dated() && entity.dates.is_none() {
        return Err(DeliveryError::MissingDateRange {
            resource,
            id: entity.id,
        });
    }
    Ok(())
}
