//! Where raw entities come from.
//!
//! [`ContentSource`] is the seam to the persistence layer. [`InMemorySource`]
//! serves a snapshot loaded from a JSON seed document whose rows use the
//! storage layout: one column per language variant (`title_en`, `title_es`).

use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::content::{ContentEntity, ContentError, DateRange, ResourceKind};
use crate::i18n::{LanguageRegistry, RESERVED_KEYS};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Seed document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Seed document must be an object keyed by resource name")]
    NotAnObject,

    #[error("Seed entry for {resource} must be an array of rows")]
    NotAnArray { resource: ResourceKind },

    #[error("Invalid seed data: {0}")]
    Content(#[from] ContentError),

    #[error("Invalid {resource} row #{index}: {reason}")]
    InvalidRow {
        resource: ResourceKind,
        index: usize,
        reason: String,
    },
}

/// Supplies raw entities to the delivery pipeline.
pub trait ContentSource: Send + Sync {
    /// All records of a resource, in storage order.
    fn list(&self, resource: ResourceKind) -> Result<Vec<ContentEntity>, SourceError>;

    /// One record by identifier.
    fn get(&self, resource: ResourceKind, id: i64) -> Result<Option<ContentEntity>, SourceError>;
}

/// An immutable in-process snapshot of all content.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    entities: HashMap<ResourceKind, Vec<ContentEntity>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to a resource's collection.
    pub fn insert(&mut self, resource: ResourceKind, entity: ContentEntity) {
        self.entities.entry(resource).or_default().push(entity);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_entity(mut self, resource: ResourceKind, entity: ContentEntity) -> Self {
        self.insert(resource, entity);
        self
    }

    /// Total number of entities across all resources.
    pub fn len(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a seed document from disk.
    pub fn from_json_file(
        path: impl AsRef<Path>,
        registry: &LanguageRegistry,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let source = Self::from_json_str(&raw, registry)?;
        info!(
            "Loaded {} content records from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    /// Parse a seed document of the form `{ "<resource>": [ {row}, ... ] }`.
    pub fn from_json_str(raw: &str, registry: &LanguageRegistry) -> Result<Self, SourceError> {
        let document: Value = serde_json::from_str(raw)?;
        let Value::Object(resources) = document else {
            return Err(SourceError::NotAnObject);
        };

        let mut source = Self::new();
        for (name, rows) in resources {
            let resource: ResourceKind = name.parse()?;
            let Value::Array(rows) = rows else {
                return Err(SourceError::NotAnArray { resource });
            };

            let mut seen = HashSet::new();
            for (index, row) in rows.into_iter().enumerate() {
                let entity = entity_from_row(resource, index, row, registry)?;
                if !seen.insert(entity.id) {
                    return Err(SourceError::InvalidRow {
                        resource,
                        index,
                        reason: format!("duplicate id {}", entity.id),
                    });
                }
                source.insert(resource, entity);
            }
        }

        Ok(source)
    }
}

impl ContentSource for InMemorySource {
    fn list(&self, resource: ResourceKind) -> Result<Vec<ContentEntity>, SourceError> {
        Ok(self.entities.get(&resource).cloned().unwrap_or_default())
    }

    fn get(&self, resource: ResourceKind, id: i64) -> Result<Option<ContentEntity>, SourceError> {
        Ok(self
            .entities
            .get(&resource)
            .and_then(|rows| rows.iter().find(|entity| entity.id == id))
            .cloned())
    }
}

/// Split a storage row into identifier, plain attributes, language variants
/// and, for dated resources, the date range.
fn entity_from_row(
    resource: ResourceKind,
    index: usize,
    row: Value,
    registry: &LanguageRegistry,
) -> Result<ContentEntity, SourceError> {
    let invalid = |reason: String| SourceError::InvalidRow {
        resource,
        index,
        reason,
    };

    let Value::Object(mut fields) = row else {
        return Err(invalid("expected an object".to_string()));
    };

    let id = fields
        .remove("id")
        .and_then(|id| id.as_i64())
        .ok_or_else(|| invalid("missing or non-integer 'id'".to_string()))?;

    let mut entity = ContentEntity::new(id);

    if resource.is_dated() {
        let start = take_date_text(&mut fields, "start_date")
            .map_err(invalid)?
            .ok_or_else(|| invalid(format!("record {} has no start_date", id)))?;
        let end = take_date_text(&mut fields, "end_date").map_err(invalid)?;
        entity.dates = Some(DateRange::parse(&start, end.as_deref())?);
    }

    for (column, value) in fields {
        match split_language_suffix(&column, registry) {
            Some((field, _)) if RESERVED_KEYS.contains(&field) => {
                return Err(invalid(format!(
                    "'{}' would shadow the reserved '{}' key",
                    column, field
                )));
            }
            Some((field, language)) => match value {
                Value::String(text) => {
                    entity = entity.with_text(field, language, text);
                }
                Value::Null => {
                    entity.translations.entry(field.to_string()).or_default();
                }
                other => {
                    return Err(invalid(format!(
                        "'{}' must be text or null, got {}",
                        column, other
                    )));
                }
            },
            None => {
                entity.attributes.insert(column, value);
            }
        }
    }

    let default = registry.default_language();
    for field in entity.missing_fields(default.code()) {
        warn!(
            "{} record {} has no {} text for '{}'",
            resource, id, default, field
        );
    }

    Ok(entity)
}

/// Remove a date column, returning its text; `null` counts as absent.
fn take_date_text(fields: &mut Map<String, Value>, column: &str) -> Result<Option<String>, String> {
    match fields.remove(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(format!("'{}' must be a date string, got {}", column, other)),
    }
}

/// `title_es` -> `("title", "es")` when `es` is a supported language.
fn split_language_suffix<'a>(
    column: &'a str,
    registry: &'a LanguageRegistry,
) -> Option<(&'a str, &'a str)> {
    let (field, suffix) = column.rsplit_once('_')?;
    if field.is_empty() {
        return None;
    }
    registry
        .get(suffix)
        .map(|language| (field, language.code()))
}
