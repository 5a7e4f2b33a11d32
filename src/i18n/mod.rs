//! Internationalization (i18n) module for multi-language content.
//!
//! # Architecture
//!
//! - `registry`: the configured, ordered set of supported languages and its default
//! - `language`: validated `LanguageTag` handed out by the registry
//! - `resolver`: collapses per-language attributes into a single-language projection
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use portfolio_content::i18n::{LanguageRegistry, TranslationResolver};
//!
//! let registry = Arc::new(LanguageRegistry::new(["en", "es"], "en")?);
//! let resolver = TranslationResolver::new(registry);
//! let projection = resolver.resolve(&entity, "es");
//! ```

mod language;
mod registry;
mod resolver;

pub use language::LanguageTag;
pub use registry::{LanguageRegistry, RegistryError};
pub use resolver::{ResolvedProjection, TranslationResolver};
pub(crate) use resolver::RESERVED_KEYS;
