//! Multilingual content delivery for a personal website.
//!
//! Every read goes through the same pipeline: entities are loaded from a
//! [`source::ContentSource`], date-ranged collections are put in display order
//! ([`ordering`]), each entity is collapsed to a single language
//! ([`i18n::TranslationResolver`]) and the serialized result is kept in a
//! [`cache::ResponseCache`] keyed by resource, identifier and language.

pub mod cache;
pub mod config;
pub mod content;
pub mod delivery;
pub mod i18n;
pub mod ordering;
pub mod server;
pub mod source;
