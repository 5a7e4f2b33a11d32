//! Language tag: a validated member of the configured language set.
//!
//! Tags are only handed out by [`LanguageRegistry`](super::LanguageRegistry),
//! so holding one means the language is supported.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A supported language, identified by its lowercase code (e.g. "en", "es").
///
/// Cloning is cheap; the code is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageTag {
    code: Arc<str>,
}

impl LanguageTag {
    /// Only the registry constructs tags, after validating the code.
    pub(super) fn new(code: &str) -> Self {
        Self { code: code.into() }
    }

    /// The ISO 639-1 style code (e.g. "en", "es").
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

impl PartialEq<str> for LanguageTag {
    fn eq(&self, other: &str) -> bool {
        &*self.code == other
    }
}

impl PartialEq<&str> for LanguageTag {
    fn eq(&self, other: &&str) -> bool {
        &*self.code == *other
    }
}
