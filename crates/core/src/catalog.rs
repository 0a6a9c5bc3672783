//! The message catalog — candidate lines for broadcast.
//!
//! Loaded once at startup from a text resource where each non-empty trimmed
//! line is one candidate message. The catalog is immutable and non-empty by
//! construction: every constructor rejects an empty result, so downstream
//! code never has to handle the empty case.

use crate::error::CatalogError;
use rand::Rng;
use std::path::Path;

/// A non-empty ordered collection of candidate messages.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: Vec<String>,
}

impl MessageCatalog {
    /// Build a catalog from already-prepared lines. Blank entries are
    /// discarded; an empty remainder is a fatal startup condition.
    pub fn new(messages: Vec<String>) -> Result<Self, CatalogError> {
        let messages: Vec<String> = messages
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        if messages.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { messages })
    }

    /// Parse a text resource: one candidate message per non-empty trimmed line.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        Self::new(text.lines().map(str::to_string).collect())
    }

    /// Load the catalog from a file on disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text)
    }

    /// Select one message uniformly at random, with replacement.
    ///
    /// The random source is injected so selection stays deterministic under
    /// test. There is no exclusion window: consecutive picks may repeat.
    pub fn pick<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> &'a str {
        let index = rng.random_range(0..self.messages.len());
        &self.messages[index]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false — the constructors reject empty catalogs.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}
