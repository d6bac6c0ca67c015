//! SKU→variant mapping store with live reload.
//!
//! The mapping is process-wide mutable state. Reload replaces the whole map
//! behind an `Arc` swap rather than mutating in place, so concurrent readers
//! observe either the old or the new mapping, never a partial one. A failed
//! reload leaves the previously loaded mapping serving.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;

use crate::config::MappingSource;

/// A SKU→identifier mapping as read from its source.
pub type Mapping = HashMap<String, String>;

/// Errors that can occur when loading the mapping from its source.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file could not be read.
    #[error("failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// The source is not valid JSON.
    #[error("invalid mapping JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source parsed, but is not an object of SKU→identifier pairs.
    #[error("mapping must be a JSON object of {{SKU: id}} pairs")]
    NotAnObject,
}

/// Load the mapping from its configured source.
///
/// The source must decode to a JSON object; values are stringified so that
/// numeric variant IDs and GID strings are both accepted.
///
/// # Errors
///
/// Returns `MappingError` if the source is unreadable, not JSON, or not an
/// object of scalar values.
pub fn load(source: &MappingSource) -> Result<Mapping, MappingError> {
    let raw = match source {
        MappingSource::File(path) => std::fs::read_to_string(path)?,
        MappingSource::Inline(blob) => blob.clone(),
    };

    let value: Value = serde_json::from_str(&raw)?;
    let Value::Object(entries) = value else {
        return Err(MappingError::NotAnObject);
    };

    let mut mapping = Mapping::with_capacity(entries.len());
    for (sku, id) in entries {
        let id = match id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return Err(MappingError::NotAnObject),
        };
        mapping.insert(sku, id);
    }
    Ok(mapping)
}

/// Shared, atomically replaceable view of the current mapping.
#[derive(Debug, Default)]
pub struct MappingStore {
    current: RwLock<Arc<Mapping>>,
}

impl MappingStore {
    /// Create a store holding an initial mapping.
    #[must_use]
    pub fn new(initial: Mapping) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Get the current mapping.
    ///
    /// The returned `Arc` stays valid across concurrent reloads.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Mapping> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // A poisoned lock still holds a consistent Arc.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the mapping wholesale, returning the new entry count.
    pub fn replace(&self, next: Mapping) -> usize {
        let count = next.len();
        let next = Arc::new(next);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_inline_object() {
        let source = MappingSource::Inline(
            r#"{"SKU-1": "gid://shopify/ProductVariant/111", "SKU-2": "222"}"#.to_string(),
        );
        let mapping = load(&source).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("SKU-1").unwrap(),
            "gid://shopify/ProductVariant/111"
        );
    }

    #[test]
    fn test_load_stringifies_numeric_ids() {
        let source = MappingSource::Inline(r#"{"SKU-1": 12345}"#.to_string());
        let mapping = load(&source).unwrap();
        assert_eq!(mapping.get("SKU-1").unwrap(), "12345");
    }

    #[test]
    fn test_load_rejects_array() {
        let source = MappingSource::Inline(r#"["SKU-1"]"#.to_string());
        assert!(matches!(load(&source), Err(MappingError::NotAnObject)));
    }

    #[test]
    fn test_load_rejects_nested_values() {
        let source = MappingSource::Inline(r#"{"SKU-1": {"id": 1}}"#.to_string());
        assert!(matches!(load(&source), Err(MappingError::NotAnObject)));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let source = MappingSource::Inline("not json".to_string());
        assert!(matches!(load(&source), Err(MappingError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let source = MappingSource::File("/nonexistent/mapping.json".into());
        assert!(matches!(load(&source), Err(MappingError::Io(_))));
    }

    #[test]
    fn test_store_replace_swaps_whole_mapping() {
        let store = MappingStore::new(Mapping::from([("OLD".to_string(), "1".to_string())]));

        // A snapshot taken before the reload keeps serving the old mapping
        let before = store.snapshot();

        let count = store.replace(Mapping::from([
            ("NEW-A".to_string(), "2".to_string()),
            ("NEW-B".to_string(), "3".to_string()),
        ]));
        assert_eq!(count, 2);

        assert!(before.contains_key("OLD"));
        let after = store.snapshot();
        assert!(!after.contains_key("OLD"));
        assert!(after.contains_key("NEW-A"));
    }

    #[test]
    fn test_store_default_is_empty() {
        let store = MappingStore::default();
        assert!(store.snapshot().is_empty());
    }
}
