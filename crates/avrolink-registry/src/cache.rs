//! In-memory schema and subject caches.
//!
//! Two independent maps, each behind its own reader/writer lock:
//!
//! - schema id → compiled codec
//! - subject name → schema id of the version registered through this client
//!
//! No operation touches both maps at once, so a subject's id being cached says
//! nothing about whether that id's codec is cached.
//!
//! The id map is exact: registries never change the schema behind an id. The
//! subject map is a shortcut. Once a subject is cached, later registrations
//! under that name return the cached id even if the registry's latest version
//! has moved on or the caller passes different schema text.

use std::collections::HashMap;
use std::sync::Arc;

use avrolink_core::AvroCodec;
use parking_lot::RwLock;

/// Process-local schema cache owned by a single client.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<u32, Arc<AvroCodec>>>,
    subjects: RwLock<HashMap<String, u32>>,
}

impl SchemaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached codec for a schema id.
    #[must_use]
    pub fn schema(&self, id: u32) -> Option<Arc<AvroCodec>> {
        self.schemas.read().get(&id).cloned()
    }

    /// Caches a codec unless one is already present, and returns the cached one.
    ///
    /// Concurrent misses for the same id may both compile a codec. The first
    /// insert wins and every caller ends up sharing it.
    pub fn put_schema(&self, id: u32, codec: Arc<AvroCodec>) -> Arc<AvroCodec> {
        let mut schemas = self.schemas.write();
        Arc::clone(schemas.entry(id).or_insert(codec))
    }

    /// Returns the cached schema id for a subject.
    #[must_use]
    pub fn subject(&self, subject: &str) -> Option<u32> {
        self.subjects.read().get(subject).copied()
    }

    /// Caches the schema id for a subject.
    pub fn put_subject(&self, subject: &str, id: u32) {
        self.subjects.write().insert(subject.to_string(), id);
    }

    /// Removes a cached codec.
    pub fn invalidate_schema(&self, id: u32) -> Option<Arc<AvroCodec>> {
        self.schemas.write().remove(&id)
    }

    /// Removes a cached subject id.
    pub fn invalidate_subject(&self, subject: &str) -> Option<u32> {
        self.subjects.write().remove(subject)
    }

    /// Clears both maps.
    pub fn clear(&self) {
        self.schemas.write().clear();
        self.subjects.write().clear();
    }

    /// Returns the number of cached codecs.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns the number of cached subjects.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> Arc<AvroCodec> {
        Arc::new(AvroCodec::compile(r#"{"type": "string"}"#).unwrap())
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = SchemaCache::new();
        assert_eq!(cache.schema_count(), 0);
        assert_eq!(cache.subject_count(), 0);
        assert!(cache.schema(1).is_none());
        assert!(cache.subject("orders-value").is_none());
    }

    #[test]
    fn test_put_schema_first_insert_wins() {
        let cache = SchemaCache::new();
        let first = codec();
        let second = codec();

        let stored = cache.put_schema(1, Arc::clone(&first));
        assert!(Arc::ptr_eq(&stored, &first));

        let stored = cache.put_schema(1, second);
        assert!(Arc::ptr_eq(&stored, &first));
        assert!(Arc::ptr_eq(&cache.schema(1).unwrap(), &first));
        assert_eq!(cache.schema_count(), 1);
    }

    #[test]
    fn test_put_subject() {
        let cache = SchemaCache::new();
        cache.put_subject("orders-value", 100_001);
        assert_eq!(cache.subject("orders-value"), Some(100_001));
        assert_eq!(cache.subject("payments-value"), None);
    }

    #[test]
    fn test_maps_are_independent() {
        let cache = SchemaCache::new();
        cache.put_subject("orders-value", 7);
        assert!(cache.schema(7).is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = SchemaCache::new();
        cache.put_schema(1, codec());
        cache.put_schema(2, codec());
        cache.put_subject("orders-value", 1);

        assert!(cache.invalidate_schema(1).is_some());
        assert!(cache.invalidate_schema(1).is_none());
        assert_eq!(cache.invalidate_subject("orders-value"), Some(1));
        assert_eq!(cache.schema_count(), 1);

        cache.clear();
        assert_eq!(cache.schema_count(), 0);
        assert_eq!(cache.subject_count(), 0);
    }
}
