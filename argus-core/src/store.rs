//! Document store collaborator.
//!
//! The index never owns raw field values; at apply time the write worker
//! asks the store for the current bytes of `(doc_id, field_id)`. Numeric
//! fields hand back their fixed-width little-endian representation, string
//! fields a delimiter-joined tag list.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{DocId, FieldId};

/// Source of raw field bytes, supplied by the embedding engine.
///
/// `get_raw` returns an owned copy so the bytes stay readable for the whole
/// apply step regardless of concurrent document updates.
pub trait DocumentStore: Send + Sync + 'static {
    fn get_raw(&self, doc_id: DocId, field_id: FieldId) -> Option<Vec<u8>>;
}

/// In-memory document store.
///
/// Cloning yields another handle to the same underlying map, so a test (or
/// a small embedding host) can keep writing documents while the index holds
/// its own handle.
#[derive(Clone, Default)]
pub struct MemDocumentStore {
    fields: Arc<RwLock<FxHashMap<(DocId, FieldId), Vec<u8>>>>,
}

impl MemDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, doc_id: DocId, field_id: FieldId, raw: impl Into<Vec<u8>>) {
        self.fields.write().insert((doc_id, field_id), raw.into());
    }

    pub fn remove(&self, doc_id: DocId, field_id: FieldId) {
        self.fields.write().remove(&(doc_id, field_id));
    }
}

impl DocumentStore for MemDocumentStore {
    fn get_raw(&self, doc_id: DocId, field_id: FieldId) -> Option<Vec<u8>> {
        self.fields.read().get(&(doc_id, field_id)).cloned()
    }
}
