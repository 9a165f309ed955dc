//! End-to-end tests over the public `MultiFieldIndex` API: every write goes
//! through the queue and the worker, every read through `search`.

mod range;

use crate::store::MemDocumentStore;
use crate::{DocId, FieldKind, MultiFieldIndex};

/// Field ids used throughout: 0 = numeric i32, 1 = tags.
const NUMERIC: u32 = 0;
const TAGS: u32 = 1;

fn fixture() -> (
    MultiFieldIndex<MemDocumentStore>,
    MemDocumentStore,
    tempfile::TempDir,
) {
    let dir = tempfile::tempdir().unwrap();
    let store = MemDocumentStore::new();
    let index = MultiFieldIndex::new(dir.path(), store.clone()).unwrap();
    index.add_field(NUMERIC, FieldKind::Numeric).unwrap();
    index.add_field(TAGS, FieldKind::Tags).unwrap();
    (index, store, dir)
}

fn put_i32(
    store: &MemDocumentStore,
    index: &MultiFieldIndex<MemDocumentStore>,
    doc: DocId,
    value: i32,
) {
    store.put(doc, NUMERIC, value.to_le_bytes());
    index.add(doc, NUMERIC).unwrap();
}

fn put_tags(
    store: &MemDocumentStore,
    index: &MultiFieldIndex<MemDocumentStore>,
    doc: DocId,
    tags: &[u8],
) {
    store.put(doc, TAGS, tags);
    index.add(doc, TAGS).unwrap();
}
