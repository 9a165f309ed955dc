//! Multi-field index: ownership, write dispatch, and query planning.
//!
//! # Architecture
//!
//! ```text
//! add()/delete() ──try_send──► [bounded write queue] ──recv──► write worker
//!                                                                  │
//!                                          DocumentStore::get_raw ◄┘
//!                                          FieldIndex::add/delete
//!                                                │ replaced buffers
//!                                                ▼
//!                              [reclaim queue] ──recv──► reclaim worker
//!
//! search(filters) ─► per-field range/tag lookup ─► driver-seeded intersect
//! ```
//!
//! The write worker is the only mutator; queries run on the caller's thread
//! against lock-free posting state and may briefly trail the newest writes.

mod field;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

pub use field::{FieldIndex, FieldKind};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::keymap::KeyMapParams;
use crate::query::{FilterInfo, MultiRangeResult, SearchOutcome, intersect};
use crate::reclaim::{RECLAIM_QUEUE_CAPACITY, ReclaimQueue, run_reclaim_worker};
use crate::store::DocumentStore;
use crate::{DocId, FieldId};

use field::{FieldSearch, tokenize};
use writer::{FieldOp, OpKind, WRITE_QUEUE_CAPACITY, run_write_worker};

/// State shared between the public handle and the background workers.
pub(crate) struct Shared<S: DocumentStore> {
    pub(crate) store: S,
    /// One slot per field id; `None` for fields without an index.
    fields: RwLock<Vec<Option<Arc<FieldIndex>>>>,
    pub(crate) reclaim: ReclaimQueue,
    pub(crate) running: Arc<AtomicBool>,
    pub(crate) writer_done: Arc<AtomicBool>,
    pub(crate) enqueued: AtomicU64,
    pub(crate) applied: AtomicU64,
}

impl<S: DocumentStore> Shared<S> {
    pub(crate) fn field(&self, field_id: FieldId) -> Option<Arc<FieldIndex>> {
        self.fields.read().get(field_id as usize)?.clone()
    }
}

/// Aggregate live posting-buffer memory across all fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexMemory {
    pub dense_bytes: u64,
    pub sparse_bytes: u64,
    pub posting_sets: usize,
}

/// The top-level index: one optional `FieldIndex` per field id, the write
/// queue feeding the single write worker, and the reclamation worker.
pub struct MultiFieldIndex<S: DocumentStore> {
    path: PathBuf,
    shared: Arc<Shared<S>>,
    write_tx: Sender<FieldOp>,
    write_worker: Option<JoinHandle<()>>,
    reclaim_worker: Option<JoinHandle<()>>,
}

impl<S: DocumentStore> MultiFieldIndex<S> {
    /// Open an index rooted at `path` over the given document store, and
    /// start both background workers.
    pub fn new(path: impl AsRef<Path>, store: S) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;

        let running = Arc::new(AtomicBool::new(true));
        let writer_done = Arc::new(AtomicBool::new(false));
        let (reclaim, reclaim_rx) = ReclaimQueue::new(RECLAIM_QUEUE_CAPACITY);
        let shared = Arc::new(Shared {
            store,
            fields: RwLock::new(Vec::new()),
            reclaim,
            running: Arc::clone(&running),
            writer_done: Arc::clone(&writer_done),
            enqueued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        });

        let (write_tx, write_rx) = crossbeam_channel::bounded(WRITE_QUEUE_CAPACITY);
        let write_worker = std::thread::Builder::new()
            .name("argus-write".into())
            .spawn({
                let shared = Arc::clone(&shared);
                move || run_write_worker(write_rx, shared)
            })?;
        let reclaim_worker = std::thread::Builder::new()
            .name("argus-reclaim".into())
            .spawn(move || run_reclaim_worker(reclaim_rx, running, writer_done))?;

        Ok(MultiFieldIndex {
            path,
            shared,
            write_tx,
            write_worker: Some(write_worker),
            reclaim_worker: Some(reclaim_worker),
        })
    }

    /// Attach an index to `field_id`. Fields without an index accept writes
    /// as no-ops and leave queries unconstrained.
    pub fn add_field(&self, field_id: FieldId, kind: FieldKind) -> Result<()> {
        let index = FieldIndex::create(&self.path, field_id, kind, &KeyMapParams::default())?;
        let mut fields = self.shared.fields.write();
        if fields.len() <= field_id as usize {
            fields.resize(field_id as usize + 1, None);
        }
        if fields[field_id as usize].is_some() {
            return Err(Error::FieldExists(field_id));
        }
        fields[field_id as usize] = Some(Arc::new(index));
        Ok(())
    }

    /// Enqueue an add for `(doc_id, field_id)`; returns once queued. The
    /// raw value is fetched from the store when the op applies, so it must
    /// be in the store by then.
    pub fn add(&self, doc_id: DocId, field_id: FieldId) -> Result<()> {
        self.enqueue(OpKind::Add, doc_id, field_id)
    }

    /// Enqueue a delete. The raw value must still be readable from the
    /// store when the op applies.
    pub fn delete(&self, doc_id: DocId, field_id: FieldId) -> Result<()> {
        self.enqueue(OpKind::Delete, doc_id, field_id)
    }

    fn enqueue(&self, kind: OpKind, doc_id: DocId, field_id: FieldId) -> Result<()> {
        if self.shared.field(field_id).is_none() {
            return Ok(());
        }
        self.write_tx
            .try_send(FieldOp {
                kind,
                doc_id,
                field_id,
            })
            .map_err(|_| {
                log::error!("write queue full: dropping {kind:?} doc {doc_id} field {field_id}");
                Error::QueueFull
            })?;
        self.shared.enqueued.fetch_add(1, Relaxed);
        Ok(())
    }

    /// Block until every write enqueued before this call has been applied.
    /// A query issued afterwards sees all of them.
    pub fn quiesce(&self) {
        let target = self.shared.enqueued.load(Relaxed);
        while self.shared.applied.load(Relaxed) < target {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Evaluate `filters` as a conjunction.
    ///
    /// Intersection-semantics tag filters are flattened into one filter per
    /// token, turning `tags AND` into separate lookups for the intersector.
    /// A filter naming a field with no index makes the whole query
    /// unconstrained. With several filters, an empty per-field result
    /// short-circuits, and the cheapest result seeds the intersection.
    pub fn search(&self, filters: &[FilterInfo]) -> SearchOutcome {
        let fields = self.shared.fields.read();
        let field_of = |id: FieldId| -> Option<Arc<FieldIndex>> { fields.get(id as usize)?.clone() };

        let mut flat: Vec<FilterInfo> = Vec::with_capacity(filters.len());
        for filter in filters {
            let Some(index) = field_of(filter.field_id) else {
                return SearchOutcome::Unconstrained;
            };
            if !index.is_numeric() && !filter.is_union {
                for token in tokenize(&filter.lower, index.delimiter()) {
                    flat.push(FilterInfo::tags(filter.field_id, token, false));
                }
            } else {
                flat.push(filter.clone());
            }
        }

        let run = |filter: &FilterInfo| -> Option<FieldSearch> {
            let index = field_of(filter.field_id)?;
            Some(if index.is_numeric() {
                index.search_range(&filter.lower, &filter.upper)
            } else {
                index.search_tags(&filter.lower)
            })
        };

        if flat.len() == 1 {
            return match run(&flat[0]) {
                None => SearchOutcome::Unconstrained,
                Some(FieldSearch::Empty) => SearchOutcome::Empty,
                Some(FieldSearch::Hits { result, .. }) => {
                    let mut out = MultiRangeResult::default();
                    out.push(result);
                    SearchOutcome::Matched(out)
                }
            };
        }

        let mut results: Vec<crate::query::RangeResult> = Vec::with_capacity(flat.len());
        let mut driver = 0usize;
        let mut cheapest = u64::MAX;
        for filter in &flat {
            match run(filter) {
                None => continue,
                Some(FieldSearch::Empty) => return SearchOutcome::Empty,
                Some(FieldSearch::Hits { result, cost }) => {
                    if cost < cheapest {
                        cheapest = cost;
                        driver = results.len();
                    }
                    results.push(result);
                }
            }
        }
        if results.is_empty() {
            return SearchOutcome::Unconstrained;
        }

        match intersect(&results, driver) {
            None => SearchOutcome::Empty,
            Some(combined) => {
                let mut out = MultiRangeResult::default();
                out.push(combined);
                SearchOutcome::Matched(out)
            }
        }
    }

    /// Aggregate live posting-buffer memory.
    pub fn memory_usage(&self) -> IndexMemory {
        let fields = self.shared.fields.read();
        let mut usage = IndexMemory::default();
        for field in fields.iter().flatten() {
            let (dense, sparse) = field.heap_bytes();
            usage.dense_bytes += dense;
            usage.sparse_bytes += sparse;
            usage.posting_sets += field.posting_sets();
        }
        usage
    }
}

impl<S: DocumentStore> Drop for MultiFieldIndex<S> {
    fn drop(&mut self) {
        self.shared.running.store(false, Relaxed);
        // The write worker drains its queue first; reclamation winds down
        // behind it once no more buffers can be retired.
        if let Some(worker) = self.write_worker.take()
            && worker.join().is_err()
        {
            log::error!("write worker panicked");
        }
        if let Some(worker) = self.reclaim_worker.take()
            && worker.join().is_err()
        {
            log::error!("reclaim worker panicked");
        }
    }
}
