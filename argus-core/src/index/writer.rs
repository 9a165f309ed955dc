//! Write queue: asynchronous application of field mutations.
//!
//! `add`/`delete` enqueue an `(op, doc_id, field_id)` record and return;
//! the single write worker resolves the raw bytes from the document store
//! at apply time and mutates the target field index. The worker is the only
//! mutator of any posting state, which is what lets queries read lock-free.
//!
//! Visibility contract: a query at wall time `T` sees every write whose
//! enqueue completed before `T - ε`, where ε is the worker's lag. Callers
//! that need a hard boundary use `MultiFieldIndex::quiesce`.

use std::sync::Arc;
use std::sync::atomic::Ordering::Relaxed;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::reclaim::DEQUEUE_TIMEOUT;
use crate::store::DocumentStore;
use crate::{DocId, FieldId};

use super::Shared;

/// Write pipeline capacity, in pending operations.
pub(crate) const WRITE_QUEUE_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    Add,
    Delete,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldOp {
    pub(crate) kind: OpKind,
    pub(crate) doc_id: DocId,
    pub(crate) field_id: FieldId,
}

/// Worker loop: drain the queue until shutdown is signalled and the queue
/// has been empty for a full dequeue timeout, then mark the writer finished
/// so reclamation can wind down behind it.
pub(crate) fn run_write_worker<S: DocumentStore>(rx: Receiver<FieldOp>, shared: Arc<Shared<S>>) {
    loop {
        match rx.recv_timeout(DEQUEUE_TIMEOUT) {
            Ok(op) => {
                apply(&shared, op);
                shared.applied.fetch_add(1, Relaxed);
            }
            Err(RecvTimeoutError::Timeout) => {
                if !shared.running.load(Relaxed) {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    shared.writer_done.store(true, Relaxed);
    log::info!("write worker exited");
}

fn apply<S: DocumentStore>(shared: &Shared<S>, op: FieldOp) {
    let Some(field) = shared.field(op.field_id) else {
        return;
    };
    let Some(raw) = shared.store.get_raw(op.doc_id, op.field_id) else {
        log::warn!(
            "no raw value for doc {} field {}; skipping {:?}",
            op.doc_id,
            op.field_id,
            op.kind
        );
        return;
    };
    match op.kind {
        OpKind::Add => field.add(&raw, op.doc_id, &shared.reclaim),
        OpKind::Delete => field.delete(&raw, op.doc_id),
    }
}
