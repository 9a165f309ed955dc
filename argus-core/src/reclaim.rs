//! Timed-release reclamation of replaced posting buffers.
//!
//! Posting buffers are replaced in place (growth, re-envelope, conversion)
//! while queries may still be walking the old buffer through a pointer they
//! captured before the swap. Writers therefore never free in-band: a
//! replaced buffer is enqueued with a deadline one grace period out, and a
//! dedicated worker releases it only after that deadline. The grace period
//! outlives any in-flight read-through; readers never consult reclamation
//! state. Readers additionally pin buffers through their own `Arc` guard,
//! which downgrades an enqueue failure to an eager release instead of a
//! use-after-free.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

use crate::structures::PostingBuf;

/// How long a retired buffer must stay live before release. Chosen to
/// exceed the longest realistic single-query read-through.
pub(crate) const GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Blocking dequeue timeout shared by the background workers.
pub(crate) const DEQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

pub(crate) const RECLAIM_QUEUE_CAPACITY: usize = 65_536;

/// A replaced buffer awaiting its release deadline.
pub(crate) struct Retired {
    #[allow(dead_code)] // held only to delay the drop
    buf: Arc<PostingBuf>,
    deadline: Instant,
}

/// Producer half: posting sets hand replaced buffers over here.
pub(crate) struct ReclaimQueue {
    tx: Sender<Retired>,
    grace: Duration,
}

impl ReclaimQueue {
    pub(crate) fn new(capacity: usize) -> (Self, Receiver<Retired>) {
        Self::with_grace(capacity, GRACE_PERIOD)
    }

    pub(crate) fn with_grace(capacity: usize, grace: Duration) -> (Self, Receiver<Retired>) {
        let (tx, rx) = bounded(capacity);
        (ReclaimQueue { tx, grace }, rx)
    }

    /// Hand a replaced buffer over for deferred release.
    pub(crate) fn retire(&self, buf: Arc<PostingBuf>) {
        let item = Retired {
            buf,
            deadline: Instant::now() + self.grace,
        };
        if let Err(err) = self.tx.try_send(item) {
            // Dropping the rejected item releases our reference now; any
            // in-flight reader still holds its own.
            log::error!("reclaim enqueue failed, releasing buffer eagerly: {err}");
        }
    }
}

/// Worker loop: dequeue with a timeout, sleep to each deadline, release.
/// Exits once shutdown is signalled, the write worker has finished, and the
/// queue is drained.
pub(crate) fn run_reclaim_worker(
    rx: Receiver<Retired>,
    running: Arc<AtomicBool>,
    writer_done: Arc<AtomicBool>,
) {
    loop {
        match rx.recv_timeout(DEQUEUE_TIMEOUT) {
            Ok(item) => {
                let now = Instant::now();
                if item.deadline > now {
                    std::thread::sleep(item.deadline - now);
                }
                drop(item);
            }
            Err(RecvTimeoutError::Timeout) => {
                if !running.load(Relaxed) && writer_done.load(Relaxed) && rx.is_empty() {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log::info!("reclaim worker exited");
}
