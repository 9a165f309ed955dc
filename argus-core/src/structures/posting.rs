//! Adaptive posting set: the set of document ids under one `(field, key)`.
//!
//! A posting set keeps its ids either as a dense bitmap over a word-aligned
//! envelope or as an unsorted id array, and switches representation as the
//! density of its contents evolves. The single write worker is the only
//! mutator; queries read with no locks:
//!
//! - The payload buffer is published through `ArcSwap`. Each buffer is
//!   self-describing (dense buffers carry their aligned base, sparse buffers
//!   their fill length), so a reader that loaded one keeps a consistent
//!   snapshot while the writer re-envelopes or grows the live buffer.
//! - Scalar state (`min`, `max`, envelope, `size`) is relaxed atomics;
//!   queries may observe transiently stale values, which the visibility
//!   contract allows.
//! - A replaced buffer is never freed in-band: it goes to the reclaim queue
//!   and is released only after the grace deadline.

use std::sync::Arc;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize};

use arc_swap::ArcSwap;

use crate::DocId;
use crate::query::RangeResult;
use crate::reclaim::ReclaimQueue;

/// Bit width of a bitmap machine word. Aligned envelopes are multiples of
/// this, so range merges and intersections run word-at-a-time with no
/// boundary fixups.
pub const WORD_BITS: u64 = 64;

/// No representation conversion while `max - min` is at or below this span;
/// small envelopes are cheap either way.
const CONVERT_SPAN: u64 = 100_000;

/// Dense → sparse below this density; sparse → dense above
/// `SPARSE_TO_DENSE_DENSITY`. The gap keeps a set whose density oscillates
/// near the boundary from thrashing between representations.
const DENSE_TO_SPARSE_DENSITY: f64 = 0.08;
const SPARSE_TO_DENSE_DENSITY: f64 = 0.10;

/// Current representation of a posting set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingKind {
    Dense,
    Sparse,
}

/// One published payload buffer.
pub(crate) enum PostingBuf {
    /// Bitmap over `[base, base + words * WORD_BITS)`; bit `i` set means id
    /// `base + i` is present. `base` is word-aligned.
    Dense {
        base: u64,
        words: Box<[AtomicU64]>,
    },
    /// Unsorted id array filled up to `len`; capacity is `ids.len()`.
    /// Duplicate ids are possible and preserved.
    Sparse {
        len: AtomicU32,
        ids: Box<[AtomicU32]>,
    },
}

impl PostingBuf {
    fn dense(base: u64, bits: u64) -> PostingBuf {
        debug_assert_eq!(base % WORD_BITS, 0);
        debug_assert_eq!(bits % WORD_BITS, 0);
        let words = (0..bits / WORD_BITS).map(|_| AtomicU64::new(0)).collect();
        PostingBuf::Dense { base, words }
    }

    fn empty_sparse() -> PostingBuf {
        PostingBuf::Sparse {
            len: AtomicU32::new(0),
            ids: Box::new([]),
        }
    }
}

/// The set of document ids that carry one key value.
pub struct PostingSet {
    /// Smallest / largest contained id. Deletes do not re-tighten these;
    /// the envelope only grows over the set's lifetime.
    min: AtomicU32,
    max: AtomicU32,
    /// Word-aligned envelope of `[min, max]`. The upper bound can overshoot
    /// past `max` after an upward re-envelope.
    min_aligned: AtomicU64,
    max_aligned: AtomicU64,
    size: AtomicUsize,
    buf: ArcSwap<PostingBuf>,
}

impl PostingSet {
    pub(crate) fn new() -> Self {
        PostingSet {
            min: AtomicU32::new(u32::MAX),
            max: AtomicU32::new(0),
            min_aligned: AtomicU64::new(u64::MAX),
            max_aligned: AtomicU64::new(0),
            size: AtomicUsize::new(0),
            buf: ArcSwap::from_pointee(PostingBuf::empty_sparse()),
        }
    }

    /// Acquire pairs with the release in `add_first`: a reader that sees a
    /// non-zero size also sees a fully initialized envelope.
    pub fn size(&self) -> usize {
        self.size.load(Acquire)
    }

    pub fn min(&self) -> DocId {
        self.min.load(Relaxed)
    }

    pub fn max(&self) -> DocId {
        self.max.load(Relaxed)
    }

    pub fn min_aligned(&self) -> u64 {
        self.min_aligned.load(Relaxed)
    }

    pub fn max_aligned(&self) -> u64 {
        self.max_aligned.load(Relaxed)
    }

    pub fn kind(&self) -> PostingKind {
        match &**self.buf.load() {
            PostingBuf::Dense { .. } => PostingKind::Dense,
            PostingBuf::Sparse { .. } => PostingKind::Sparse,
        }
    }

    /// Insert `doc`. Callers must not add the same id twice: the sparse
    /// representation keeps duplicates and a later densify collapses them,
    /// changing observable counts.
    pub(crate) fn add(&self, doc: DocId, reclaim: &ReclaimQueue) {
        if self.size.load(Relaxed) == 0 {
            return self.add_first(doc, reclaim);
        }

        let span = (self.max.load(Relaxed) as u64).saturating_sub(self.min.load(Relaxed) as u64);
        match self.kind() {
            PostingKind::Dense => {
                if span > CONVERT_SPAN
                    && (self.size.load(Relaxed) as f64 / span as f64) < DENSE_TO_SPARSE_DENSITY
                {
                    self.convert_to_sparse(reclaim);
                    return self.add_sparse(doc, reclaim);
                }
                self.add_dense(doc, reclaim);
            }
            PostingKind::Sparse => {
                if span > CONVERT_SPAN
                    && (self.size.load(Relaxed) as f64 / span as f64) > SPARSE_TO_DENSE_DENSITY
                {
                    self.convert_to_dense(reclaim);
                    return self.add_dense(doc, reclaim);
                }
                self.add_sparse(doc, reclaim);
            }
        }
    }

    /// First insert: a one-word dense envelope around `doc`.
    fn add_first(&self, doc: DocId, reclaim: &ReclaimQueue) {
        let v = doc as u64;
        let base = (v / WORD_BITS) * WORD_BITS;
        let next = PostingBuf::dense(base, WORD_BITS);
        if let PostingBuf::Dense { words, .. } = &next {
            words[0].store(1u64 << (v - base), Relaxed);
        }
        self.min.store(doc, Relaxed);
        self.max.store(doc, Relaxed);
        self.min_aligned.store(base, Relaxed);
        self.max_aligned.store(base + WORD_BITS - 1, Relaxed);
        let old = self.buf.swap(Arc::new(next));
        reclaim.retire(old);
        // Publishes the envelope stores above to readers gating on size.
        self.size.store(1, Release);
    }

    fn add_dense(&self, doc: DocId, reclaim: &ReclaimQueue) {
        let v = doc as u64;
        let cur = self.buf.load_full();
        let PostingBuf::Dense { base, words } = &*cur else {
            unreachable!("dense add against a sparse buffer")
        };
        let lo = *base;
        let hi = lo + words.len() as u64 * WORD_BITS - 1;

        if v < lo {
            // Re-envelope downward: old words land in the upper portion.
            let new_lo = (v / WORD_BITS) * WORD_BITS;
            let mut fresh = vec![0u64; ((hi - new_lo + 1) / WORD_BITS) as usize];
            let shift = ((lo - new_lo) / WORD_BITS) as usize;
            for (i, word) in words.iter().enumerate() {
                fresh[shift + i] = word.load(Relaxed);
            }
            fresh[((v - new_lo) / WORD_BITS) as usize] |= 1 << (v % WORD_BITS);
            let next = PostingBuf::Dense {
                base: new_lo,
                words: fresh.into_iter().map(AtomicU64::new).collect(),
            };
            let old = self.buf.swap(Arc::new(next));
            reclaim.retire(old);
            self.min.store(doc, Relaxed);
            self.min_aligned.store(new_lo, Relaxed);
        } else if v > hi {
            // Re-envelope upward with 2x overshoot to amortize appends.
            let new_hi = (v / WORD_BITS + 1) * WORD_BITS * 2 - 1;
            let mut fresh = vec![0u64; ((new_hi - lo + 1) / WORD_BITS) as usize];
            for (i, word) in words.iter().enumerate() {
                fresh[i] = word.load(Relaxed);
            }
            fresh[((v - lo) / WORD_BITS) as usize] |= 1 << (v % WORD_BITS);
            let next = PostingBuf::Dense {
                base: lo,
                words: fresh.into_iter().map(AtomicU64::new).collect(),
            };
            let old = self.buf.swap(Arc::new(next));
            reclaim.retire(old);
            self.max.store(doc, Relaxed);
            self.max_aligned.store(new_hi, Relaxed);
        } else {
            words[((v - lo) / WORD_BITS) as usize].fetch_or(1 << (v % WORD_BITS), Relaxed);
            if doc < self.min.load(Relaxed) {
                self.min.store(doc, Relaxed);
            }
            if doc > self.max.load(Relaxed) {
                self.max.store(doc, Relaxed);
            }
        }
        self.size.fetch_add(1, Relaxed);
    }

    fn add_sparse(&self, doc: DocId, reclaim: &ReclaimQueue) {
        let v = doc as u64;
        if doc < self.min.load(Relaxed) {
            self.min.store(doc, Relaxed);
        }
        if doc > self.max.load(Relaxed) {
            self.max.store(doc, Relaxed);
        }
        if v < self.min_aligned.load(Relaxed) {
            self.min_aligned.store((v / WORD_BITS) * WORD_BITS, Relaxed);
        }
        if v > self.max_aligned.load(Relaxed) {
            self.max_aligned
                .store((v / WORD_BITS + 1) * WORD_BITS - 1, Relaxed);
        }

        let cur = self.buf.load_full();
        let PostingBuf::Sparse { len, ids } = &*cur else {
            unreachable!("sparse add against a dense buffer")
        };
        let used = len.load(Relaxed) as usize;
        if used < ids.len() {
            // In-place append: the slot is written before the length that
            // makes it visible.
            ids[used].store(doc, Relaxed);
            len.store(used as u32 + 1, Release);
        } else {
            // Grow 2x (initial capacity 1) into a fresh buffer.
            let capacity = (ids.len() * 2).max(1);
            let fresh: Box<[AtomicU32]> = (0..capacity)
                .map(|i| {
                    AtomicU32::new(match i.cmp(&used) {
                        std::cmp::Ordering::Less => ids[i].load(Relaxed),
                        std::cmp::Ordering::Equal => doc,
                        std::cmp::Ordering::Greater => 0,
                    })
                })
                .collect();
            let next = PostingBuf::Sparse {
                len: AtomicU32::new(used as u32 + 1),
                ids: fresh,
            };
            let old = self.buf.swap(Arc::new(next));
            reclaim.retire(old);
        }
        self.size.fetch_add(1, Relaxed);
    }

    /// Remove `doc`. A miss is logged and reported, never fatal.
    pub(crate) fn delete(&self, doc: DocId) -> bool {
        let cur = self.buf.load_full();
        match &*cur {
            PostingBuf::Dense { base, words } => {
                let v = doc as u64;
                let hi = base + words.len() as u64 * WORD_BITS - 1;
                if v < *base || v > hi {
                    log::error!("cannot delete {doc}: outside dense envelope [{base}, {hi}]");
                    return false;
                }
                words[((v - base) / WORD_BITS) as usize]
                    .fetch_and(!(1u64 << (v % WORD_BITS)), Relaxed);
                self.size.fetch_sub(1, Relaxed);
                true
            }
            PostingBuf::Sparse { len, ids } => {
                let used = len.load(Relaxed) as usize;
                let Some(pos) = (0..used).find(|&i| ids[i].load(Relaxed) == doc) else {
                    log::error!("cannot delete {doc}: not present in sparse set");
                    return false;
                };
                for i in pos..used - 1 {
                    ids[i].store(ids[i + 1].load(Relaxed), Relaxed);
                }
                len.store(used as u32 - 1, Release);
                self.size.fetch_sub(1, Relaxed);
                true
            }
        }
    }

    /// Walk the dense bitmap and republish its set bits as a sparse array
    /// sized to `size`.
    fn convert_to_sparse(&self, reclaim: &ReclaimQueue) {
        let cur = self.buf.load_full();
        let PostingBuf::Dense { base, words } = &*cur else {
            return;
        };
        let expected = self.size.load(Relaxed);
        let mut collected: Vec<DocId> = Vec::with_capacity(expected);
        'scan: for (wi, word) in words.iter().enumerate() {
            let mut bits = word.load(Relaxed);
            while bits != 0 {
                if collected.len() >= expected {
                    log::warn!("densify scan exceeded size {expected}; truncating");
                    break 'scan;
                }
                let tz = bits.trailing_zeros() as u64;
                collected.push((base + wi as u64 * WORD_BITS + tz) as DocId);
                bits &= bits - 1;
            }
        }
        if collected.len() != expected {
            // Possible after duplicate adds: size counts them, the bitmap
            // collapsed them.
            log::error!(
                "dense set bits {} do not match size {expected}",
                collected.len()
            );
        }
        let fill = collected.len();
        let ids: Box<[AtomicU32]> = (0..expected)
            .map(|i| AtomicU32::new(if i < fill { collected[i] } else { 0 }))
            .collect();
        let next = PostingBuf::Sparse {
            len: AtomicU32::new(fill as u32),
            ids,
        };
        let old = self.buf.swap(Arc::new(next));
        reclaim.retire(old);
    }

    /// Republish the sparse ids as a bitmap over the current aligned
    /// envelope.
    fn convert_to_dense(&self, reclaim: &ReclaimQueue) {
        let cur = self.buf.load_full();
        let PostingBuf::Sparse { len, ids } = &*cur else {
            return;
        };
        let lo = self.min_aligned.load(Relaxed);
        let hi = self.max_aligned.load(Relaxed);
        let mut fresh = vec![0u64; ((hi - lo + 1) / WORD_BITS) as usize];
        let used = len.load(Acquire) as usize;
        for i in 0..used {
            let v = ids[i].load(Relaxed) as u64;
            if v < lo || v > hi {
                log::warn!("sparse id {v} outside aligned envelope [{lo}, {hi}]; skipping");
                continue;
            }
            fresh[((v - lo) / WORD_BITS) as usize] |= 1 << (v % WORD_BITS);
        }
        let next = PostingBuf::Dense {
            base: lo,
            words: fresh.into_iter().map(AtomicU64::new).collect(),
        };
        let old = self.buf.swap(Arc::new(next));
        reclaim.retire(old);
    }

    pub fn contains(&self, doc: DocId) -> bool {
        match &**self.buf.load() {
            PostingBuf::Dense { base, words } => {
                let v = doc as u64;
                if v < *base {
                    return false;
                }
                let wi = ((v - base) / WORD_BITS) as usize;
                wi < words.len() && (words[wi].load(Relaxed) >> (v % WORD_BITS)) & 1 == 1
            }
            PostingBuf::Sparse { len, ids } => {
                let used = len.load(Acquire) as usize;
                (0..used).any(|i| ids[i].load(Relaxed) == doc)
            }
        }
    }

    /// OR the current contents into `out`, clipped to `out`'s window. A
    /// buffer snapshot can exceed the window when the set grew between the
    /// caller's envelope computation and this merge.
    pub(crate) fn or_into(&self, out: &mut RangeResult) {
        match &**self.buf.load() {
            PostingBuf::Dense { base, words } => {
                let src_lo = *base;
                let src_hi = src_lo + words.len() as u64 * WORD_BITS - 1;
                let lo = src_lo.max(out.min_aligned());
                let hi = src_hi.min(out.max_aligned());
                if lo > hi {
                    return;
                }
                let overlap = ((hi - lo + 1) / WORD_BITS) as usize;
                let src_off = ((lo - src_lo) / WORD_BITS) as usize;
                let dst_off = ((lo - out.min_aligned()) / WORD_BITS) as usize;
                let dst = out.words_mut();
                for i in 0..overlap {
                    dst[dst_off + i] |= words[src_off + i].load(Relaxed);
                }
            }
            PostingBuf::Sparse { len, ids } => {
                let used = len.load(Acquire) as usize;
                for i in 0..used {
                    out.set(ids[i].load(Relaxed));
                }
            }
        }
    }

    /// Live buffer memory as `(dense_bytes, sparse_bytes)`.
    pub fn heap_bytes(&self) -> (u64, u64) {
        match &**self.buf.load() {
            PostingBuf::Dense { words, .. } => (words.len() as u64 * 8, 0),
            PostingBuf::Sparse { ids, .. } => (0, ids.len() as u64 * 4),
        }
    }

    /// Contained ids in buffer order (dense: ascending; sparse: insertion).
    #[cfg(test)]
    pub(crate) fn doc_ids(&self) -> Vec<DocId> {
        match &**self.buf.load() {
            PostingBuf::Dense { base, words } => {
                let mut out = Vec::new();
                for (wi, word) in words.iter().enumerate() {
                    let mut bits = word.load(Relaxed);
                    while bits != 0 {
                        let tz = bits.trailing_zeros() as u64;
                        out.push((base + wi as u64 * WORD_BITS + tz) as DocId);
                        bits &= bits - 1;
                    }
                }
                out
            }
            PostingBuf::Sparse { len, ids } => {
                let used = len.load(Acquire) as usize;
                (0..used).map(|i| ids[i].load(Relaxed)).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn queue() -> (ReclaimQueue, crossbeam_channel::Receiver<crate::reclaim::Retired>) {
        ReclaimQueue::new(4096)
    }

    fn assert_envelope(set: &PostingSet) {
        assert!(set.min_aligned() <= set.min() as u64);
        assert!(set.min() <= set.max());
        assert!((set.max() as u64) <= set.max_aligned());
        assert_eq!((set.max_aligned() - set.min_aligned() + 1) % WORD_BITS, 0);
    }

    #[test]
    fn first_add_builds_one_word_dense_envelope() {
        let (q, _rx) = queue();
        let set = PostingSet::new();
        set.add(130, &q);

        assert_eq!(set.kind(), PostingKind::Dense);
        assert_eq!(set.size(), 1);
        assert_eq!(set.min(), 130);
        assert_eq!(set.max(), 130);
        assert_eq!(set.min_aligned(), 128);
        assert_eq!(set.max_aligned(), 191);
        assert!(set.contains(130));
        assert!(!set.contains(129));
        assert_envelope(&set);
    }

    #[test]
    fn dense_add_below_envelope_preserves_bits_at_new_offset() {
        let (q, rx) = queue();
        let set = PostingSet::new();
        set.add(1000, &q);
        set.add(10, &q);

        assert_eq!(set.min(), 10);
        assert_eq!(set.min_aligned(), 0);
        assert!(set.contains(10) && set.contains(1000));
        assert_envelope(&set);
        // placeholder + re-enveloped buffer
        assert!(rx.try_iter().count() >= 2, "old buffers must be retired");
    }

    #[test]
    fn dense_add_above_envelope_overshoots_twofold() {
        let (q, _rx) = queue();
        let set = PostingSet::new();
        set.add(10, &q);
        set.add(1000, &q);

        // (1000 / 64 + 1) * 64 * 2 - 1
        assert_eq!(set.max_aligned(), 2047);
        assert_eq!(set.max(), 1000);
        assert!(set.contains(10) && set.contains(1000));
        assert!(!set.contains(1001));
        assert_envelope(&set);
    }

    #[test]
    fn conversion_to_sparse_fires_past_span_and_density_gates() {
        let (q, rx) = queue();
        let set = PostingSet::new();
        set.add(0, &q);
        set.add(1_000_000, &q);
        // Conversion checks run against pre-add state, so the switch shows
        // on the add after the span opened up.
        assert_eq!(set.kind(), PostingKind::Dense);

        set.add(500_000, &q);
        assert_eq!(set.kind(), PostingKind::Sparse);
        assert_eq!(set.size(), 3);
        for doc in [0, 500_000, 1_000_000] {
            assert!(set.contains(doc), "doc {doc} lost in conversion");
        }
        assert_envelope(&set);
        assert!(rx.try_iter().count() >= 3);
    }

    #[test]
    fn conversion_to_dense_fires_past_density_threshold() {
        let (q, _rx) = queue();
        let set = PostingSet::new();
        set.add(0, &q);
        set.add(200_000, &q);
        set.add(100, &q); // densifies the span check; flips to sparse
        assert_eq!(set.kind(), PostingKind::Sparse);

        // Push density over 0.10 of the 200_000 span.
        for doc in 300..=25_300 {
            set.add(doc, &q);
        }
        assert_eq!(set.kind(), PostingKind::Dense);
        assert_eq!(set.size(), 25_004);
        for doc in [0, 100, 200_000, 300, 12_345, 25_300] {
            assert!(set.contains(doc), "doc {doc} lost in conversion");
        }
        assert!(!set.contains(299));
        assert!(!set.contains(25_301));
        assert_envelope(&set);
    }

    #[test]
    fn sparse_keeps_duplicates_until_densified() {
        let (q, _rx) = queue();
        let set = PostingSet::new();
        set.add(0, &q);
        set.add(200_000, &q);
        set.add(50, &q); // now sparse
        set.add(50, &q); // duplicate: kept, counted
        assert_eq!(set.kind(), PostingKind::Sparse);
        assert_eq!(set.size(), 4);

        assert!(set.delete(50));
        assert_eq!(set.size(), 3);
        assert!(set.contains(50), "second duplicate still present");
        assert!(set.delete(50));
        assert!(!set.contains(50));
    }

    #[test]
    fn dense_delete_keeps_loose_bounds() {
        let (q, _rx) = queue();
        let set = PostingSet::new();
        set.add(10, &q);
        set.add(20, &q);

        assert!(set.delete(20));
        assert_eq!(set.size(), 1);
        assert!(!set.contains(20));
        // min/max are not re-tightened by deletes.
        assert_eq!(set.max(), 20);
        assert_envelope(&set);

        // Outside the envelope: reported, no state change.
        assert!(!set.delete(4_000_000));
        assert_eq!(set.size(), 1);
    }

    #[test]
    fn sparse_delete_shifts_tail() {
        let (q, _rx) = queue();
        let set = PostingSet::new();
        set.add(0, &q);
        set.add(200_000, &q);
        set.add(7, &q);
        set.add(9, &q);
        assert_eq!(set.kind(), PostingKind::Sparse);

        assert!(set.delete(0));
        assert!(!set.contains(0));
        assert!(set.contains(7) && set.contains(9) && set.contains(200_000));
        assert!(!set.delete(12345));
        assert_eq!(set.size(), 3);
    }

    #[test]
    fn reader_snapshot_survives_writer_growth() {
        let (q, rx) = queue();
        let set = PostingSet::new();
        set.add(100, &q);

        // A query captures the buffer, then the writer re-envelopes twice.
        let snapshot = set.buf.load_full();
        set.add(5000, &q);
        set.add(3, &q);

        let PostingBuf::Dense { base, words } = &*snapshot else {
            panic!("snapshot should be the initial dense buffer");
        };
        assert_eq!(*base, 64);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].load(Relaxed), 1u64 << (100 - 64));
        assert!(rx.try_iter().count() >= 2);
    }

    /// The contained-id set must match a model set regardless of which
    /// conversions fired along the way.
    #[test]
    fn random_ops_match_model_set() {
        let (q, _rx) = queue();
        let mut rng = StdRng::seed_from_u64(0x9e3779b97f4a7c15);
        let set = PostingSet::new();
        let mut model: BTreeSet<DocId> = BTreeSet::new();

        // Low-density phase: ends up sparse once the span passes the gate.
        for _ in 0..12_000 {
            if model.is_empty() || rng.random_range(0..10) < 8 {
                let doc = rng.random_range(0..150_000u32);
                if model.insert(doc) {
                    set.add(doc, &q);
                }
            } else {
                let pick = rng.random_range(0..model.len());
                let doc = *model.iter().nth(pick).unwrap();
                model.remove(&doc);
                assert!(set.delete(doc));
            }
        }
        assert_eq!(set.kind(), PostingKind::Sparse);

        // Fill a band densely enough to flip back to the bitmap.
        for doc in (0..40_000u32).step_by(2) {
            if model.insert(doc) {
                set.add(doc, &q);
            }
        }
        assert_eq!(set.kind(), PostingKind::Dense);

        for _ in 0..500 {
            let pick = rng.random_range(0..model.len());
            let doc = *model.iter().nth(pick).unwrap();
            model.remove(&doc);
            assert!(set.delete(doc));
        }

        assert_eq!(set.size(), model.len());
        let mut contents: Vec<DocId> = set.doc_ids();
        contents.sort_unstable();
        let expected: Vec<DocId> = model.iter().copied().collect();
        assert_eq!(contents, expected);

        assert!(set.min() as u64 >= set.min_aligned());
        assert!(set.min() <= *model.first().unwrap());
        assert!(set.max() >= *model.last().unwrap());
        assert!((set.max() as u64) <= set.max_aligned());
        assert_eq!((set.max_aligned() - set.min_aligned() + 1) % WORD_BITS, 0);
    }
}
