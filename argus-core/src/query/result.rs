//! Word-aligned bitmap windows returned by range and tag lookups.

use crate::DocId;
use crate::structures::WORD_BITS;

/// One filter's hits: a bitmap over the word-aligned doc-id window
/// `[min_aligned, max_aligned]`.
///
/// `doc_count` is an upper-bound capacity hint, not an exact cardinality:
/// posting-set sizes are summed as-is, so an id reached through several
/// keys or duplicate tags is counted each time it appears.
#[derive(Debug, Clone)]
pub struct RangeResult {
    min_aligned: u64,
    max_aligned: u64,
    words: Vec<u64>,
    doc_count: usize,
}

impl RangeResult {
    pub(crate) fn new(min_aligned: u64, max_aligned: u64) -> Self {
        debug_assert!(min_aligned <= max_aligned);
        debug_assert_eq!(min_aligned % WORD_BITS, 0);
        debug_assert_eq!((max_aligned + 1) % WORD_BITS, 0);
        let words = ((max_aligned - min_aligned + 1) / WORD_BITS) as usize;
        RangeResult {
            min_aligned,
            max_aligned,
            words: vec![0; words],
            doc_count: 0,
        }
    }

    pub fn min_aligned(&self) -> u64 {
        self.min_aligned
    }

    pub fn max_aligned(&self) -> u64 {
        self.max_aligned
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub(crate) fn add_doc_count(&mut self, n: usize) {
        self.doc_count += n;
    }

    pub(crate) fn set_doc_count(&mut self, n: usize) {
        self.doc_count = n;
    }

    pub(crate) fn words(&self) -> &[u64] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Set the bit for `doc`. Ids outside the window are ignored: a posting
    /// buffer can briefly exceed the window while the writer is extending
    /// the set it came from.
    pub(crate) fn set(&mut self, doc: DocId) {
        let v = doc as u64;
        if v < self.min_aligned || v > self.max_aligned {
            return;
        }
        let off = v - self.min_aligned;
        self.words[(off / WORD_BITS) as usize] |= 1 << (off % WORD_BITS);
    }

    pub fn contains(&self, doc: DocId) -> bool {
        let v = doc as u64;
        if v < self.min_aligned || v > self.max_aligned {
            return false;
        }
        let off = v - self.min_aligned;
        (self.words[(off / WORD_BITS) as usize] >> (off % WORD_BITS)) & 1 == 1
    }

    /// Set bits as doc ids, ascending.
    pub fn iter_docs(&self) -> impl Iterator<Item = DocId> + '_ {
        let base = self.min_aligned;
        self.words.iter().enumerate().flat_map(move |(wi, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as u64;
                bits &= bits - 1;
                Some((base + wi as u64 * WORD_BITS + tz) as DocId)
            })
        })
    }
}

/// Combined outcome of a filter search: a document matches when every
/// member window has its bit set.
#[derive(Debug, Clone, Default)]
pub struct MultiRangeResult {
    results: Vec<RangeResult>,
}

impl MultiRangeResult {
    pub(crate) fn push(&mut self, result: RangeResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[RangeResult] {
        &self.results
    }

    pub fn matches(&self, doc: DocId) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.contains(doc))
    }

    /// Capacity hint only; see `RangeResult::doc_count`.
    pub fn doc_count(&self) -> usize {
        self.results
            .iter()
            .map(|r| r.doc_count())
            .min()
            .unwrap_or(0)
    }
}
