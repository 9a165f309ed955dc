//! Per-field index: an ordered map of encoded keys over posting sets.
//!
//! Numeric fields store their keys big-endian with a biased sign bit so
//! unsigned-lexicographic byte order equals numeric order, which makes a
//! `BETWEEN` predicate a plain ascending key scan. Tag fields split the raw
//! value on a delimiter byte and index every token independently.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::keymap::{KeyMap, KeyMapParams, MemKeyMap};
use crate::query::RangeResult;
use crate::reclaim::ReclaimQueue;
use crate::structures::{PostingSet, WORD_BITS};
use crate::{DocId, FieldId};

/// Data shape of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Fixed-width little-endian numeric values; supports range scans.
    Numeric,
    /// Delimiter-joined tag lists; supports union/intersection lookups.
    Tags,
}

pub(crate) const DEFAULT_DELIMITER: u8 = 0x01;

/// Outcome of a single-field lookup. `cost` is the planner's driver metric:
/// the envelope width for a range scan, or the summed posting sizes for a
/// tag lookup. Either way it bounds the bits worth scanning.
pub(crate) enum FieldSearch {
    Empty,
    Hits { result: RangeResult, cost: u64 },
}

pub struct FieldIndex<M: KeyMap = MemKeyMap> {
    field_id: FieldId,
    kind: FieldKind,
    delimiter: u8,
    map: M,
    /// Posting-set arena; handles stored in the map are slots into this
    /// vector. Slots are never reused.
    sets: RwLock<Vec<Arc<PostingSet>>>,
}

impl FieldIndex<MemKeyMap> {
    /// Build a field index rooted at `path`. Substrate files left behind by
    /// a previous process are removed: index state never survives a
    /// restart, it is rebuilt by replaying document writes.
    pub(crate) fn create(
        path: &Path,
        field_id: FieldId,
        kind: FieldKind,
        params: &KeyMapParams,
    ) -> Result<Self> {
        let _ = std::fs::remove_file(path.join(format!("main_{field_id}.dis")));
        let _ = std::fs::remove_file(path.join(format!("cache_{field_id}.dis")));
        Ok(FieldIndex {
            field_id,
            kind,
            delimiter: DEFAULT_DELIMITER,
            map: MemKeyMap::new(params),
            sets: RwLock::new(Vec::new()),
        })
    }
}

impl<M: KeyMap> FieldIndex<M> {
    pub fn field_id(&self) -> FieldId {
        self.field_id
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::Numeric
    }

    pub(crate) fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn resolve(&self, handle: u64) -> Arc<PostingSet> {
        Arc::clone(&self.sets.read()[handle as usize])
    }

    /// Find or create the posting set for `key`.
    fn upsert(&self, key: &[u8]) -> Arc<PostingSet> {
        if let Some(handle) = self.map.find(key) {
            return self.resolve(handle);
        }
        let set = Arc::new(PostingSet::new());
        let mut sets = self.sets.write();
        let handle = sets.len() as u64;
        sets.push(Arc::clone(&set));
        drop(sets);
        if let Err(err) = self.map.insert_unique(key, handle) {
            log::error!("field {}: inserting a new key failed: {err}", self.field_id);
        }
        set
    }

    /// Index `doc` under the raw field value.
    pub(crate) fn add(&self, raw: &[u8], doc: DocId, reclaim: &ReclaimQueue) {
        if self.is_numeric() {
            self.upsert(&encode_numeric(raw)).add(doc, reclaim);
        } else {
            for token in tokenize(raw, self.delimiter) {
                self.upsert(token).add(doc, reclaim);
            }
        }
    }

    /// Unindex `doc` from the raw field value. Misses are logged, not
    /// propagated.
    pub(crate) fn delete(&self, raw: &[u8], doc: DocId) {
        if self.is_numeric() {
            self.delete_key(&encode_numeric(raw), doc);
        } else {
            for token in tokenize(raw, self.delimiter) {
                self.delete_key(token, doc);
            }
        }
    }

    fn delete_key(&self, key: &[u8], doc: DocId) {
        match self.map.find(key) {
            Some(handle) => {
                self.resolve(handle).delete(doc);
            }
            None => log::warn!(
                "field {}: delete of doc {doc} under a key that was never indexed",
                self.field_id
            ),
        }
    }

    /// Collect every posting set with a key in `[low, high]` (raw numeric
    /// bounds, inclusive) and OR them into one aligned window.
    pub(crate) fn search_range(&self, low: &[u8], high: &[u8]) -> FieldSearch {
        if !self.is_numeric() {
            // Range order is meaningless for tags; treat the lower bound as
            // a union tag lookup.
            return self.search_tags(low);
        }
        let enc_low = encode_numeric(low);
        let enc_high = encode_numeric(high);

        let mut lists: Vec<Arc<PostingSet>> = Vec::new();
        let mut cursor = self.map.cursor_from(Some(&enc_low));
        while let Some((key, handle)) = cursor.next() {
            if &key[..] > enc_high.as_slice() {
                break;
            }
            lists.push(self.resolve(handle));
        }
        if lists.is_empty() {
            return FieldSearch::Empty;
        }

        let mut min_doc = u64::MAX;
        let mut max_doc = 0u64;
        let mut min_aligned = u64::MAX;
        let mut max_aligned = 0u64;
        for set in &lists {
            min_doc = min_doc.min(set.min() as u64);
            max_doc = max_doc.max(set.max() as u64);
            min_aligned = min_aligned.min(set.min_aligned());
            max_aligned = max_aligned.max(set.max_aligned());
        }
        if max_doc < min_doc || min_aligned > max_aligned {
            return FieldSearch::Empty;
        }
        // A racing first add can expose a half-written envelope; rounding
        // outward to word boundaries keeps the window math exact and only
        // widens the window.
        let min_aligned = min_aligned & !(WORD_BITS - 1);
        let max_aligned = max_aligned | (WORD_BITS - 1);

        let mut result = RangeResult::new(min_aligned, max_aligned);
        for set in &lists {
            set.or_into(&mut result);
            result.add_doc_count(set.size());
        }
        FieldSearch::Hits {
            cost: max_doc - min_doc + 1,
            result,
        }
    }

    /// Union of the posting sets named by the delimiter-joined `tags`.
    /// Unknown tags are logged and ignored.
    pub(crate) fn search_tags(&self, tags: &[u8]) -> FieldSearch {
        let mut nodes: Vec<Arc<PostingSet>> = Vec::new();
        for token in tokenize(tags, self.delimiter) {
            match self.map.find(token) {
                Some(handle) => nodes.push(self.resolve(handle)),
                None => log::warn!(
                    "field {}: no posting set for tag {:?}",
                    self.field_id,
                    String::from_utf8_lossy(token)
                ),
            }
        }

        let mut min_doc = u64::MAX;
        let mut max_doc = 0u64;
        for node in &nodes {
            if node.size() == 0 {
                continue;
            }
            min_doc = min_doc.min(node.min_aligned());
            max_doc = max_doc.max(node.max_aligned());
        }
        if max_doc < min_doc {
            return FieldSearch::Empty;
        }

        let mut result = RangeResult::new(min_doc, max_doc);
        let mut total = 0usize;
        for node in &nodes {
            node.or_into(&mut result);
            total += node.size();
        }
        result.set_doc_count(total);
        FieldSearch::Hits {
            cost: total as u64,
            result,
        }
    }

    /// Live posting-buffer memory of this field, `(dense, sparse)` bytes.
    pub fn heap_bytes(&self) -> (u64, u64) {
        let sets = self.sets.read();
        let mut dense = 0;
        let mut sparse = 0;
        for set in sets.iter() {
            let (d, s) = set.heap_bytes();
            dense += d;
            sparse += s;
        }
        (dense, sparse)
    }

    pub fn posting_sets(&self) -> usize {
        self.sets.read().len()
    }
}

/// Encode a raw little-endian numeric value so unsigned-lexicographic byte
/// order equals numeric order: reverse to big-endian, then flip the sign
/// bit of the most significant byte.
pub(crate) fn encode_numeric(raw: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = raw.iter().rev().copied().collect();
    if let Some(first) = out.first_mut() {
        *first ^= 0x80;
    }
    out
}

/// Inverse of `encode_numeric`.
#[cfg(test)]
pub(crate) fn decode_numeric(encoded: &[u8]) -> Vec<u8> {
    let mut out = encoded.to_vec();
    if let Some(first) = out.first_mut() {
        *first ^= 0x80;
    }
    out.reverse();
    out
}

/// Split a raw tag value on the delimiter. Empty tokens are skipped, so
/// leading, trailing, and doubled delimiters are harmless.
pub(crate) fn tokenize(raw: &[u8], delimiter: u8) -> impl Iterator<Item = &[u8]> {
    raw.split(move |b| *b == delimiter)
        .filter(|token| !token.is_empty())
}
