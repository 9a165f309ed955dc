//! Bitwise intersection of aligned range results.

use crate::query::RangeResult;
use crate::structures::WORD_BITS;

/// Intersect `results` into one window, seeded from the driver (the result
/// with the fewest bits to scan). Returns `None` when the windows have no
/// overlap, decided before any allocation.
///
/// Every input window is word-aligned to absolute doc-id boundaries, so the
/// intersection envelope `[max(min_aligned), min(max_aligned)]` lies inside
/// every input and the combine is a word-wise AND at plain word offsets.
pub(crate) fn intersect(results: &[RangeResult], driver: usize) -> Option<RangeResult> {
    debug_assert!(driver < results.len());
    let min_doc = results.iter().map(|r| r.min_aligned()).max()?;
    let max_doc = results.iter().map(|r| r.max_aligned()).min()?;
    if max_doc < min_doc {
        return None;
    }

    let mut out = RangeResult::new(min_doc, max_doc);
    let width = out.words().len();

    let seed = &results[driver];
    let off = ((min_doc - seed.min_aligned()) / WORD_BITS) as usize;
    out.words_mut().copy_from_slice(&seed.words()[off..off + width]);

    for (i, result) in results.iter().enumerate() {
        if i == driver {
            continue;
        }
        let off = ((min_doc - result.min_aligned()) / WORD_BITS) as usize;
        let src = &result.words()[off..off + width];
        for (dst, word) in out.words_mut().iter_mut().zip(src) {
            *dst &= word;
        }
    }

    // Approximate count carried over from the driver, not recomputed.
    out.set_doc_count(seed.doc_count());
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(min_aligned: u64, max_aligned: u64, docs: &[u32]) -> RangeResult {
        let mut result = RangeResult::new(min_aligned, max_aligned);
        for &doc in docs {
            result.set(doc);
        }
        result.set_doc_count(docs.len());
        result
    }

    #[test]
    fn disjoint_windows_collapse_to_none() {
        let a = window(0, 63, &[1]);
        let b = window(128, 191, &[130]);
        assert!(intersect(&[a, b], 0).is_none());
    }

    #[test]
    fn overlapping_windows_and_at_word_offsets() {
        // a spans words [0, 4), b spans words [1, 3).
        let a = window(0, 255, &[10, 70, 130, 200]);
        let b = window(64, 191, &[70, 131, 190]);

        let out = intersect(&[a, b], 1).expect("windows overlap");
        assert_eq!(out.min_aligned(), 64);
        assert_eq!(out.max_aligned(), 191);
        assert_eq!(out.iter_docs().collect::<Vec<_>>(), [70]);
        assert_eq!(out.doc_count(), 3, "count comes from the driver");
    }

    #[test]
    fn every_result_constrains_including_the_last() {
        let a = window(0, 127, &[5, 64, 100]);
        let b = window(0, 127, &[5, 64]);
        let c = window(0, 127, &[64, 100]);

        let out = intersect(&[a, b, c], 1).expect("windows overlap");
        assert_eq!(out.iter_docs().collect::<Vec<_>>(), [64]);
    }

    #[test]
    fn driver_window_is_copied_at_its_offset() {
        // Driver starts below the intersection envelope; its words must be
        // read from the envelope offset, not from word zero.
        let driver = window(0, 191, &[10, 140]);
        let other = window(128, 191, &[140, 150]);

        let out = intersect(&[driver, other], 0).expect("windows overlap");
        assert_eq!(out.min_aligned(), 128);
        assert_eq!(out.iter_docs().collect::<Vec<_>>(), [140]);
    }
}
