//! Filter predicates and search outcomes.

mod intersect;
mod result;

pub use result::{MultiRangeResult, RangeResult};

pub(crate) use intersect::intersect;

use crate::{DocId, FieldId};

/// One filter predicate against one field.
#[derive(Debug, Clone)]
pub struct FilterInfo {
    pub field_id: FieldId,
    /// Range lower bound (numeric fields, raw little-endian value of the
    /// field's fixed width) or the delimiter-joined tag list (tag fields).
    pub lower: Vec<u8>,
    /// Range upper bound, inclusive. Unused for tag fields.
    pub upper: Vec<u8>,
    /// Tag combination: `true` = any listed tag matches (OR), `false` =
    /// every listed tag must match (AND). Ignored for numeric fields.
    pub is_union: bool,
}

impl FilterInfo {
    /// Numeric `field BETWEEN lower AND upper`, both bounds inclusive.
    pub fn range(field_id: FieldId, lower: impl Into<Vec<u8>>, upper: impl Into<Vec<u8>>) -> Self {
        FilterInfo {
            field_id,
            lower: lower.into(),
            upper: upper.into(),
            is_union: false,
        }
    }

    /// Tag filter over a delimiter-joined token list.
    pub fn tags(field_id: FieldId, tags: impl Into<Vec<u8>>, is_union: bool) -> Self {
        FilterInfo {
            field_id,
            lower: tags.into(),
            upper: Vec::new(),
            is_union,
        }
    }
}

/// Three-way outcome of a filter search.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// No filter constrained the result (for instance, a named field has no
    /// index). Every document should be treated as matching.
    Unconstrained,
    /// Some filter, or the combined intersection, matched nothing.
    Empty,
    Matched(MultiRangeResult),
}

impl SearchOutcome {
    pub fn matches(&self, doc: DocId) -> bool {
        match self {
            SearchOutcome::Unconstrained => true,
            SearchOutcome::Empty => false,
            SearchOutcome::Matched(result) => result.matches(doc),
        }
    }
}
