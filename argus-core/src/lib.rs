//! Argus - a multi-field range and tag filter index
//!
//! Accelerates filter predicates of the form `field BETWEEN low AND high`
//! (numeric fields) and `field IN {tag, ...}` (string fields) for a document
//! search engine. For every field it keeps an ordered map from encoded key
//! values to posting sets of document ids, and provides:
//! - Adaptive posting sets that switch between a dense bitmap and a sparse
//!   id array as the density of their contents evolves
//! - Lock-free readers: queries never block the writer and never take a
//!   posting-set lock
//! - Asynchronous ingestion: `add`/`delete` enqueue and return; a single
//!   worker thread applies mutations, resolving raw field bytes from the
//!   document store at apply time
//! - Grace-period buffer reclamation for in-place growth under readers
//! - A multi-filter planner that intersects word-aligned bitmap windows,
//!   driving from the cheapest filter

pub mod error;
pub mod index;
pub mod keymap;
pub mod query;
pub mod store;
pub mod structures;

mod reclaim;

pub use error::{Error, Result};
pub use index::{FieldIndex, FieldKind, IndexMemory, MultiFieldIndex};
pub use keymap::{KeyCursor, KeyMap, KeyMapParams, MemKeyMap, ValueHandle};
pub use query::{FilterInfo, MultiRangeResult, RangeResult, SearchOutcome};
pub use store::{DocumentStore, MemDocumentStore};
pub use structures::{PostingKind, PostingSet, WORD_BITS};

pub type DocId = u32;
pub type FieldId = u32;
