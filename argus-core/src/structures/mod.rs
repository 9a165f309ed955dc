mod posting;

pub use posting::{PostingKind, PostingSet, WORD_BITS};

pub(crate) use posting::PostingBuf;
