#![forbid(unsafe_code)]
//! seqflow-exec: the fluent `Sequence` API.
//!
//! `Sequence` boxes an operator chain from `seqflow-operators` behind a single
//! type so builder calls compose without naming nested generics. Terminal
//! reducers (`to_vec`, `count`, `first`, ...) and the `Iterator` bridge are the
//! only things that actually pull.

pub mod iter;
pub mod ordered;
pub mod sequence;
pub mod terminal;

mod metrics;

pub use iter::SequenceIter;
pub use ordered::OrderedSequence;
pub use sequence::Sequence;
