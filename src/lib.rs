#![forbid(unsafe_code)]
//! seqflow: lazy, pull-based sequence processing.
//!
//! Pipelines are built with [`Sequence`] and run only when a terminal reducer
//! (or the `Iterator` bridge) pulls. Callbacks can opt into an
//! [`ItemContext`] that carries the item index, a value threaded from the
//! previous invocation, a persistent scratch value, and a cancel flag.
//!
//! ```
//! use seqflow::prelude::*;
//!
//! let evens = Sequence::range(1, 10)
//!     .filter(|n| n % 2 == 0)
//!     .select(|n| n * 10)
//!     .to_vec()
//!     .unwrap();
//! assert_eq!(evens, vec![20, 40, 60, 80, 100]);
//! ```

pub use seqflow_core;
pub use seqflow_exec;
pub use seqflow_operators;

pub use seqflow_core::{Error, Result};
pub use seqflow_exec::{OrderedSequence, Sequence, SequenceIter};

pub mod prelude {
    pub use seqflow_core::prelude::*;
    pub use seqflow_exec::{OrderedSequence, Sequence};
    pub use seqflow_operators::Grouping;
}
