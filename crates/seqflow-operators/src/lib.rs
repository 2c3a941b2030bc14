#![forbid(unsafe_code)]
//! seqflow-operators: lazy operators over the `Enumerator` pull protocol.
//!
//! Design intent:
//! - Every operator is a struct holding its upstream enumerator plus whatever
//!   state its algorithm needs (a counter, a seen-list, group buckets).
//! - Nothing is pulled before the consumer asks. Operators that need the whole
//!   input (group, join, order, set filters) drain upstream on their first pull.
//! - Callbacks receive an `ItemContext`; a cancelled context ends the operator
//!   as if upstream were exhausted.
//! - `reset` is forwarded upstream and clears operator state; an operator is
//!   resettable only when all of its inputs are.

pub mod chunk;
pub mod combine;
pub mod distinct;
pub mod filter;
pub mod group;
pub mod join;
pub mod map;
pub mod slice;
pub mod sort;

mod trace;

pub use chunk::Chunk;
pub use combine::{Concat, DefaultIfEmpty, Zip};
pub use distinct::{Distinct, SetFilter, SetMode};
pub use filter::Filter;
pub use group::{GroupBy, Grouping};
pub use join::{GroupJoin, Join, JoinInputs};
pub use map::SelectMany;
pub use slice::{SkipWhile, Take, TakeWhile};
pub use sort::{KeyLevel, OrderBy, PositionLevel, SortLevel, ValueLevel};
