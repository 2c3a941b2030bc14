#![forbid(unsafe_code)]
//! seqflow-core: the pull protocol and the pieces every operator shares.
//!
//! - `enumerator`: the `Enumerator` pull trait and the `Cursor` state machine.
//! - `context`: `ItemContext` and the per-operator `ContextThread`.
//! - `source`: indexed (resettable) and external (one-shot) source adapters.
//! - `compare`: equality and ordering comparers.
//! - `config`: `PipelineConfig`.
//!
//! Everything here is synchronous and single-consumer.

pub mod compare;
pub mod config;
pub mod context;
pub mod enumerator;
pub mod error;
pub mod prelude;
pub mod source;

pub use error::{Error, Result};
