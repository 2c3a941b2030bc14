//! Convenient re-exports for downstream crates.

pub use crate::compare::{Comparer, EqualityComparer, EqualityKind};
pub use crate::config::PipelineConfig;
pub use crate::context::{ContextThread, ItemContext};
pub use crate::enumerator::{Cursor, Enumerator};
pub use crate::error::{Error, Result};
pub use crate::source::Source;
