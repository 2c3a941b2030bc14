//! Pipeline configuration that sequences carry from source to terminal.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Count used by `skip` when the caller passes a negative count.
    pub default_skip_count: usize,

    /// Count used by `take` when the caller passes a negative count.
    pub default_take_count: usize,

    /// Chunk size used by `chunk` when the caller passes a non-positive size.
    pub default_chunk_size: usize,

    /// Initial capacity for buffers of materializing operators (sort, group, join).
    pub materialize_capacity_hint: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_skip_count: 1,
            default_take_count: 1,
            default_chunk_size: 1,
            materialize_capacity_hint: 16,
        }
    }
}

impl PipelineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SEQFLOW_DEFAULT_SKIP`: substitute count for negative `skip`
    /// - `SEQFLOW_DEFAULT_TAKE`: substitute count for negative `take`
    /// - `SEQFLOW_DEFAULT_CHUNK`: substitute size for non-positive `chunk`
    /// - `SEQFLOW_CAPACITY_HINT`: initial buffer capacity for materializing operators
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("SEQFLOW_DEFAULT_SKIP") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.default_skip_count = v;
            }
        }

        if let Ok(s) = std::env::var("SEQFLOW_DEFAULT_TAKE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.default_take_count = v;
            }
        }

        if let Ok(s) = std::env::var("SEQFLOW_DEFAULT_CHUNK") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.default_chunk_size = v;
            }
        }

        if let Ok(s) = std::env::var("SEQFLOW_CAPACITY_HINT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.materialize_capacity_hint = v;
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// A chunk size of zero would never make progress.
    pub fn validate(&self) -> Result<()> {
        if self.default_chunk_size == 0 {
            return Err(Error::Config("default_chunk_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Normalize a caller-supplied skip count.
    pub fn skip_count(&self, count: i64) -> usize {
        normalize(count, self.default_skip_count)
    }

    /// Normalize a caller-supplied take count.
    pub fn take_count(&self, count: i64) -> usize {
        normalize(count, self.default_take_count)
    }

    /// Normalize a caller-supplied chunk size. Zero is not a usable size.
    pub fn chunk_size(&self, size: i64) -> usize {
        if size <= 0 {
            self.default_chunk_size.max(1)
        } else {
            size as usize
        }
    }
}

fn normalize(count: i64, default: usize) -> usize {
    if count < 0 {
        default
    } else {
        count as usize
    }
}
