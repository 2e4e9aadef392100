use serde::{Deserialize, Serialize};

use crate::bloom::{DEFAULT_BLOOM_FPP, DEFAULT_BLOOM_SEED};
use crate::errors::Result;
use crate::Compression;

/// Options declaring the behaviour of a [`super::ChunkWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Codec applied to every encoded chunk. Chunks it cannot shrink are stored raw.
    #[serde(default)]
    pub compression: Compression,
    /// Builds one Bloom filter per column when set.
    #[serde(default)]
    pub bloom_filter: Option<BloomFilterOptions>,
}

impl WriteOptions {
    /// Parses options such as
    /// `{"compression": "LZ4", "bloom_filter": {"expected_items": 1000}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloomFilterOptions {
    pub expected_items: usize,
    #[serde(default = "default_fpp")]
    pub fpp: f64,
    #[serde(default = "default_seed")]
    pub seed: u32,
}

fn default_fpp() -> f64 {
    DEFAULT_BLOOM_FPP
}

fn default_seed() -> u32 {
    DEFAULT_BLOOM_SEED
}

impl BloomFilterOptions {
    pub fn new(expected_items: usize) -> Self {
        Self {
            expected_items,
            fpp: DEFAULT_BLOOM_FPP,
            seed: DEFAULT_BLOOM_SEED,
        }
    }
}
