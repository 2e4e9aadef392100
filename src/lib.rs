#[macro_use]
mod errors;

pub mod bloom;
pub mod compression;
pub mod encodings;
pub mod schema;
pub mod util;
pub mod write;

pub use bloom::BloomFilter;
pub use compression::{CompressOutcome, Compression};
pub use encodings::{Encoder, Encoding};
pub use errors::{Error, Result};
pub use schema::{ColumnSpec, LogicalType, Schema};
pub use write::{BloomFilterOptions, ChunkWriter, WriteOptions};

use bytes::Bytes;

/// Everything a reader needs to decode one column chunk.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColumnChunkMeta {
    pub name: String,
    pub logical_type: LogicalType,
    pub encoding: Encoding,
    // bit width of the packed values, for BitPacked and RunHybrid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<u8>,
    pub compression: Compression,
    pub num_values: u64,
    // size of the encoded chunk before compression
    pub uncompressed_length: u64,
    // size of the stored chunk
    pub length: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_filter: Option<BloomFilterMeta>,
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct BloomFilterMeta {
    pub num_bits: u64,
    pub num_hashes: u32,
    pub seed: u32,
}

/// An encoded column chunk and its optional serialized Bloom filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnChunk {
    pub meta: ColumnChunkMeta,
    pub data: Bytes,
    pub bloom_filter: Option<Bytes>,
}

impl ColumnChunk {
    /// Loads the chunk's Bloom filter back, if one was written.
    pub fn bloom(&self) -> Option<BloomFilter> {
        let meta = self.meta.bloom_filter?;
        let bitset = self.bloom_filter.as_ref()?;
        BloomFilter::from_parts(bitset.to_vec(), meta.num_hashes as usize, meta.seed).ok()
    }
}
