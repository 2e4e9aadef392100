//! APIs to encode columns of a row group into column chunks.
pub(crate) mod common;
pub(crate) mod writer;

pub use common::{BloomFilterOptions, WriteOptions};
pub use writer::ChunkWriter;
