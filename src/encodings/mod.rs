// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

mod adaptive;
mod bitpack;
mod delta;
mod dict;
mod plain;
mod rle;

use serde::{Deserialize, Serialize};

pub use adaptive::{
    choose_encoding, gen_stats, AdaptiveEncoder, Choice, IntegerStats, BITPACK_SELECTION_MAX_WIDTH,
    RLE_SELECTION_MIN_RUN,
};
pub use bitpack::BitPacker;
pub use delta::{DeltaBlockEncoder, DELTA_BLOCK_SIZE, DELTA_MINI_BLOCKS};
pub use dict::DictionaryEncoder;
pub use plain::PlainEncoder;
pub use rle::{RunHybridEncoder, LITERAL_FLUSH_THRESHOLD, MIN_RUN_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Encoding {
    /// Values copied as little-endian bytes, `size_of::<T>()` per value.
    Plain,

    /// Unsigned integers packed in groups of 8 at a fixed bit width.
    BitPacked,

    /// Alternating run-length runs and bit-packed literal runs.
    /// Every run starts with a 4 byte header whose low bit tells them apart.
    RunHybrid,

    /// Frame-of-reference deltas over blocks of 128 values.
    /// Works best on sorted or slowly varying integers.
    DeltaBinaryPacked,

    /// Distinct values stored once, followed by bit-packed indices.
    Dictionary,
}

/// The contract every codec implements.
///
/// A codec owns exactly one chunk between construction (or [`Encoder::clear`])
/// and its next clear. Values are copied during [`Encoder::put`] and never
/// retained by reference.
pub trait Encoder<T> {
    /// Appends `values` to the chunk.
    fn put(&mut self, values: &[T]);

    /// Finalizes buffered state and returns the encoded chunk.
    ///
    /// Flushing again without an intervening `put` or `clear` returns the same bytes.
    fn flush(&mut self) -> &[u8];

    /// Resets the codec to its freshly constructed state.
    fn clear(&mut self);
}
