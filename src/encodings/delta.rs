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

use crate::errors::{Error, Result};
use crate::schema::LogicalType;
use crate::util::bit_pack::{get_bits_needed, pack_groups64, BITPACK_GROUP_SIZE};
use crate::util::varint::{encode_uleb128, zigzag_encode};

use super::Encoder;

/// Number of deltas sharing one `min_delta` and bit width.
pub const DELTA_BLOCK_SIZE: usize = 128;
/// Number of width bytes written per block.
pub const DELTA_MINI_BLOCKS: usize = 4;

/// Delta is a data preparation codec for sorted or slowly varying integers.
///
/// Layout:
/// ```text
/// header: uleb128(128) uleb128(4) uleb128(total_count) uleb128(zigzag(first_value))
/// block:  uleb128(zigzag(min_delta)) [bit_width; 4] packed(delta - min_delta)
/// ```
/// Deltas use wrapping arithmetic, so adjusted deltas may need up to 64 bits.
#[derive(Debug, Clone)]
pub struct DeltaBlockEncoder {
    logical_type: LogicalType,
    values: Vec<i64>,
    buffer: Vec<u8>,
}

impl DeltaBlockEncoder {
    pub fn try_new(logical_type: LogicalType) -> Result<Self> {
        match logical_type {
            LogicalType::Int32 | LogicalType::Int64 => Ok(Self {
                logical_type,
                values: vec![],
                buffer: vec![],
            }),
            other => Err(Error::unsupported("DeltaBlockEncoder", other)),
        }
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn flush(&mut self) -> &[u8] {
        self.encode();
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.buffer.clear();
    }

    fn encode(&mut self) {
        self.buffer.clear();
        let first = match self.values.first() {
            Some(first) => *first,
            None => return,
        };

        encode_uleb128(DELTA_BLOCK_SIZE as u64, &mut self.buffer);
        encode_uleb128(DELTA_MINI_BLOCKS as u64, &mut self.buffer);
        encode_uleb128(self.values.len() as u64, &mut self.buffer);
        encode_uleb128(zigzag_encode(first), &mut self.buffer);

        let deltas: Vec<i64> = self
            .values
            .windows(2)
            .map(|w| w[1].wrapping_sub(w[0]))
            .collect();

        let mut adjusted = Vec::with_capacity(DELTA_BLOCK_SIZE);
        for block in deltas.chunks(DELTA_BLOCK_SIZE) {
            let min_delta = block.iter().copied().min().unwrap_or_default();
            adjusted.clear();
            adjusted.extend(block.iter().map(|d| d.wrapping_sub(min_delta) as u64));
            let width = get_bits_needed(adjusted.iter().copied().max().unwrap_or_default());

            encode_uleb128(zigzag_encode(min_delta), &mut self.buffer);
            self.buffer.extend_from_slice(&[width as u8; DELTA_MINI_BLOCKS]);

            let padded = adjusted.len().div_ceil(BITPACK_GROUP_SIZE) * BITPACK_GROUP_SIZE;
            adjusted.resize(padded, 0);
            pack_groups64(&adjusted, &mut self.buffer, width);
        }
    }

    // Puts of the other integer width are logged and dropped.
    fn accepts(&self, physical: LogicalType, len: usize) -> bool {
        if self.logical_type == physical {
            return true;
        }
        log::warn!(
            "ignoring {} {:?} values written to a {:?} delta encoder",
            len,
            physical,
            self.logical_type
        );
        false
    }
}

impl Encoder<i32> for DeltaBlockEncoder {
    fn put(&mut self, values: &[i32]) {
        if self.accepts(LogicalType::Int32, values.len()) {
            self.values.extend(values.iter().map(|v| *v as i64));
        }
    }

    fn flush(&mut self) -> &[u8] {
        DeltaBlockEncoder::flush(self)
    }

    fn clear(&mut self) {
        DeltaBlockEncoder::clear(self)
    }
}

impl Encoder<i64> for DeltaBlockEncoder {
    fn put(&mut self, values: &[i64]) {
        if self.accepts(LogicalType::Int64, values.len()) {
            self.values.extend_from_slice(values);
        }
    }

    fn flush(&mut self) -> &[u8] {
        DeltaBlockEncoder::flush(self)
    }

    fn clear(&mut self) {
        DeltaBlockEncoder::clear(self)
    }
}
