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
use crate::util::bit_pack::{pack32, BITPACK_GROUP_SIZE, MAX_BIT_WIDTH};

use super::Encoder;

/// Packs unsigned integers at a fixed bit width, 8 values per group.
///
/// Only complete groups are ever emitted. A tail of fewer than 8 values stays
/// pending across [`Encoder::flush`] until more values arrive; callers that
/// need it written must pad their input to a multiple of 8.
#[derive(Debug, Clone)]
pub struct BitPacker {
    bit_width: usize,
    buffer: Vec<u8>,
    pending: Vec<u32>,
}

impl BitPacker {
    pub fn try_new(bit_width: usize) -> Result<Self> {
        if bit_width > MAX_BIT_WIDTH {
            return Err(contract_err!(
                "bit width {} exceeds the maximum of {}",
                bit_width,
                MAX_BIT_WIDTH
            ));
        }
        Ok(Self {
            bit_width,
            buffer: vec![],
            pending: Vec::with_capacity(BITPACK_GROUP_SIZE),
        })
    }

    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Values buffered but not yet packed.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn pack_pending(&mut self) {
        let whole = self.pending.len() / BITPACK_GROUP_SIZE * BITPACK_GROUP_SIZE;
        if whole == 0 {
            return;
        }
        let width = self.bit_width;
        if width > 0 {
            let start = self.buffer.len();
            self.buffer.resize(start + whole / BITPACK_GROUP_SIZE * width, 0);
            for (i_block, o_block) in self.pending[..whole]
                .chunks_exact(BITPACK_GROUP_SIZE)
                .zip(self.buffer[start..].chunks_exact_mut(width))
            {
                pack32(i_block, o_block, width);
            }
        }
        self.pending.drain(..whole);
    }
}

impl Encoder<u32> for BitPacker {
    fn put(&mut self, values: &[u32]) {
        self.pending.extend_from_slice(values);
        self.pack_pending();
    }

    fn flush(&mut self) -> &[u8] {
        self.pack_pending();
        &self.buffer
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.pending.clear();
    }
}
