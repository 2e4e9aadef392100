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

use crate::errors::Result;
use crate::util::bit_pack::BITPACK_GROUP_SIZE;

use super::{BitPacker, Encoder};

/// Runs shorter than this are cheaper as literals.
pub const MIN_RUN_LENGTH: usize = 8;
/// Pending literals are emitted once this many are buffered.
pub const LITERAL_FLUSH_THRESHOLD: usize = 512;
// the run header stores `run_length << 1` in a u32
const MAX_RUN_LENGTH: usize = (u32::MAX >> 1) as usize;

/// Hybrid run-length / bit-packed encoder over unsigned integers.
///
/// The stream is a sequence of runs, each starting with a 4 byte little-endian header:
/// - RLE run: `(run_length << 1) | 0`, followed by `ceil(bit_width / 8)` bytes of the value.
/// - literal run: `(num_groups << 1) | 1`, followed by `num_groups * bit_width` bytes
///   of bit-packed values.
///
/// Runs appear in input order. Literal runs written before the final flush always
/// hold whole groups of 8, so zero padding only ever appears at the end of the stream.
#[derive(Debug, Clone)]
pub struct RunHybridEncoder {
    bit_width: usize,
    buffer: Vec<u8>,
    packer: BitPacker,
    current_value: u32,
    run_length: usize,
    literals: Vec<u32>,
}

impl RunHybridEncoder {
    pub fn try_new(bit_width: usize) -> Result<Self> {
        Ok(Self {
            bit_width,
            buffer: vec![],
            packer: BitPacker::try_new(bit_width)?,
            current_value: 0,
            run_length: 0,
            literals: Vec::with_capacity(LITERAL_FLUSH_THRESHOLD + BITPACK_GROUP_SIZE),
        })
    }

    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    fn push(&mut self, value: u32) {
        if self.run_length == 0 {
            self.current_value = value;
            self.run_length = 1;
        } else if value == self.current_value {
            self.run_length += 1;
            if self.run_length == MAX_RUN_LENGTH {
                self.end_run();
            }
        } else {
            self.end_run();
            self.current_value = value;
            self.run_length = 1;
        }
    }

    /// Closes the open run, writing it as an RLE run or folding it into the literals.
    fn end_run(&mut self) {
        if self.run_length >= MIN_RUN_LENGTH {
            self.align_literals();
        }
        if self.run_length >= MIN_RUN_LENGTH {
            self.write_literals(false);
            self.write_run();
        } else {
            let value = self.current_value;
            self.literals.extend(std::iter::repeat(value).take(self.run_length));
            if self.literals.len() >= LITERAL_FLUSH_THRESHOLD {
                self.write_literals(false);
            }
        }
        self.run_length = 0;
    }

    // Moves values of the open run into the literals until they fill whole groups.
    fn align_literals(&mut self) {
        let missing = (BITPACK_GROUP_SIZE - self.literals.len() % BITPACK_GROUP_SIZE)
            % BITPACK_GROUP_SIZE;
        let moved = missing.min(self.run_length);
        let value = self.current_value;
        self.literals.extend(std::iter::repeat(value).take(moved));
        self.run_length -= moved;
    }

    fn write_run(&mut self) {
        let header = (self.run_length as u32) << 1;
        self.buffer.extend_from_slice(&header.to_le_bytes());
        let value_bytes = self.bit_width.div_ceil(8);
        self.buffer
            .extend_from_slice(&self.current_value.to_le_bytes()[..value_bytes]);
    }

    /// Writes the buffered literals as one literal run. Without `pad` only whole
    /// groups are written and the tail stays buffered.
    fn write_literals(&mut self, pad: bool) {
        let count = if pad {
            self.literals.len().div_ceil(BITPACK_GROUP_SIZE) * BITPACK_GROUP_SIZE
        } else {
            self.literals.len() / BITPACK_GROUP_SIZE * BITPACK_GROUP_SIZE
        };
        if count == 0 {
            return;
        }
        self.literals.resize(self.literals.len().max(count), 0);

        let num_groups = (count / BITPACK_GROUP_SIZE) as u32;
        self.buffer
            .extend_from_slice(&((num_groups << 1) | 1).to_le_bytes());

        self.packer.clear();
        self.packer.put(&self.literals[..count]);
        self.buffer.extend_from_slice(self.packer.flush());
        self.literals.drain(..count);
    }
}

impl Encoder<u32> for RunHybridEncoder {
    fn put(&mut self, values: &[u32]) {
        for value in values {
            self.push(*value);
        }
    }

    fn flush(&mut self) -> &[u8] {
        if self.run_length > 0 {
            self.end_run();
        }
        self.write_literals(true);
        &self.buffer
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.packer.clear();
        self.literals.clear();
        self.current_value = 0;
        self.run_length = 0;
    }
}
