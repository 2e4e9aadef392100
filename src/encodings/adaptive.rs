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

use arrow::types::{NativeType, PrimitiveType};

use crate::errors::{Error, Result};
use crate::schema::LogicalType;
use crate::util::bit_pack::{get_bits_needed, BITPACK_GROUP_SIZE, MAX_BIT_WIDTH};

use super::{BitPacker, Encoder, Encoding, PlainEncoder, RunHybridEncoder};

/// A chunk is run-length encoded when its longest run is strictly longer than this.
pub const RLE_SELECTION_MIN_RUN: usize = 10;
/// Non-negative chunks are bit-packed when they need strictly fewer bits than this.
pub const BITPACK_SELECTION_MAX_WIDTH: usize = 28;

/// Single-pass statistics over an INT32 chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerStats {
    pub tuple_count: usize,
    pub min: i32,
    pub max: i32,
    pub max_run_length: usize,
}

pub fn gen_stats(values: &[i32]) -> IntegerStats {
    let mut stats = IntegerStats {
        tuple_count: values.len(),
        ..Default::default()
    };
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return stats;
    };
    stats.min = first;
    stats.max = first;
    stats.max_run_length = 1;

    let mut last_value = first;
    let mut run_length = 1;
    for current_value in iter {
        if current_value == last_value {
            run_length += 1;
        } else {
            last_value = current_value;
            run_length = 1;
        }
        stats.max_run_length = stats.max_run_length.max(run_length);
        if current_value > stats.max {
            stats.max = current_value;
        } else if current_value < stats.min {
            stats.min = current_value;
        }
    }
    stats
}

/// The codec picked for one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    RunHybrid { bit_width: usize },
    BitPacked { bit_width: usize },
    Plain,
}

impl Choice {
    pub fn encoding(&self) -> Encoding {
        match self {
            Choice::RunHybrid { .. } => Encoding::RunHybrid,
            Choice::BitPacked { .. } => Encoding::BitPacked,
            Choice::Plain => Encoding::Plain,
        }
    }

    pub fn bit_width(&self) -> Option<usize> {
        match self {
            Choice::RunHybrid { bit_width } | Choice::BitPacked { bit_width } => Some(*bit_width),
            Choice::Plain => None,
        }
    }
}

pub fn choose_encoding(stats: &IntegerStats) -> Choice {
    // negative values only fit in the full 32 bits of their two's complement
    let bit_width = (stats.min >= 0).then(|| get_bits_needed(stats.max as u64));

    if stats.max_run_length > RLE_SELECTION_MIN_RUN {
        Choice::RunHybrid {
            bit_width: bit_width.unwrap_or(MAX_BIT_WIDTH),
        }
    } else {
        match bit_width {
            Some(bit_width) if bit_width < BITPACK_SELECTION_MAX_WIDTH => {
                Choice::BitPacked { bit_width }
            }
            _ => Choice::Plain,
        }
    }
}

/// Values buffered for one chunk, typed by the column's logical type.
#[derive(Debug, Clone)]
enum ColumnBuffer {
    Boolean(Vec<u8>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl ColumnBuffer {
    fn try_new(logical_type: LogicalType) -> Result<Self> {
        Ok(match logical_type {
            LogicalType::Boolean => ColumnBuffer::Boolean(vec![]),
            LogicalType::Int32 => ColumnBuffer::Int32(vec![]),
            LogicalType::Int64 => ColumnBuffer::Int64(vec![]),
            LogicalType::Float => ColumnBuffer::Float(vec![]),
            LogicalType::Double => ColumnBuffer::Double(vec![]),
            other => return Err(Error::unsupported("AdaptiveEncoder", other)),
        })
    }

    fn primitive(&self) -> PrimitiveType {
        match self {
            ColumnBuffer::Boolean(_) => PrimitiveType::UInt8,
            ColumnBuffer::Int32(_) => PrimitiveType::Int32,
            ColumnBuffer::Int64(_) => PrimitiveType::Int64,
            ColumnBuffer::Float(_) => PrimitiveType::Float32,
            ColumnBuffer::Double(_) => PrimitiveType::Float64,
        }
    }

    /// Appends `values` if `T` is the buffer's element type.
    fn extend<T: NativeType>(&mut self, values: &[T]) -> bool {
        if T::PRIMITIVE != self.primitive() {
            return false;
        }
        match self {
            ColumnBuffer::Boolean(buf) => buf.extend_from_slice(bytemuck::cast_slice(values)),
            ColumnBuffer::Int32(buf) => buf.extend_from_slice(bytemuck::cast_slice(values)),
            ColumnBuffer::Int64(buf) => buf.extend_from_slice(bytemuck::cast_slice(values)),
            ColumnBuffer::Float(buf) => buf.extend_from_slice(bytemuck::cast_slice(values)),
            ColumnBuffer::Double(buf) => buf.extend_from_slice(bytemuck::cast_slice(values)),
        }
        true
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            ColumnBuffer::Boolean(buf) => buf.as_slice(),
            ColumnBuffer::Int32(buf) => bytemuck::cast_slice(buf),
            ColumnBuffer::Int64(buf) => bytemuck::cast_slice(buf),
            ColumnBuffer::Float(buf) => bytemuck::cast_slice(buf),
            ColumnBuffer::Double(buf) => bytemuck::cast_slice(buf),
        }
    }

    fn as_unsigned(&self) -> &[u32] {
        match self {
            ColumnBuffer::Int32(buf) => bytemuck::cast_slice(buf),
            _ => &[],
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnBuffer::Boolean(buf) => buf.len(),
            ColumnBuffer::Int32(buf) => buf.len(),
            ColumnBuffer::Int64(buf) => buf.len(),
            ColumnBuffer::Float(buf) => buf.len(),
            ColumnBuffer::Double(buf) => buf.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            ColumnBuffer::Boolean(buf) => buf.clear(),
            ColumnBuffer::Int32(buf) => buf.clear(),
            ColumnBuffer::Int64(buf) => buf.clear(),
            ColumnBuffer::Float(buf) => buf.clear(),
            ColumnBuffer::Double(buf) => buf.clear(),
        }
    }
}

#[derive(Debug, Clone)]
enum Delegate {
    RunHybrid(RunHybridEncoder),
    BitPack(BitPacker),
    Plain(PlainEncoder<u8>),
}

impl Delegate {
    fn try_new(choice: Choice) -> Result<Self> {
        Ok(match choice {
            Choice::RunHybrid { bit_width } => {
                Delegate::RunHybrid(RunHybridEncoder::try_new(bit_width)?)
            }
            Choice::BitPacked { bit_width } => Delegate::BitPack(BitPacker::try_new(bit_width)?),
            Choice::Plain => Delegate::Plain(PlainEncoder::new()),
        })
    }

    /// Encodes the whole buffered chunk from scratch.
    fn encode(&mut self, buffer: &ColumnBuffer) -> &[u8] {
        match self {
            Delegate::RunHybrid(encoder) => {
                encoder.clear();
                encoder.put(buffer.as_unsigned());
                encoder.flush()
            }
            Delegate::BitPack(packer) => {
                packer.clear();
                packer.put(buffer.as_unsigned());
                let padding = (BITPACK_GROUP_SIZE - packer.pending_len()) % BITPACK_GROUP_SIZE;
                packer.put(&[0; BITPACK_GROUP_SIZE][..padding]);
                packer.flush()
            }
            Delegate::Plain(encoder) => {
                encoder.clear();
                encoder.put(buffer.as_bytes());
                encoder.flush()
            }
        }
    }
}

/// Buffers a chunk and picks its codec on flush.
///
/// INT32 chunks choose between [`RunHybridEncoder`], [`BitPacker`] and plain
/// from [`gen_stats`]; every other type is written plain. The choice is made
/// over the whole buffer and is redone when values arrive after a flush.
#[derive(Debug, Clone)]
pub struct AdaptiveEncoder {
    logical_type: LogicalType,
    buffer: ColumnBuffer,
    selection: Option<(Choice, Delegate)>,
    // buffer length the selection was made for
    selected_len: usize,
}

impl AdaptiveEncoder {
    pub fn try_new(logical_type: LogicalType) -> Result<Self> {
        Ok(Self {
            logical_type,
            buffer: ColumnBuffer::try_new(logical_type)?,
            selection: None,
            selected_len: 0,
        })
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    /// Number of values buffered in the current chunk.
    pub fn num_values(&self) -> usize {
        self.buffer.len()
    }

    /// The codec chosen for the current chunk, once flushed.
    pub fn choice(&self) -> Option<Choice> {
        self.selection.as_ref().map(|(choice, _)| *choice)
    }

    pub fn selected(&self) -> Option<Encoding> {
        self.choice().map(|choice| choice.encoding())
    }

    /// Buffers `values`. Values whose type does not match the column are dropped.
    pub fn put<T: NativeType>(&mut self, values: &[T]) {
        if !self.buffer.extend(values) {
            log::warn!(
                "ignoring {} values of type {:?} written to a {:?} column",
                values.len(),
                T::PRIMITIVE,
                self.logical_type
            );
        }
    }

    pub fn flush(&mut self) -> &[u8] {
        let len = self.buffer.len();
        if len == 0 {
            return &[];
        }
        if self.selection.is_none() || self.selected_len != len {
            self.selection = Some(self.select());
            self.selected_len = len;
        }
        match &mut self.selection {
            Some((_, delegate)) => delegate.encode(&self.buffer),
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.selection = None;
        self.selected_len = 0;
    }

    fn select(&self) -> (Choice, Delegate) {
        let choice = match &self.buffer {
            ColumnBuffer::Int32(values) => choose_encoding(&gen_stats(values)),
            _ => Choice::Plain,
        };
        log::info!(
            "choose {:?} encoding for {:?} chunk of {} values",
            choice,
            self.logical_type,
            self.buffer.len()
        );
        match Delegate::try_new(choice) {
            Ok(delegate) => (choice, delegate),
            Err(e) => {
                log::warn!("{e}, falling back to plain encoding");
                (Choice::Plain, Delegate::Plain(PlainEncoder::new()))
            }
        }
    }
}

impl<T: NativeType> Encoder<T> for AdaptiveEncoder {
    fn put(&mut self, values: &[T]) {
        AdaptiveEncoder::put(self, values)
    }

    fn flush(&mut self) -> &[u8] {
        AdaptiveEncoder::flush(self)
    }

    fn clear(&mut self) {
        AdaptiveEncoder::clear(self)
    }
}
