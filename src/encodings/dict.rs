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

use byteorder::{ByteOrder, LittleEndian};
use hashbrown::hash_map::RawEntryMut;
use hashbrown::HashMap;

use crate::errors::{Error, Result};
use crate::schema::LogicalType;
use crate::util::bit_pack::{get_bits_needed, BITPACK_GROUP_SIZE};

use super::{BitPacker, Encoder};

const DEFAULT_DEDUP_CAPACITY: usize = 4096;

/// Insertion-ordered interner: the first distinct value gets index 0, the next 1, and so on.
#[derive(Debug, Clone)]
struct DictMap {
    state: ahash::RandomState,
    dedup: HashMap<u32, (), ()>,
    entries: Vec<i64>,
}

impl DictMap {
    fn new() -> Self {
        Self {
            state: Default::default(),
            dedup: HashMap::with_capacity_and_hasher(DEFAULT_DEDUP_CAPACITY, ()),
            entries: vec![],
        }
    }

    fn entry_key(&mut self, value: i64) -> u32 {
        let hash = self.state.hash_one(value);

        let entry = self
            .dedup
            .raw_entry_mut()
            .from_hash(hash, |index| value == self.entries[*index as usize]);

        match entry {
            RawEntryMut::Occupied(entry) => *entry.into_key(),
            RawEntryMut::Vacant(entry) => {
                let key = self.entries.len() as u32;
                self.entries.push(value);
                *entry
                    .insert_with_hasher(hash, key, (), |key| {
                        self.state.hash_one(self.entries[*key as usize])
                    })
                    .0
            }
        }
    }

    fn clear(&mut self) {
        self.dedup.clear();
        self.entries.clear();
    }
}

/// Dictionary encoder for INT64 columns.
///
/// Output format:
/// ```text
/// [entry_count: u32 LE][entries: i64 LE, in first-seen order][index_bit_width: u8][packed indices]
/// ```
/// The index stream is zero padded to a multiple of 8 before packing.
#[derive(Debug, Clone)]
pub struct DictionaryEncoder {
    interner: DictMap,
    indices: Vec<u32>,
    buffer: Vec<u8>,
}

impl DictionaryEncoder {
    pub fn try_new(logical_type: LogicalType) -> Result<Self> {
        if logical_type != LogicalType::Int64 {
            return Err(Error::unsupported("DictionaryEncoder", logical_type));
        }
        Ok(Self {
            interner: DictMap::new(),
            indices: vec![],
            buffer: vec![],
        })
    }

    /// Distinct values in index order.
    pub fn dictionary(&self) -> &[i64] {
        &self.interner.entries
    }

    /// One index per value written so far.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Width of one packed index.
    pub fn index_bit_width(&self) -> usize {
        match self.interner.entries.len() {
            0 | 1 => 0,
            n => get_bits_needed(n as u64 - 1),
        }
    }
}

impl Encoder<i64> for DictionaryEncoder {
    fn put(&mut self, values: &[i64]) {
        self.indices.reserve(values.len());
        for value in values {
            let key = self.interner.entry_key(*value);
            self.indices.push(key);
        }
    }

    fn flush(&mut self) -> &[u8] {
        let entries = &self.interner.entries;
        let width = self.index_bit_width();

        self.buffer.clear();
        self.buffer.resize(4, 0);
        LittleEndian::write_u32(&mut self.buffer, entries.len() as u32);
        for entry in entries {
            self.buffer.extend_from_slice(&entry.to_le_bytes());
        }
        self.buffer.push(width as u8);

        // width is at most 32 since the dictionary is indexed by u32
        if let Ok(mut packer) = BitPacker::try_new(width) {
            packer.put(&self.indices);
            let padding = (BITPACK_GROUP_SIZE - packer.pending_len()) % BITPACK_GROUP_SIZE;
            packer.put(&[0; BITPACK_GROUP_SIZE][..padding]);
            self.buffer.extend_from_slice(packer.flush());
        }

        log::debug!(
            "dictionary encoded {} values into {} entries at index width {}",
            self.indices.len(),
            entries.len(),
            width
        );
        &self.buffer
    }

    fn clear(&mut self) {
        self.interner.clear();
        self.indices.clear();
        self.buffer.clear();
    }
}
