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

//! Bloom filter used to skip column chunks on point lookups.

use crate::errors::{Error, Result};

/// Seed of the MurmurHash64A digest unless configured otherwise.
pub const DEFAULT_BLOOM_SEED: u32 = 0x9747_b28c;
/// False positive probability used when none is configured.
pub const DEFAULT_BLOOM_FPP: f64 = 0.05;

const MIN_NUM_BITS: usize = 64;
// bit positions are derived from u32 hashes
const MAX_NUM_BITS: f64 = (1u64 << 32) as f64;

/// Bloom filter sized for an expected number of items and a target false positive probability.
///
/// Probe `i` of a value tests bit `(h1 + i * h2) mod num_bits`, where `h1` and `h2` are
/// the low and high halves of its 64-bit digest, computed in wrapping 32-bit arithmetic.
/// Bits are addressed LSB-first inside each byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bitset: Vec<u8>,
    num_bits: usize,
    num_hashes: usize,
    seed: u32,
}

impl BloomFilter {
    pub fn try_new(expected_items: usize, fpp: f64) -> Result<Self> {
        Self::with_seed(expected_items, fpp, DEFAULT_BLOOM_SEED)
    }

    pub fn with_seed(expected_items: usize, fpp: f64, seed: u32) -> Result<Self> {
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(general_err!(
                "bloom filter false positive probability must be in (0, 1), got {}",
                fpp
            ));
        }
        let n = expected_items.max(1) as f64;
        let ln2 = std::f64::consts::LN_2;

        let num_bits = (-(n * fpp.ln()) / (ln2 * ln2)).ceil();
        if num_bits > MAX_NUM_BITS {
            return Err(general_err!(
                "bloom filter for {} items at fpp {} needs {} bits, more than {}",
                expected_items,
                fpp,
                num_bits,
                MAX_NUM_BITS
            ));
        }
        let num_bits = (num_bits as usize).max(MIN_NUM_BITS).div_ceil(8) * 8;
        let num_hashes = ((num_bits as f64 / n) * ln2).round().max(1.0) as usize;

        Ok(Self {
            bitset: vec![0; num_bits / 8],
            num_bits,
            num_hashes,
            seed,
        })
    }

    /// Rebuilds a filter from a serialized bitset and its parameters.
    pub fn from_parts(bitset: Vec<u8>, num_hashes: usize, seed: u32) -> Result<Self> {
        if bitset.is_empty() || num_hashes == 0 {
            return Err(general_err!(
                "invalid bloom filter of {} bytes with {} hashes",
                bitset.len(),
                num_hashes
            ));
        }
        Ok(Self {
            num_bits: bitset.len() * 8,
            bitset,
            num_hashes,
            seed,
        })
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn insert_i64(&mut self, value: i64) {
        self.insert_hash(murmur_hash64a(&value.to_le_bytes(), self.seed));
    }

    pub fn insert_bytes(&mut self, value: &[u8]) {
        self.insert_hash(murmur_hash64a(value, self.seed));
    }

    /// Returns false only if `value` was never inserted.
    pub fn find_i64(&self, value: i64) -> bool {
        self.find_hash(murmur_hash64a(&value.to_le_bytes(), self.seed))
    }

    pub fn find_bytes(&self, value: &[u8]) -> bool {
        self.find_hash(murmur_hash64a(value, self.seed))
    }

    /// The raw bitset, `num_bits / 8` bytes.
    pub fn serialize(&self) -> &[u8] {
        &self.bitset
    }

    /// Unsets every bit, keeping the sizing.
    pub fn clear(&mut self) {
        self.bitset.fill(0);
    }

    fn insert_hash(&mut self, hash: u64) {
        for bit in probes(hash, self.num_hashes, self.num_bits) {
            self.bitset[bit / 8] |= 1 << (bit % 8);
        }
    }

    fn find_hash(&self, hash: u64) -> bool {
        probes(hash, self.num_hashes, self.num_bits)
            .all(|bit| self.bitset[bit / 8] & (1 << (bit % 8)) != 0)
    }
}

fn probes(hash: u64, num_hashes: usize, num_bits: usize) -> impl Iterator<Item = usize> {
    let h1 = hash as u32;
    let h2 = (hash >> 32) as u32;
    (0..num_hashes as u32).map(move |i| h1.wrapping_add(i.wrapping_mul(h2)) as usize % num_bits)
}

fn murmur_hash64a(key: &[u8], seed: u32) -> u64 {
    const M: u64 = 0xc6a4_a793_5bd1_e995;
    const R: u32 = 47;

    let mut h = (seed as u64) ^ (key.len() as u64).wrapping_mul(M);

    let mut chunks = key.chunks_exact(8);
    for chunk in &mut chunks {
        let mut k = u64::from_le_bytes(chunk.try_into().unwrap_or_default());
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate() {
            h ^= (*byte as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}
