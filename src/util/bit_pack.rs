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

//! Group bit-packing: 8 values per group, `width` bits per value, low bits
//! first, least significant bit first within every byte. A group always
//! occupies exactly `width` bytes.

use seq_macro::seq;

pub const BITPACK_GROUP_SIZE: usize = 8;

/// Widest value the public [`crate::encodings::BitPacker`] accepts.
pub const MAX_BIT_WIDTH: usize = 32;

#[inline]
pub fn width_mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Number of bits needed to represent `max`, i.e. `ceil(log2(max + 1))`.
#[inline]
pub fn get_bits_needed(max: u64) -> usize {
    (64 - max.leading_zeros()) as usize
}

/// Bytes needed to pack `num_values` values once padded to whole groups.
#[inline]
pub fn need_bytes(num_values: usize, width: usize) -> usize {
    num_values.div_ceil(BITPACK_GROUP_SIZE) * width
}

/// Packs one group of 8 values into `output[..width]`.
pub fn pack64(input: &[u64], output: &mut [u8], width: usize) {
    debug_assert_eq!(input.len(), BITPACK_GROUP_SIZE);
    debug_assert!(width <= 64 && output.len() >= width);
    match width {
        0 => {}
        4 => pack_nibbles(input, output),
        _ => {
            let mask = width_mask(width);
            let mut acc: u128 = 0;
            let mut filled = 0usize;
            let mut pos = 0usize;
            seq!(i in 0..8 {
                acc |= ((input[i] & mask) as u128) << filled;
                filled += width;
                while filled >= 8 {
                    output[pos] = acc as u8;
                    pos += 1;
                    acc >>= 8;
                    filled -= 8;
                }
            });
        }
    }
}

// 8 nibbles fill exactly one little-endian u32.
#[inline]
fn pack_nibbles(input: &[u64], output: &mut [u8]) {
    let mut word = 0u32;
    seq!(i in 0..8 {
        word |= ((input[i] & 0xF) as u32) << (4 * i);
    });
    output[..4].copy_from_slice(&word.to_le_bytes());
}

pub fn pack32(input: &[u32], output: &mut [u8], width: usize) {
    debug_assert_eq!(input.len(), BITPACK_GROUP_SIZE);
    let mut widened = [0u64; BITPACK_GROUP_SIZE];
    for (w, v) in widened.iter_mut().zip(input) {
        *w = *v as u64;
    }
    pack64(&widened, output, width);
}

/// Unpacks one group of 8 values from `input[..width]`.
pub fn unpack64(input: &[u8], output: &mut [u64], width: usize) {
    debug_assert_eq!(output.len(), BITPACK_GROUP_SIZE);
    let mask = width_mask(width);
    let mut acc: u128 = 0;
    let mut filled = 0usize;
    let mut pos = 0usize;
    for o in output.iter_mut() {
        while filled < width {
            acc |= (input[pos] as u128) << filled;
            pos += 1;
            filled += 8;
        }
        *o = (acc as u64) & mask;
        acc >>= width;
        filled -= width;
    }
}

pub fn unpack32(input: &[u8], output: &mut [u32], width: usize) {
    let mut widened = [0u64; BITPACK_GROUP_SIZE];
    unpack64(input, &mut widened, width);
    for (o, v) in output.iter_mut().zip(widened) {
        *o = v as u32;
    }
}

/// Appends the packed form of `values`, whose length must be a multiple of 8.
pub fn pack_groups64(values: &[u64], output: &mut Vec<u8>, width: usize) {
    debug_assert_eq!(values.len() % BITPACK_GROUP_SIZE, 0);
    if width == 0 {
        return;
    }
    let start = output.len();
    output.resize(start + values.len() / BITPACK_GROUP_SIZE * width, 0);
    for (i_block, o_block) in values
        .chunks_exact(BITPACK_GROUP_SIZE)
        .zip(output[start..].chunks_exact_mut(width))
    {
        pack64(i_block, o_block, width);
    }
}

/// Unpacks the first `length` values of a packed stream.
pub fn unpack_groups32(input: &[u8], length: usize, width: usize) -> Vec<u32> {
    let mut output = vec![0u32; length.div_ceil(BITPACK_GROUP_SIZE) * BITPACK_GROUP_SIZE];
    if width > 0 {
        for (o_block, i_block) in output
            .chunks_exact_mut(BITPACK_GROUP_SIZE)
            .zip(input.chunks(width))
        {
            unpack32(i_block, o_block, width);
        }
    }
    output.truncate(length);
    output
}

/// Unpacks the first `length` values of a packed stream of up to 64-bit values.
pub fn unpack_groups64(input: &[u8], length: usize, width: usize) -> Vec<u64> {
    let mut output = vec![0u64; length.div_ceil(BITPACK_GROUP_SIZE) * BITPACK_GROUP_SIZE];
    if width > 0 {
        for (o_block, i_block) in output
            .chunks_exact_mut(BITPACK_GROUP_SIZE)
            .zip(input.chunks(width))
        {
            unpack64(i_block, o_block, width);
        }
    }
    output.truncate(length);
    output
}
