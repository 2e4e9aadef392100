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

use byteorder::{LittleEndian, ReadBytesExt};
use colpack::encodings::{
    AdaptiveEncoder, BitPacker, Choice, DeltaBlockEncoder, DictionaryEncoder, Encoder,
    PlainEncoder, RunHybridEncoder,
};
use colpack::util::bit_pack::unpack_groups32;
use colpack::LogicalType;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Expands a hybrid run-length / bit-packed stream.
fn decode_hybrid(mut input: &[u8], width: usize) -> Vec<u32> {
    let mut values = vec![];
    while !input.is_empty() {
        let header = input.read_u32::<LittleEndian>().unwrap();
        if header & 1 == 0 {
            let value_bytes = width.div_ceil(8);
            let mut bytes = [0u8; 4];
            bytes[..value_bytes].copy_from_slice(&input[..value_bytes]);
            input = &input[value_bytes..];
            let run_length = (header >> 1) as usize;
            values.extend(std::iter::repeat(u32::from_le_bytes(bytes)).take(run_length));
        } else {
            let num_values = (header >> 1) as usize * 8;
            let size = num_values / 8 * width;
            values.extend(unpack_groups32(&input[..size], num_values, width));
            input = &input[size..];
        }
    }
    values
}

#[test]
fn bitpack_round_trip() {
    let mut rng = StdRng::seed_from_u64(1);
    for width in 1..=31usize {
        let length = 8 * rng.gen_range(1..64);
        let values: Vec<u32> = (0..length).map(|_| rng.gen_range(0..1u32 << width)).collect();

        let mut packer = BitPacker::try_new(width).unwrap();
        packer.put(&values);
        let out = packer.flush();
        assert_eq!(out.len(), length / 8 * width);
        assert_eq!(unpack_groups32(out, length, width), values, "width {width}");
    }
}

#[test]
fn run_hybrid_constant_size() {
    let mut sizes = vec![];
    for n in [1000usize, 10_000, 1_000_000] {
        let mut encoder = RunHybridEncoder::try_new(6).unwrap();
        encoder.put(&vec![42; n]);
        let out = encoder.flush();
        assert_eq!(decode_hybrid(out, 6), vec![42; n]);
        sizes.push(out.len());
    }
    assert!(sizes.iter().all(|size| *size == 5));
}

#[test]
fn run_hybrid_mixed_stream() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut values = vec![];
    for _ in 0..200 {
        let value = rng.gen_range(0..100u32);
        let run = match rng.gen_range(0..3) {
            0 => 1,
            1 => rng.gen_range(2..9),
            _ => rng.gen_range(9..300),
        };
        values.extend(std::iter::repeat(value).take(run));
    }
    let mut encoder = RunHybridEncoder::try_new(7).unwrap();
    encoder.put(&values);
    let mut decoded = decode_hybrid(encoder.flush(), 7);
    assert!(decoded.len() - values.len() < 8);
    assert!(decoded[values.len()..].iter().all(|v| *v == 0));
    decoded.truncate(values.len());
    assert_eq!(decoded, values);
}

#[test]
fn delta_consecutive_integers() {
    let values: Vec<i32> = (1000..2000).collect();
    let mut encoder = DeltaBlockEncoder::try_new(LogicalType::Int32).unwrap();
    encoder.put(values.as_slice());
    let out = encoder.flush();
    assert!(out.len() < 200);
    assert!(out.len() < values.len() * 4 / 10);
}

#[test]
fn dictionary_compactness() {
    let values = [0i64, 100, 0, 100, 200, 0, 100];
    let mut encoder = DictionaryEncoder::try_new(LogicalType::Int64).unwrap();
    encoder.put(&values);
    let mut out = encoder.flush();
    assert!(out.len() < 56);
    assert_eq!(out.read_u32::<LittleEndian>().unwrap(), 3);
    assert_eq!(out[3 * 8], 2);
}

#[test]
fn adaptive_selection_is_deterministic() {
    let cases: Vec<(Vec<i32>, Choice)> = vec![
        (vec![42; 1000], Choice::RunHybrid { bit_width: 6 }),
        (
            (0..1000).map(|i| i % 8).collect(),
            Choice::BitPacked { bit_width: 3 },
        ),
        ((1 << 28..(1 << 28) + 1000).collect(), Choice::Plain),
        (
            (1_000_000..1_001_000).collect(),
            Choice::BitPacked { bit_width: 20 },
        ),
    ];
    for (values, expected) in cases {
        for _ in 0..2 {
            let mut encoder = AdaptiveEncoder::try_new(LogicalType::Int32).unwrap();
            encoder.put(values.as_slice());
            encoder.flush();
            assert_eq!(encoder.choice(), Some(expected));
        }
    }
}

#[test]
fn adaptive_rle_stream_decodes() {
    let mut values = vec![3i32; 50];
    values.extend([1, 2, 1, 2]);
    values.extend(vec![0; 30]);
    let mut encoder = AdaptiveEncoder::try_new(LogicalType::Int32).unwrap();
    encoder.put(values.as_slice());
    let out = encoder.flush().to_vec();
    assert_eq!(encoder.choice(), Some(Choice::RunHybrid { bit_width: 2 }));

    let decoded = decode_hybrid(&out, 2);
    let expected: Vec<u32> = values.iter().map(|v| *v as u32).collect();
    assert_eq!(&decoded[..expected.len()], expected.as_slice());
}

fn assert_idempotent<T: Copy, E: Encoder<T>>(mut encoder: E, values: &[T]) {
    encoder.put(values);
    let first = encoder.flush().to_vec();
    assert_eq!(encoder.flush(), first.as_slice());
    encoder.clear();
    encoder.put(values);
    assert_eq!(encoder.flush(), first.as_slice());
}

#[test]
fn idempotent_flush() {
    let ints: Vec<i32> = (0..777).map(|i| (i * 7919) % 113).collect();
    let unsigned: Vec<u32> = ints.iter().map(|v| *v as u32).collect();
    let longs: Vec<i64> = ints.iter().map(|v| *v as i64).collect();

    assert_idempotent(PlainEncoder::<i32>::new(), &ints);
    assert_idempotent(BitPacker::try_new(7).unwrap(), &unsigned);
    assert_idempotent(RunHybridEncoder::try_new(7).unwrap(), &unsigned);
    assert_idempotent(DeltaBlockEncoder::try_new(LogicalType::Int64).unwrap(), &longs);
    assert_idempotent(DictionaryEncoder::try_new(LogicalType::Int64).unwrap(), &longs);
    assert_idempotent(AdaptiveEncoder::try_new(LogicalType::Int32).unwrap(), &ints);
}
