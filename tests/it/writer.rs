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

use arrow::array::PrimitiveArray;
use colpack::{
    BloomFilterOptions, ChunkWriter, ColumnChunk, ColumnChunkMeta, Compression, Encoding, Error,
    LogicalType, Schema, WriteOptions,
};

fn schema() -> Schema {
    Schema::from_json(
        r#"{"columns": [
            {"name": "status", "type": "INT32", "nullable": false},
            {"name": "user_id", "type": "INT64"},
            {"name": "score", "type": "DOUBLE"},
            {"name": "flag", "type": "BOOLEAN"}
        ]}"#,
    )
    .unwrap()
}

fn decompress(chunk: &ColumnChunk) -> Vec<u8> {
    let mut out = vec![0u8; chunk.meta.uncompressed_length as usize];
    chunk
        .meta
        .compression
        .decompress(&chunk.data, &mut out)
        .unwrap();
    out
}

#[test]
fn write_row_group() {
    let mut writer = ChunkWriter::try_new(schema(), WriteOptions::default()).unwrap();
    let status: Vec<i32> = (0..1000).map(|i| if i < 600 { 200 } else { 404 }).collect();
    let user_ids: Vec<i64> = (0..1000).map(|i| i * 31).collect();
    let scores: Vec<f64> = (0..1000).map(|i| i as f64 / 4.0).collect();

    // columns in any order
    writer.write_column(2, &scores).unwrap();
    writer.write_column(0, &status[..500]).unwrap();
    writer.write_column(1, &user_ids).unwrap();
    writer.write_column(0, &status[500..]).unwrap();

    let chunks = writer.finish().unwrap();
    assert_eq!(chunks.len(), 4);

    let status_meta = &chunks[0].meta;
    assert_eq!(status_meta.name, "status");
    assert_eq!(status_meta.encoding, Encoding::RunHybrid);
    assert_eq!(status_meta.bit_width, Some(9));
    assert_eq!(status_meta.num_values, 1000);
    assert_eq!(status_meta.compression, Compression::None);
    assert_eq!(chunks[0].data.len(), 2 * (4 + 2));

    assert_eq!(chunks[1].meta.encoding, Encoding::Plain);
    assert_eq!(chunks[1].data.as_ref(), bytemuck::cast_slice::<i64, u8>(&user_ids));
    assert_eq!(chunks[2].meta.length, 8000);

    // nothing written
    assert_eq!(chunks[3].meta.num_values, 0);
    assert!(chunks[3].data.is_empty());
    assert!(chunks.iter().all(|c| c.bloom_filter.is_none()));
}

#[test]
fn writer_is_reusable() {
    let mut writer = ChunkWriter::try_new(schema(), WriteOptions::default()).unwrap();
    writer.write_column(0, &[1i32; 100]).unwrap();
    let first = writer.finish().unwrap();
    assert_eq!(first[0].meta.encoding, Encoding::RunHybrid);

    writer.write_column(0, &[-5i32, 7, 9]).unwrap();
    let second = writer.finish().unwrap();
    assert_eq!(second[0].meta.encoding, Encoding::Plain);
    assert_eq!(second[0].meta.num_values, 3);
}

#[test]
fn compression_round_trip() {
    for compression in [Compression::LZ4, Compression::ZSTD, Compression::SNAPPY] {
        let options = WriteOptions {
            compression,
            ..Default::default()
        };
        let mut writer = ChunkWriter::try_new(schema(), options).unwrap();
        let scores: Vec<f64> = (0..4096).map(|i| (i % 10) as f64).collect();
        writer.write_column(2, &scores).unwrap();
        writer.write_column(3, &[1u8, 0, 1]).unwrap();
        let chunks = writer.finish().unwrap();

        let meta = &chunks[2].meta;
        assert_eq!(meta.compression, compression);
        assert!(meta.length < meta.uncompressed_length);
        assert_eq!(
            decompress(&chunks[2]),
            bytemuck::cast_slice::<f64, u8>(&scores)
        );

        // too small to shrink
        assert_eq!(chunks[3].meta.compression, Compression::None);
        assert_eq!(decompress(&chunks[3]), vec![1, 0, 1]);
    }
}

#[test]
fn gpu_compression_falls_back() {
    let options = WriteOptions {
        compression: Compression::Gpu,
        ..Default::default()
    };
    let mut writer = ChunkWriter::try_new(schema(), options).unwrap();
    writer.write_column(1, &[9i64; 64]).unwrap();
    let chunks = writer.finish().unwrap();
    assert_eq!(chunks[1].meta.compression, Compression::None);
    assert_eq!(chunks[1].data.len(), 64 * 8);
}

#[test]
fn bloom_filters() {
    let options = WriteOptions {
        bloom_filter: Some(BloomFilterOptions::new(1000)),
        ..Default::default()
    };
    let mut writer = ChunkWriter::try_new(schema(), options).unwrap();
    let status: Vec<i32> = (0..1000).collect();
    writer.write_column(0, &status).unwrap();
    writer.write_column(2, &[0.5f64, 1.5]).unwrap();
    let chunks = writer.finish().unwrap();

    let filter = chunks[0].bloom().unwrap();
    assert!((0..1000i64).all(|v| filter.find_i64(v)));

    let filter = chunks[2].bloom().unwrap();
    assert!(filter.find_bytes(&0.5f64.to_le_bytes()));

    // filters are reset between row groups
    writer.write_column(0, &[5000i32]).unwrap();
    let chunks = writer.finish().unwrap();
    let filter = chunks[0].bloom().unwrap();
    assert!(filter.find_i64(5000));
    assert_eq!(
        chunks[0].bloom_filter.as_ref().unwrap().iter().map(|b| b.count_ones()).sum::<u32>(),
        filter.num_hashes() as u32
    );
}

#[test]
fn arrays_and_contract_violations() {
    let mut writer = ChunkWriter::try_new(schema(), WriteOptions::default()).unwrap();

    let with_nulls = PrimitiveArray::<i32>::from([Some(1), None, Some(3)]);
    assert!(matches!(
        writer.write_array(0, &with_nulls),
        Err(Error::ContractViolation(_))
    ));
    assert!(matches!(
        writer.write_column(7, &[1i32]),
        Err(Error::ContractViolation(_))
    ));
    assert!(matches!(
        writer.write_column(2, &[1.0f32]),
        Err(Error::ContractViolation(_))
    ));

    let ids = PrimitiveArray::<i64>::from([Some(10), None, Some(30)]);
    writer.write_array(1, &ids).unwrap();
    writer
        .write_array(0, &PrimitiveArray::<i32>::from_vec(vec![4, 5, 6]))
        .unwrap();
    let chunks = writer.finish().unwrap();
    assert_eq!(chunks[0].meta.num_values, 3);
    assert_eq!(chunks[1].meta.num_values, 3);
}

#[test]
fn meta_json() {
    let mut writer = ChunkWriter::try_new(schema(), WriteOptions::default()).unwrap();
    writer.write_column(0, &[1i32, 2, 3, 4]).unwrap();
    let meta = writer.finish().unwrap().remove(0).meta;

    let json = serde_json::to_string(&meta).unwrap();
    let back: ColumnChunkMeta = serde_json::from_str(&json).unwrap();
    assert_eq!(meta, back);
    assert_eq!(back.logical_type, LogicalType::Int32);
    assert_eq!(back.encoding, Encoding::BitPacked);
}
