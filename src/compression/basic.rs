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

// Every compress_* appends to `output_buf` and returns the number of bytes written.

pub fn compress_lz4(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = lz4::block::compress_bound(input_buf.len())?;
    output_buf.resize(start + bound, 0);
    let size = lz4::block::compress_to_buffer(input_buf, None, false, &mut output_buf[start..])?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn compress_zstd(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = zstd::zstd_safe::compress_bound(input_buf.len());
    output_buf.resize(start + bound, 0);
    let size = zstd::bulk::compress_to_buffer(input_buf, &mut output_buf[start..], 0)?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn compress_snappy(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = snap::raw::max_compress_len(input_buf.len());
    output_buf.resize(start + bound, 0);
    let size = snap::raw::Encoder::new()
        .compress(input_buf, &mut output_buf[start..])
        .map_err(|e| Error::External("compress snappy failed".to_owned(), Box::new(e)))?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn decompress_lz4(input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
    lz4::block::decompress_to_buffer(input_buf, Some(output_buf.len() as i32), output_buf)?;
    Ok(())
}

pub fn decompress_zstd(input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
    zstd::bulk::decompress_to_buffer(input_buf, output_buf)?;
    Ok(())
}

pub fn decompress_snappy(input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
    snap::raw::Decoder::new()
        .decompress(input_buf, output_buf)
        .map_err(|e| Error::External("decompress snappy failed".to_owned(), Box::new(e)))?;
    Ok(())
}
