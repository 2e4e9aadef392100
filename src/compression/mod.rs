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

mod basic;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub use self::basic::*;

/// Byte-level compression applied to an encoded chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Compression {
    #[default]
    None,
    LZ4,
    ZSTD,
    SNAPPY,
    /// Device-side compression. No device backend is compiled in, so every
    /// request reports [`CompressOutcome::Unsupported`].
    Gpu,
}

/// Result of one compression attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressOutcome {
    /// `output` now ends with this many compressed bytes.
    Compressed(usize),
    /// The codec is not available in this build.
    Unsupported,
    /// The compressed form was not smaller than the input; `output` is unchanged.
    NotBeneficial,
}

impl Compression {
    pub fn is_none(&self) -> bool {
        matches!(self, Compression::None)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Compression::Gpu)
    }

    /// Compresses `input` onto the end of `output`.
    pub fn compress(&self, input: &[u8], output: &mut Vec<u8>) -> Result<CompressOutcome> {
        let start = output.len();
        let size = match self {
            Compression::None | Compression::Gpu => return Ok(CompressOutcome::Unsupported),
            Compression::LZ4 => compress_lz4(input, output)?,
            Compression::ZSTD => compress_zstd(input, output)?,
            Compression::SNAPPY => compress_snappy(input, output)?,
        };
        if size >= input.len() {
            output.truncate(start);
            return Ok(CompressOutcome::NotBeneficial);
        }
        Ok(CompressOutcome::Compressed(size))
    }

    /// Decompresses `input` into `out_slice`, which must have the uncompressed length.
    pub fn decompress(&self, input: &[u8], out_slice: &mut [u8]) -> Result<()> {
        match self {
            Compression::LZ4 => decompress_lz4(input, out_slice),
            Compression::ZSTD => decompress_zstd(input, out_slice),
            Compression::SNAPPY => decompress_snappy(input, out_slice),
            Compression::None | Compression::Gpu => {
                if input.len() != out_slice.len() {
                    return Err(general_err!(
                        "expected {} uncompressed bytes, got {}",
                        out_slice.len(),
                        input.len()
                    ));
                }
                out_slice.copy_from_slice(input);
                Ok(())
            }
        }
    }
}
