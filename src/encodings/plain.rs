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

use std::marker::PhantomData;

use arrow::types::NativeType;

use crate::errors::{Error, Result};
use crate::schema::LogicalType;

use super::Encoder;

/// Byte-identity encoding: values are appended as their little-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct PlainEncoder<T: NativeType> {
    buffer: Vec<u8>,
    _phantom: PhantomData<T>,
}

impl<T: NativeType> PlainEncoder<T> {
    pub fn new() -> Self {
        Self {
            buffer: vec![],
            _phantom: PhantomData,
        }
    }

    /// Creates an encoder for a column of `logical_type`, which must store values as `T`.
    pub fn try_new(logical_type: LogicalType) -> Result<Self> {
        if logical_type.accepts::<T>() {
            Ok(Self::new())
        } else {
            Err(Error::unsupported("PlainEncoder", logical_type))
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len() / std::mem::size_of::<T>()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<T: NativeType> Encoder<T> for PlainEncoder<T> {
    fn put(&mut self, values: &[T]) {
        self.buffer.reserve(std::mem::size_of_val(values));
        for value in values {
            self.buffer.extend_from_slice(value.to_le_bytes().as_ref());
        }
    }

    fn flush(&mut self) -> &[u8] {
        &self.buffer
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}
