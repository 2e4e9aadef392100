use arrow::array::{Array, PrimitiveArray};
use arrow::types::{NativeType, PrimitiveType};
use bytes::Bytes;

use crate::bloom::BloomFilter;
use crate::encodings::{AdaptiveEncoder, Encoding};
use crate::errors::{Error, Result};
use crate::schema::{ColumnSpec, Schema};
use crate::{BloomFilterMeta, ColumnChunk, ColumnChunkMeta, Compression, CompressOutcome};

use super::WriteOptions;

struct ColumnWriter {
    spec: ColumnSpec,
    encoder: AdaptiveEncoder,
    bloom_filter: Option<BloomFilter>,
}

impl ColumnWriter {
    fn try_new(spec: &ColumnSpec, options: &WriteOptions) -> Result<Self> {
        let encoder = AdaptiveEncoder::try_new(spec.logical_type)?;
        let bloom_filter = options
            .bloom_filter
            .map(|o| BloomFilter::with_seed(o.expected_items, o.fpp, o.seed))
            .transpose()?;
        Ok(Self {
            spec: spec.clone(),
            encoder,
            bloom_filter,
        })
    }

    fn check_type<T: NativeType>(&self) -> Result<()> {
        if self.spec.logical_type.accepts::<T>() {
            Ok(())
        } else {
            Err(contract_err!(
                "column {} of type {:?} cannot store values of type {:?}",
                self.spec.name,
                self.spec.logical_type,
                T::PRIMITIVE
            ))
        }
    }

    fn insert_bloom<T: NativeType>(&mut self, values: impl Iterator<Item = T>) {
        if let Some(filter) = self.bloom_filter.as_mut() {
            for value in values {
                match T::PRIMITIVE {
                    PrimitiveType::Int32 => {
                        filter.insert_i64(bytemuck::cast::<T, i32>(value) as i64)
                    }
                    PrimitiveType::Int64 => filter.insert_i64(bytemuck::cast::<T, i64>(value)),
                    _ => filter.insert_bytes(value.to_le_bytes().as_ref()),
                }
            }
        }
    }

    /// Builds the chunk from the buffered values without consuming them.
    fn encode(&mut self, compression: Compression, scratch: &mut Vec<u8>) -> Result<ColumnChunk> {
        let num_values = self.encoder.num_values();

        scratch.clear();
        let encoded = self.encoder.flush();
        let uncompressed_length = encoded.len();
        let (compression, data) = match compression.compress(encoded, scratch)? {
            CompressOutcome::Compressed(_) => (compression, Bytes::copy_from_slice(scratch)),
            outcome => {
                if !compression.is_none() {
                    log::debug!(
                        "{:?} compression of column {} was {:?}, storing raw bytes",
                        compression,
                        self.spec.name,
                        outcome
                    );
                }
                (Compression::None, Bytes::copy_from_slice(encoded))
            }
        };

        let choice = self.encoder.choice();
        let bloom_filter = self.bloom_filter.as_ref().map(|filter| {
            let meta = BloomFilterMeta {
                num_bits: filter.num_bits() as u64,
                num_hashes: filter.num_hashes() as u32,
                seed: filter.seed(),
            };
            (meta, Bytes::copy_from_slice(filter.serialize()))
        });

        let meta = ColumnChunkMeta {
            name: self.spec.name.clone(),
            logical_type: self.spec.logical_type,
            encoding: choice.map(|c| c.encoding()).unwrap_or(Encoding::Plain),
            bit_width: choice.and_then(|c| c.bit_width()).map(|w| w as u8),
            compression,
            num_values: num_values as u64,
            uncompressed_length: uncompressed_length as u64,
            length: data.len() as u64,
            bloom_filter: bloom_filter.as_ref().map(|(meta, _)| *meta),
        };
        log::info!(
            "column {} wrote {} values as {:?} with {:?}: {} -> {} bytes",
            meta.name,
            meta.num_values,
            meta.encoding,
            meta.compression,
            meta.uncompressed_length,
            meta.length
        );

        Ok(ColumnChunk {
            meta,
            data,
            bloom_filter: bloom_filter.map(|(_, bytes)| bytes),
        })
    }

    fn reset(&mut self) {
        self.encoder.clear();
        if let Some(filter) = self.bloom_filter.as_mut() {
            filter.clear();
        }
    }
}

/// Encodes the columns of one row group at a time.
///
/// Values are written per column, in row order within a column and with
/// columns in any order. [`ChunkWriter::finish`] emits one [`ColumnChunk`]
/// per column and resets the writer for the next row group.
pub struct ChunkWriter {
    schema: Schema,
    options: WriteOptions,
    columns: Vec<ColumnWriter>,
    scratch: Vec<u8>,
}

impl ChunkWriter {
    pub fn try_new(schema: Schema, options: WriteOptions) -> Result<Self> {
        let columns = schema
            .columns()
            .iter()
            .map(|spec| ColumnWriter::try_new(spec, &options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            schema,
            options,
            columns,
            scratch: vec![],
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    fn column_mut(&mut self, index: usize) -> Result<&mut ColumnWriter> {
        let num_columns = self.columns.len();
        self.columns.get_mut(index).ok_or_else(|| {
            contract_err!(
                "column index {} out of range for a schema of {} columns",
                index,
                num_columns
            )
        })
    }

    /// Appends `values` to column `index`.
    pub fn write_column<T: NativeType>(&mut self, index: usize, values: &[T]) -> Result<()> {
        let column = self.column_mut(index)?;
        column.check_type::<T>()?;
        column.encoder.put(values);
        column.insert_bloom(values.iter().copied());
        Ok(())
    }

    /// Appends the values of `array` to column `index`.
    ///
    /// Null slots are encoded as whatever placeholder the array stores for them
    /// and are not added to the Bloom filter.
    pub fn write_array<T: NativeType>(
        &mut self,
        index: usize,
        array: &PrimitiveArray<T>,
    ) -> Result<()> {
        let column = self.column_mut(index)?;
        column.check_type::<T>()?;
        if array.null_count() > 0 && !column.spec.nullable {
            return Err(contract_err!(
                "column {} is not nullable but the array has {} nulls",
                column.spec.name,
                array.null_count()
            ));
        }
        column.encoder.put(array.values().as_slice());
        column.insert_bloom(array.iter().flatten().copied());
        Ok(())
    }

    /// Flushes every column and resets the writer for the next row group.
    ///
    /// The writer is only reset once every column has been encoded, so on
    /// error all buffered values are still in place.
    pub fn finish(&mut self) -> Result<Vec<ColumnChunk>> {
        let compression = self.options.compression;
        let scratch = &mut self.scratch;
        let chunks = self
            .columns
            .iter_mut()
            .map(|column| column.encode(compression, scratch))
            .collect::<Result<Vec<_>>>()?;
        self.columns.iter_mut().for_each(ColumnWriter::reset);
        Ok(chunks)
    }
}
