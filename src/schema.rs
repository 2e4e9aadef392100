use arrow::types::{NativeType, PrimitiveType};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Physical type of a column's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalType {
    /// One byte per value, 0 is false.
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    /// Variable-length bytes. No codec of this crate accepts it.
    ByteArray,
    /// Fixed-length bytes, length given by [`ColumnSpec::fixed_length`].
    /// No codec of this crate accepts it.
    FixedLenByteArray,
}

impl LogicalType {
    /// Width in bytes of one value under the plain encoding.
    pub fn plain_width(&self) -> Option<usize> {
        match self {
            LogicalType::Boolean => Some(1),
            LogicalType::Int32 | LogicalType::Float => Some(4),
            LogicalType::Int64 | LogicalType::Double => Some(8),
            LogicalType::ByteArray | LogicalType::FixedLenByteArray => None,
        }
    }

    /// The in-memory element type writes for this column must use.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            LogicalType::Boolean => Some(PrimitiveType::UInt8),
            LogicalType::Int32 => Some(PrimitiveType::Int32),
            LogicalType::Int64 => Some(PrimitiveType::Int64),
            LogicalType::Float => Some(PrimitiveType::Float32),
            LogicalType::Double => Some(PrimitiveType::Float64),
            LogicalType::ByteArray | LogicalType::FixedLenByteArray => None,
        }
    }

    pub fn accepts<T: NativeType>(&self) -> bool {
        self.primitive() == Some(T::PRIMITIVE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub logical_type: LogicalType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_length: Option<usize>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, logical_type: LogicalType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable,
            fixed_length: None,
        }
    }

    pub fn with_fixed_length(mut self, fixed_length: usize) -> Self {
        self.fixed_length = Some(fixed_length);
        self
    }
}

/// Ordered list of columns. Names are not required to be unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        logical_type: LogicalType,
        nullable: bool,
    ) {
        self.columns
            .push(ColumnSpec::new(name, logical_type, nullable));
    }

    pub fn push(&mut self, column: ColumnSpec) {
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Parses a schema of the form `{"columns": [{"name": "id", "type": "INT64"}]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Vec<ColumnSpec>> for Schema {
    fn from(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }
}
