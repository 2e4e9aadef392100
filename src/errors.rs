use std::fmt::{Display, Formatter};

use crate::schema::LogicalType;

/// Errors raised while constructing codecs, writing columns or compressing chunks.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A codec was constructed for a type it does not implement.
    UnsupportedType {
        codec: &'static str,
        logical_type: LogicalType,
    },
    /// The caller broke a precondition of the write path.
    ContractViolation(String),
    /// A configuration value is outside of its valid range.
    OutOfSpec(String),
    /// Wrapper for an IO error reported by a compression library.
    Io(std::io::Error),
    /// Wrapper for an error triggered by a dependency.
    External(String, Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unsupported(codec: &'static str, logical_type: LogicalType) -> Self {
        Self::UnsupportedType {
            codec,
            logical_type,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnsupportedType {
                codec,
                logical_type,
            } => write!(f, "{codec} does not support logical type {logical_type:?}"),
            Error::ContractViolation(desc) => write!(f, "Contract violation: {desc}"),
            Error::OutOfSpec(desc) => write!(f, "Out of spec: {desc}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::External(message, source) => {
                write!(f, "External error: {message}: {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::External(_, e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::External("invalid json".to_owned(), Box::new(error))
    }
}

macro_rules! general_err {
    ($fmt:expr) => (Error::OutOfSpec($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (Error::OutOfSpec(format!($fmt, $($args),*)));
}

macro_rules! contract_err {
    ($fmt:expr) => (Error::ContractViolation($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (Error::ContractViolation(format!($fmt, $($args),*)));
}
