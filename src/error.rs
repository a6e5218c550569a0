//! Error types for buffer and field codec operations

use thiserror::Error;

/// Error type for buffer and field codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("unable to read record: field \"{0}\" has no type")]
    MissingFieldType(String),
    #[error("unable to write field \"{0}\": {1}")]
    FieldWrite(String, #[source] Box<Error>),
    #[error("no value supplied for field \"{0}\"")]
    MissingValue(String),
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {0} is too large for a variable-length integer")]
    ValueTooLarge(i64),
    #[error("character {0:?} has no code page 437 encoding")]
    UnmappableChar(char),
}
