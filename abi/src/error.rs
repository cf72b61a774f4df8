use thiserror::Error;

/// Errors raised while loading or writing a whole ABI document.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("the ABI document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the ABI document could not be encoded or decoded: {0}")]
    Codec(#[from] CodecError),
}

/// Outcomes of [`flatten_struct`](crate::flatten::flatten_struct) other than success.
///
/// The resolver treats both variants the same way: the name is not a usable struct.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("struct {0:?} is not defined")]
    NotFound(String),
    #[error("struct {0:?} has a circular base chain")]
    CircularReference(String),
}

/// Errors raised by the value codec while walking a resolved type graph.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of data while reading {0}")]
    EndOfData(&'static str),
    #[error("{0} trailing byte(s) after the value")]
    TrailingData(usize),
    #[error("type {0:?} cannot be encoded or decoded")]
    UnknownType(String),
    #[error("expected {expected} for type {type_name:?}")]
    Mismatch {
        type_name: String,
        expected: &'static str,
    },
    #[error("missing field {field:?} of struct {struct_name:?}")]
    MissingField { struct_name: String, field: String },
    #[error("value {value} is out of range for {type_name}")]
    OutOfRange { type_name: String, value: String },
    #[error("invalid {kind} {text:?}")]
    InvalidText { kind: &'static str, text: String },
    #[error("variant {variant:?} has no alternative {index}")]
    BadVariantIndex { variant: String, index: u32 },
    #[error("variant {variant:?} has no alternative named {alternative:?}")]
    BadVariantName { variant: String, alternative: String },
    #[error("varuint32 is too long")]
    VarintOverflow,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("value is nested more than {0} levels deep")]
    TooDeep(usize),
}
