use thiserror::Error;

/// Failures raised while decoding or encoding fixed-width records.
///
/// The out-of-range, overflow, and data-conversion cases can each be
/// downgraded to a recovery behavior through the matching
/// [`CodecOptions`](crate::CodecOptions) switch; unsupported-type failures
/// are always fatal once a decode is attempted.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A field span extends past the end of the line being decoded.
    #[error("field at columns {start}..{end} lies past the end of the line ({line_len} columns)")]
    OutOfRange {
        start: usize,
        end: usize,
        line_len: usize,
    },
    /// A value needs more columns than its field provides.
    #[error("value '{value}' does not fit a {length}-column field")]
    Overflow { value: String, length: usize },
    /// A decode was attempted for a type with no converter.
    #[error("no converter can decode type {type_name}")]
    UnsupportedType { type_name: &'static str },
    /// A converter rejected the text extracted for a field.
    #[error("cannot convert '{text}' to {type_name} for field '{label}'")]
    DataConversion {
        label: String,
        type_name: &'static str,
        text: String,
    },
    /// Failure in the underlying reader or writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
