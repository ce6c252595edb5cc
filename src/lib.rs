//! Core library for fixed-width text record encoding and decoding.

mod convert;
mod decoder;
mod encoder;
mod error;
mod field;
mod options;
mod record;
mod schema;

pub use convert::{
    Converter, DATE_FORMAT, DATE_TIME_FORMAT, DefaultConverter, FieldKind, FieldValue,
    TIME_FORMAT, TypedValue,
};
pub use decoder::LineDecoder;
pub use encoder::LineEncoder;
pub use error::CodecError;
pub use field::{Alignment, FieldSpec, RecordLayout};
pub use options::{CodecOptions, LineFilter};
pub use record::{RecordBinding, RecordReader, RecordWriter};
pub use schema::{ColumnDef, Schema};

/// Decodes a single line against a layout using default options.
pub fn decode_line(layout: &RecordLayout, line: &str) -> Result<Option<Vec<String>>, CodecError> {
    LineDecoder::new(layout.clone(), CodecOptions::default()).decode(line)
}

/// Encodes a single row of field values against a layout using default options.
pub fn encode_line<S: AsRef<str>>(
    layout: &RecordLayout,
    values: &[S],
) -> Result<String, CodecError> {
    LineEncoder::new(layout.clone(), CodecOptions::default()).encode(values)
}
