//! Typed record bridge: explicit field tables tying a Rust struct to a
//! layout, plus line-oriented readers and writers built on them.
//!
//! Every field is declared with its own getter and setter closure, so the
//! compiler checks member and converter types where the binding is built;
//! there is no reflection step left to fail at run time.

use std::fmt::{self, Display};
use std::io::{BufRead, Lines, Write};
use std::sync::Arc;

use crate::convert::{Converter, DefaultConverter, FieldValue};
use crate::decoder::LineDecoder;
use crate::encoder::LineEncoder;
use crate::error::CodecError;
use crate::field::{FieldSpec, RecordLayout};
use crate::options::CodecOptions;

type EncodeFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type DecodeFn<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CodecError> + Send + Sync>;

struct BoundField<T> {
    spec: FieldSpec,
    label: String,
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

/// Ordered mapping between a record type and its field layout.
///
/// Built like a [`FieldSpec`](crate::FieldSpec): each call consumes the
/// binding and returns it with one more field. Getters return owned values;
/// clone cheap members in the closure when the record keeps ownership.
///
/// ```
/// use fixcol::{FieldSpec, RecordBinding};
///
/// #[derive(Default)]
/// struct Account {
///     id: u32,
///     holder: String,
/// }
///
/// let binding = RecordBinding::new()
///     .field("id", FieldSpec::new(6), |a: &Account| a.id, |a, v| a.id = v)
///     .field("holder", FieldSpec::new(20), |a: &Account| a.holder.clone(), |a, v| {
///         a.holder = v;
///     });
/// assert_eq!(binding.layout().total_width(), 26);
/// ```
pub struct RecordBinding<T> {
    fields: Vec<BoundField<T>>,
}

impl<T> RecordBinding<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Bind a field through the built-in converter for `V`.
    pub fn field<V, G, S>(self, label: &str, spec: FieldSpec, get: G, set: S) -> Self
    where
        T: 'static,
        V: FieldValue + Send + Sync + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.field_with(label, spec, DefaultConverter::new(), get, set)
    }

    /// Bind a field through a caller-supplied converter, overriding the
    /// registry for this field alone.
    pub fn field_with<V, C, G, S>(
        mut self,
        label: &str,
        spec: FieldSpec,
        converter: C,
        get: G,
        set: S,
    ) -> Self
    where
        T: 'static,
        V: 'static,
        C: Converter<V> + Send + Sync + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let label = label.to_string();
        let decode_label = label.clone();
        let converter = Arc::new(converter);
        let decode_converter = Arc::clone(&converter);
        let encode: EncodeFn<T> = Box::new(move |record| converter.encode(&get(record)));
        let decode: DecodeFn<T> = Box::new(move |record, text| {
            match decode_converter.decode(text) {
                Some(value) => {
                    set(record, value);
                    Ok(())
                }
                None => Err(CodecError::DataConversion {
                    label: decode_label.clone(),
                    type_name: std::any::type_name::<V>(),
                    text: text.to_string(),
                }),
            }
        });
        self.fields.push(BoundField {
            spec,
            label,
            encode,
            decode,
        });
        self
    }

    /// Bind an encode-only field rendered through `Display`.
    ///
    /// This is the escape hatch for types outside the registry: they can
    /// still be written, but any decode of the field fails with
    /// [`CodecError::UnsupportedType`], and that failure is never downgraded.
    pub fn display_field<V, G>(mut self, label: &str, spec: FieldSpec, get: G) -> Self
    where
        T: 'static,
        V: Display + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let label = label.to_string();
        let encode: EncodeFn<T> = Box::new(move |record| get(record).to_string());
        let decode: DecodeFn<T> = Box::new(move |_record, _text| {
            Err(CodecError::UnsupportedType {
                type_name: std::any::type_name::<V>(),
            })
        });
        self.fields.push(BoundField {
            spec,
            label,
            encode,
            decode,
        });
        self
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field labels in binding order.
    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.label.as_str()).collect()
    }

    /// Assemble the positional layout described by the bound field specs.
    pub fn layout(&self) -> RecordLayout {
        self.fields.iter().map(|f| f.spec).collect()
    }

    /// Render every bound field of `record` into `values`, reusing the
    /// vector's allocation.
    pub fn encode_record(&self, record: &T, values: &mut Vec<String>) {
        values.clear();
        for field in &self.fields {
            values.push((field.encode)(record));
        }
    }

    /// Apply decoded field texts to `record` in binding order.
    ///
    /// When data errors are downgraded, a rejected field leaves the member
    /// as it was and the remaining fields are still applied; unsupported
    /// types fail regardless.
    pub fn decode_record(
        &self,
        values: &[String],
        record: &mut T,
        options: &CodecOptions,
    ) -> Result<(), CodecError> {
        for (field, text) in self.fields.iter().zip(values) {
            match (field.decode)(record, text) {
                Ok(()) => {}
                Err(err @ CodecError::UnsupportedType { .. }) => return Err(err),
                Err(err) => {
                    if options.fail_on_data_error {
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }
}

impl<T> Default for RecordBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RecordBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBinding")
            .field("fields", &self.labels())
            .finish()
    }
}

/// Pulls typed records out of a buffered reader, one line per record.
///
/// There is deliberately no `Iterator` here: `read` is a plain fallible
/// pull call, and the row buffer inside is reused across records.
pub struct RecordReader<R: BufRead, T> {
    lines: Lines<R>,
    decoder: LineDecoder,
    binding: RecordBinding<T>,
    values: Vec<String>,
}

impl<R: BufRead, T: Default> RecordReader<R, T> {
    /// Build a reader over `inner`; the layout comes from the binding.
    pub fn new(inner: R, binding: RecordBinding<T>, options: CodecOptions) -> Self {
        let decoder = LineDecoder::new(binding.layout(), options);
        Self {
            lines: inner.lines(),
            decoder,
            binding,
            values: Vec::new(),
        }
    }

    /// Read the next record; filtered lines are skipped transparently and
    /// `Ok(None)` marks the end of input.
    ///
    /// Each record starts from `T::default()`, so a field rejected under a
    /// downgraded data-error policy keeps its default value.
    pub fn read(&mut self) -> Result<Option<T>, CodecError> {
        while let Some(line) = self.lines.next() {
            let line = line?;
            if !self.decoder.decode_into(&line, &mut self.values)? {
                continue;
            }
            let mut record = T::default();
            self.binding
                .decode_record(&self.values, &mut record, self.decoder.options())?;
            return Ok(Some(record));
        }
        Ok(None)
    }

    pub fn options(&self) -> &CodecOptions {
        self.decoder.options()
    }
}

/// Writes typed records into a writer, one line per record.
pub struct RecordWriter<W: Write, T> {
    inner: W,
    encoder: LineEncoder,
    binding: RecordBinding<T>,
    values: Vec<String>,
    line: String,
}

impl<W: Write, T> RecordWriter<W, T> {
    /// Build a writer over `inner`; the layout comes from the binding.
    pub fn new(inner: W, binding: RecordBinding<T>, options: CodecOptions) -> Self {
        let encoder = LineEncoder::new(binding.layout(), options);
        Self {
            inner,
            encoder,
            binding,
            values: Vec::new(),
            line: String::new(),
        }
    }

    /// Encode one record and write it with a trailing newline.
    pub fn write(&mut self, record: &T) -> Result<(), CodecError> {
        self.binding.encode_record(record, &mut self.values);
        self.encoder.encode_into(&self.values, &mut self.line)?;
        self.inner.write_all(self.line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Alignment;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Entry {
        code: u16,
        label: String,
    }

    fn entry_binding() -> RecordBinding<Entry> {
        RecordBinding::new()
            .field(
                "code",
                FieldSpec::new(4).align(Alignment::Right),
                |e: &Entry| e.code,
                |e, v| e.code = v,
            )
            .field(
                "label",
                FieldSpec::new(8),
                |e: &Entry| e.label.clone(),
                |e, v| e.label = v,
            )
    }

    #[test]
    fn test_binding_assembles_the_layout() {
        let binding = entry_binding();
        assert_eq!(binding.len(), 2);
        assert_eq!(binding.labels(), ["code", "label"]);
        assert_eq!(binding.layout().total_width(), 12);
    }

    #[test]
    fn test_encode_and_decode_one_record() {
        let binding = entry_binding();
        let entry = Entry {
            code: 42,
            label: "ledger".to_string(),
        };
        let mut values = Vec::new();
        binding.encode_record(&entry, &mut values);
        assert_eq!(values, ["42", "ledger"]);

        let mut decoded = Entry::default();
        binding
            .decode_record(&values, &mut decoded, &CodecOptions::default())
            .unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_rejected_field_reports_its_label() {
        let binding = entry_binding();
        let values = vec!["x".to_string(), "ledger".to_string()];
        let mut record = Entry::default();
        let err = binding
            .decode_record(&values, &mut record, &CodecOptions::default())
            .unwrap_err();
        match err {
            CodecError::DataConversion { label, text, .. } => {
                assert_eq!(label, "code");
                assert_eq!(text, "x");
            }
            other => panic!("expected data conversion error, got {other:?}"),
        }
    }

    #[test]
    fn test_downgraded_rejection_keeps_default_and_siblings() {
        let binding = entry_binding();
        let options = CodecOptions {
            fail_on_data_error: false,
            ..CodecOptions::default()
        };
        let values = vec!["x".to_string(), "ledger".to_string()];
        let mut record = Entry::default();
        binding.decode_record(&values, &mut record, &options).unwrap();
        assert_eq!(record.code, 0);
        assert_eq!(record.label, "ledger");
    }
}
