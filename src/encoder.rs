//! Line encoding: ordered field values into fixed-width text.

use crate::error::CodecError;
use crate::field::{Alignment, FieldSpec, RecordLayout};
use crate::options::CodecOptions;

/// Encodes ordered field values into fixed-width lines according to a layout.
///
/// The output line is always exactly [`RecordLayout::total_width`]
/// characters and carries no line terminator; that stays with the caller.
#[derive(Debug, Clone)]
pub struct LineEncoder {
    layout: RecordLayout,
    options: CodecOptions,
}

impl LineEncoder {
    pub fn new(layout: RecordLayout, options: CodecOptions) -> Self {
        Self { layout, options }
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode one record into a freshly allocated line.
    ///
    /// Values beyond the layout are ignored; missing trailing values encode
    /// as all-pad fields.
    pub fn encode<S: AsRef<str>>(&self, values: &[S]) -> Result<String, CodecError> {
        let mut line = String::with_capacity(self.layout.total_width());
        self.encode_into(values, &mut line)?;
        Ok(line)
    }

    /// Encode one record into a caller-owned buffer.
    ///
    /// The buffer is cleared on entry but its capacity is kept, so a caller
    /// looping over many records pays for one allocation. The buffer belongs
    /// to one encode call at a time; the `&mut` borrow makes that a
    /// compile-time rule.
    pub fn encode_into<S: AsRef<str>>(
        &self,
        values: &[S],
        line: &mut String,
    ) -> Result<(), CodecError> {
        line.clear();
        for (index, field) in self.layout.iter().enumerate() {
            for _ in 0..field.skip_gap() {
                line.push(self.options.default_pad);
            }
            let value = values.get(index).map(|v| v.as_ref()).unwrap_or("");
            self.push_field(value, field, line)?;
        }
        Ok(())
    }

    /// Pad, align, or truncate one value into its field span.
    fn push_field(
        &self,
        value: &str,
        field: &FieldSpec,
        line: &mut String,
    ) -> Result<(), CodecError> {
        let length = field.length();
        let count = value.chars().count();
        if count == length {
            line.push_str(value);
            return Ok(());
        }
        if count > length {
            if self.options.fail_on_overflow {
                return Err(CodecError::Overflow {
                    value: value.to_string(),
                    length,
                });
            }
            line.extend(value.chars().take(length));
            return Ok(());
        }
        let pad = field.pad_or(self.options.default_pad);
        let fill = length - count;
        match field.alignment_or(self.options.default_alignment) {
            Alignment::Left => {
                line.push_str(value);
                for _ in 0..fill {
                    line.push(pad);
                }
            }
            Alignment::Right => {
                for _ in 0..fill {
                    line.push(pad);
                }
                line.push_str(value);
            }
        }
        Ok(())
    }
}
