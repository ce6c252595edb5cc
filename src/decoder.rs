//! Line decoding: fixed-width text into ordered field values.

use crate::error::CodecError;
use crate::field::{FieldSpec, RecordLayout};
use crate::options::CodecOptions;

/// Decodes fixed-width lines into per-field strings according to a layout.
///
/// Columns are counted in characters, not bytes, so multi-byte input splits
/// at the same positions a terminal would show. Given the same layout and
/// options, decoding is a pure function of the line.
#[derive(Debug, Clone)]
pub struct LineDecoder {
    layout: RecordLayout,
    options: CodecOptions,
}

impl LineDecoder {
    pub fn new(layout: RecordLayout, options: CodecOptions) -> Self {
        Self { layout, options }
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decode one line into freshly allocated field values.
    ///
    /// Returns `Ok(None)` when the line filter skips the line.
    pub fn decode(&self, line: &str) -> Result<Option<Vec<String>>, CodecError> {
        let mut values = Vec::with_capacity(self.layout.len());
        if self.decode_into(line, &mut values)? {
            Ok(Some(values))
        } else {
            Ok(None)
        }
    }

    /// Decode one line into a reused output vector, clearing it first.
    ///
    /// Returns `false` when the line filter skips the line; the vector is
    /// left empty in that case. Reusing one vector across a file avoids
    /// reallocating the row for every line.
    pub fn decode_into(&self, line: &str, values: &mut Vec<String>) -> Result<bool, CodecError> {
        values.clear();
        if !self.options.admits(line) {
            return Ok(false);
        }
        let chars: Vec<char> = line.chars().collect();
        let mut position = 0usize;
        for field in self.layout.iter() {
            position += field.skip_gap();
            values.push(self.extract(&chars, position, field)?);
            position += field.length();
        }
        Ok(true)
    }

    /// Cut one field out of the line, clamping or failing when the line is
    /// too short, then trim the effective pad character from both ends.
    fn extract(
        &self,
        chars: &[char],
        position: usize,
        field: &FieldSpec,
    ) -> Result<String, CodecError> {
        let end = position + field.length();
        let mut span: &[char] = if end <= chars.len() {
            &chars[position..end]
        } else if self.options.fail_on_out_of_range {
            return Err(CodecError::OutOfRange {
                start: position,
                end,
                line_len: chars.len(),
            });
        } else if position <= chars.len() {
            &chars[position..]
        } else {
            &[]
        };
        if field.trim_or(self.options.trim_fields) {
            let pad = field.pad_or(self.options.default_pad);
            let mut start = 0;
            let mut stop = span.len();
            while start < stop && span[start] == pad {
                start += 1;
            }
            while stop > start && span[stop - 1] == pad {
                stop -= 1;
            }
            span = &span[start..stop];
        }
        Ok(span.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Alignment;

    fn plain(lengths: &[usize]) -> RecordLayout {
        lengths.iter().map(|&len| FieldSpec::new(len)).collect()
    }

    #[test]
    fn test_decode_splits_and_trims() {
        let decoder = LineDecoder::new(plain(&[6, 4]), CodecOptions::default());
        let values = decoder.decode("ab    12  ").unwrap().unwrap();
        assert_eq!(values, ["ab", "12"]);
    }

    #[test]
    fn test_trim_strips_only_the_pad_character() {
        let layout: RecordLayout =
            vec![FieldSpec::new(8).pad('~').align(Alignment::Right)].into();
        let decoder = LineDecoder::new(layout, CodecOptions::default());
        let values = decoder.decode("~~~ab cd").unwrap().unwrap();
        assert_eq!(values, ["ab cd"]);
    }

    #[test]
    fn test_trim_disabled_keeps_padding() {
        let options = CodecOptions {
            trim_fields: false,
            ..CodecOptions::default()
        };
        let decoder = LineDecoder::new(plain(&[6]), options);
        let values = decoder.decode("ab    ").unwrap().unwrap();
        assert_eq!(values, ["ab    "]);
    }

    #[test]
    fn test_skip_gap_is_discarded() {
        let layout: RecordLayout = vec![FieldSpec::new(4), FieldSpec::new(4).skip(4)].into();
        let decoder = LineDecoder::new(layout, CodecOptions::default());
        let values = decoder.decode("abcdXXXXefgh").unwrap().unwrap();
        assert_eq!(values, ["abcd", "efgh"]);
    }

    #[test]
    fn test_short_line_is_an_error_by_default() {
        let decoder = LineDecoder::new(plain(&[4, 4]), CodecOptions::default());
        let err = decoder.decode("abc").unwrap_err();
        assert!(matches!(
            err,
            CodecError::OutOfRange {
                start: 0,
                end: 4,
                line_len: 3,
            }
        ));
    }

    #[test]
    fn test_short_line_clamps_when_downgraded() {
        let options = CodecOptions {
            fail_on_out_of_range: false,
            ..CodecOptions::default()
        };
        let decoder = LineDecoder::new(plain(&[4, 4]), options);
        let values = decoder.decode("abc").unwrap().unwrap();
        assert_eq!(values, ["abc", ""]);
    }

    #[test]
    fn test_filtered_line_yields_no_record() {
        let options =
            CodecOptions::default().with_line_filter(|line| line.starts_with('#'));
        let decoder = LineDecoder::new(plain(&[4]), options);
        assert_eq!(decoder.decode("# hi").unwrap(), None);
        let mut values = vec!["stale".to_string()];
        assert!(!decoder.decode_into("# hi", &mut values).unwrap());
        assert!(values.is_empty());
    }

    #[test]
    fn test_columns_are_characters_not_bytes() {
        let decoder = LineDecoder::new(plain(&[4, 4]), CodecOptions::default());
        let values = decoder.decode("caféüber").unwrap().unwrap();
        assert_eq!(values, ["café", "über"]);
    }
}
