use std::fmt;
use std::sync::Arc;

use crate::field::Alignment;

/// Predicate consulted once per input line, before any field is decoded.
/// Returning `true` skips the line entirely.
pub type LineFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Codec-wide defaults and failure policy shared by decoder and encoder.
///
/// Field-level overrides on [`FieldSpec`](crate::FieldSpec) win over the
/// defaults recorded here. The three `fail_on_*` switches choose between
/// fail-fast errors and a documented recovery: clamping short lines,
/// truncating oversized values, or leaving unconvertible fields unset.
#[derive(Clone)]
pub struct CodecOptions {
    /// Alignment applied when a field does not override it.
    pub default_alignment: Alignment,
    /// Pad character applied when a field does not override it; skip gaps
    /// are always filled with this character on encode.
    pub default_pad: char,
    /// Whether decoded values are trimmed of their pad character.
    pub trim_fields: bool,
    /// Fail decoding when a converter rejects a field, instead of leaving
    /// the value unset.
    pub fail_on_data_error: bool,
    /// Fail decoding when a line is too short for the layout, instead of
    /// clamping fields to the columns that exist.
    pub fail_on_out_of_range: bool,
    /// Fail encoding when a value exceeds its field length, instead of
    /// truncating it.
    pub fail_on_overflow: bool,
    /// Optional line-admission predicate; `true` skips the line.
    pub line_filter: Option<LineFilter>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            default_alignment: Alignment::Left,
            default_pad: ' ',
            trim_fields: true,
            fail_on_data_error: true,
            fail_on_out_of_range: true,
            fail_on_overflow: true,
            line_filter: None,
        }
    }
}

impl CodecOptions {
    /// Install a line-admission predicate. Lines the predicate reports
    /// `true` for are skipped before any field is processed.
    pub fn with_line_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.line_filter = Some(Arc::new(filter));
        self
    }

    /// Whether a line passes the filter and should be decoded.
    pub fn admits(&self, line: &str) -> bool {
        match &self.line_filter {
            Some(filter) => !filter(line),
            None => true,
        }
    }
}

impl fmt::Debug for CodecOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecOptions")
            .field("default_alignment", &self.default_alignment)
            .field("default_pad", &self.default_pad)
            .field("trim_fields", &self.trim_fields)
            .field("fail_on_data_error", &self.fail_on_data_error)
            .field("fail_on_out_of_range", &self.fail_on_out_of_range)
            .field("fail_on_overflow", &self.fail_on_overflow)
            .field("line_filter", &self.line_filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict_left_space_trim() {
        let options = CodecOptions::default();
        assert_eq!(options.default_alignment, Alignment::Left);
        assert_eq!(options.default_pad, ' ');
        assert!(options.trim_fields);
        assert!(options.fail_on_data_error);
        assert!(options.fail_on_out_of_range);
        assert!(options.fail_on_overflow);
        assert!(options.line_filter.is_none());
    }

    #[test]
    fn test_filter_inverts_into_admission() {
        let options = CodecOptions::default().with_line_filter(|line| line.starts_with('#'));
        assert!(options.admits("data line"));
        assert!(!options.admits("# comment"));
        assert!(CodecOptions::default().admits("# comment"));
    }
}
