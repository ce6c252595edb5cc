use std::fmt;

use serde::{Deserialize, Serialize};

/// Horizontal placement of a value inside its field span.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Left
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Left => write!(f, "left"),
            Alignment::Right => write!(f, "right"),
        }
    }
}

/// Shape of one fixed-width field: the columns it occupies and how values
/// are padded, aligned, and trimmed within them.
///
/// A spec is immutable once built. Construction starts from
/// [`FieldSpec::new`] and chains the setters, each of which consumes and
/// returns the spec:
///
/// ```
/// use fixcol::{Alignment, FieldSpec};
///
/// let amount = FieldSpec::new(12).align(Alignment::Right).pad('0').skip(2);
/// assert_eq!(amount.width(), 14);
/// ```
///
/// Alignment, pad character, and trim behavior are optional overrides; a
/// field that leaves them unset inherits the codec defaults at decode or
/// encode time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pad: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trim: Option<bool>,
    #[serde(default, skip_serializing_if = "is_zero")]
    skip: usize,
}

impl FieldSpec {
    /// Create a field spanning `length` columns that inherits every codec
    /// default. A zero-length field is legal and decodes to an empty value.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            alignment: None,
            pad: None,
            trim: None,
            skip: 0,
        }
    }

    /// Override the alignment for this field.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Override the pad character for this field.
    pub fn pad(mut self, pad: char) -> Self {
        self.pad = Some(pad);
        self
    }

    /// Override trim behavior for this field.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Discard `skip` columns immediately before this field. On encode the
    /// gap is filled with the codec's default pad character, never with
    /// this field's own pad.
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Columns occupied by the value itself.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Columns discarded before the value.
    pub fn skip_gap(&self) -> usize {
        self.skip
    }

    /// Columns consumed in total, skip gap included.
    pub fn width(&self) -> usize {
        self.skip + self.length
    }

    /// Alignment in effect once the codec default is applied.
    pub fn alignment_or(&self, default: Alignment) -> Alignment {
        self.alignment.unwrap_or(default)
    }

    /// Pad character in effect once the codec default is applied.
    pub fn pad_or(&self, default: char) -> char {
        self.pad.unwrap_or(default)
    }

    /// Trim behavior in effect once the codec default is applied.
    pub fn trim_or(&self, default: bool) -> bool {
        self.trim.unwrap_or(default)
    }
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// Ordered collection of field specs describing one record shape.
///
/// Order is meaning: it defines the column offsets on decode and the value
/// order on encode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordLayout {
    fields: Vec<FieldSpec>,
}

impl RecordLayout {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field at the end of the layout.
    pub fn push(&mut self, field: FieldSpec) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }

    /// Columns a conforming line occupies: the sum of every skip gap and
    /// field length.
    pub fn total_width(&self) -> usize {
        self.fields.iter().map(FieldSpec::width).sum()
    }
}

impl From<Vec<FieldSpec>> for RecordLayout {
    fn from(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }
}

impl FromIterator<FieldSpec> for RecordLayout {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
