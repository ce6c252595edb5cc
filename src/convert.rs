//! Typed conversion between field text and Rust values.
//!
//! The registry is closed: every built-in type implements [`FieldValue`]
//! exactly once and is named by a [`FieldKind`] tag, so a layout written by
//! one tool decodes the same way everywhere. Per-field overrides are plain
//! [`Converter`] values handed to a binding; nothing is registered at
//! runtime.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical field text format for [`NaiveDate`] values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical field text format for [`NaiveTime`] values.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Canonical field text format for [`NaiveDateTime`] values.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tag naming each built-in field type, as written in layout files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    #[serde(alias = "string", alias = "str")]
    Text,
    Uuid,
    Date,
    Time,
    #[serde(alias = "datetime")]
    DateTime,
    #[serde(alias = "datetime-tz")]
    DateTimeTz,
}

impl FieldKind {
    /// Every kind, in registry order.
    pub const ALL: &'static [FieldKind] = &[
        FieldKind::Bool,
        FieldKind::I8,
        FieldKind::I16,
        FieldKind::I32,
        FieldKind::I64,
        FieldKind::U8,
        FieldKind::U16,
        FieldKind::U32,
        FieldKind::U64,
        FieldKind::F32,
        FieldKind::F64,
        FieldKind::Decimal,
        FieldKind::Char,
        FieldKind::Text,
        FieldKind::Uuid,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::DateTime,
        FieldKind::DateTimeTz,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Decimal => "decimal",
            FieldKind::Char => "char",
            FieldKind::Text => "text",
            FieldKind::Uuid => "uuid",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::DateTime => "date-time",
            FieldKind::DateTimeTz => "date-time-tz",
        }
    }

    /// Resolve a kind from its name, case-insensitively, accepting the
    /// `string`/`str` and `datetime` spellings seen in layout files in the
    /// wild.
    pub fn from_name(name: &str) -> Option<FieldKind> {
        let lname = name.to_ascii_lowercase();
        match lname.as_str() {
            "bool" => Some(FieldKind::Bool),
            "i8" => Some(FieldKind::I8),
            "i16" => Some(FieldKind::I16),
            "i32" => Some(FieldKind::I32),
            "i64" => Some(FieldKind::I64),
            "u8" => Some(FieldKind::U8),
            "u16" => Some(FieldKind::U16),
            "u32" => Some(FieldKind::U32),
            "u64" => Some(FieldKind::U64),
            "f32" => Some(FieldKind::F32),
            "f64" => Some(FieldKind::F64),
            "decimal" => Some(FieldKind::Decimal),
            "char" => Some(FieldKind::Char),
            "text" | "string" | "str" => Some(FieldKind::Text),
            "uuid" => Some(FieldKind::Uuid),
            "date" => Some(FieldKind::Date),
            "time" => Some(FieldKind::Time),
            "date-time" | "datetime" => Some(FieldKind::DateTime),
            "date-time-tz" | "datetime-tz" => Some(FieldKind::DateTimeTz),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust type with a built-in fixed-width text representation.
///
/// The impls below are the converter registry in its entirety; resolution
/// happens in the type system, one impl per [`FieldKind`].
pub trait FieldValue: Sized {
    /// Registry tag for this type.
    const KIND: FieldKind;

    /// Render the value in its canonical field text form. Encoding is total.
    fn to_field(&self) -> String;

    /// Parse field text back into a value; `None` when the text does not
    /// parse as this type.
    fn from_field(text: &str) -> Option<Self>;
}

macro_rules! numeric_field {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: FieldKind = $kind;

                fn to_field(&self) -> String {
                    self.to_string()
                }

                fn from_field(text: &str) -> Option<Self> {
                    // Numeric columns routinely arrive space-padded even
                    // when trimming is disabled.
                    text.trim().parse().ok()
                }
            }
        )*
    };
}

numeric_field! {
    i8 => FieldKind::I8,
    i16 => FieldKind::I16,
    i32 => FieldKind::I32,
    i64 => FieldKind::I64,
    u8 => FieldKind::U8,
    u16 => FieldKind::U16,
    u32 => FieldKind::U32,
    u64 => FieldKind::U64,
    f32 => FieldKind::F32,
    f64 => FieldKind::F64,
    Decimal => FieldKind::Decimal,
}

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_field(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }

    fn from_field(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FieldValue for char {
    const KIND: FieldKind = FieldKind::Char;

    fn to_field(&self) -> String {
        self.to_string()
    }

    fn from_field(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_field(&self) -> String {
        self.clone()
    }

    fn from_field(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl FieldValue for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn to_field(&self) -> String {
        self.hyphenated().to_string()
    }

    fn from_field(text: &str) -> Option<Self> {
        Uuid::parse_str(text.trim()).ok()
    }
}

impl FieldValue for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;

    fn to_field(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn from_field(text: &str) -> Option<Self> {
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
    }
}

impl FieldValue for NaiveTime {
    const KIND: FieldKind = FieldKind::Time;

    fn to_field(&self) -> String {
        self.format(TIME_FORMAT).to_string()
    }

    fn from_field(text: &str) -> Option<Self> {
        NaiveTime::parse_from_str(text.trim(), TIME_FORMAT).ok()
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_field(&self) -> String {
        self.format(DATE_TIME_FORMAT).to_string()
    }

    fn from_field(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text.trim(), DATE_TIME_FORMAT).ok()
    }
}

impl FieldValue for DateTime<FixedOffset> {
    const KIND: FieldKind = FieldKind::DateTimeTz;

    fn to_field(&self) -> String {
        self.to_rfc3339()
    }

    fn from_field(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text.trim()).ok()
    }
}

/// Conversion strategy between one value type and its field text.
///
/// A converter handed to a binding overrides the registry for that field
/// alone. Converters are stateless from the codec's point of view; the same
/// converter may serve any number of fields and threads.
pub trait Converter<V> {
    /// Render a value; encoding is total.
    fn encode(&self, value: &V) -> String;

    /// Parse field text back into a value.
    fn decode(&self, text: &str) -> Option<V>;
}

/// Registry-backed converter for any [`FieldValue`] type.
pub struct DefaultConverter<V> {
    _marker: std::marker::PhantomData<V>,
}

impl<V> DefaultConverter<V> {
    pub fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<V> Default for DefaultConverter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: FieldValue> Converter<V> for DefaultConverter<V> {
    fn encode(&self, value: &V) -> String {
        value.to_field()
    }

    fn decode(&self, text: &str) -> Option<V> {
        V::from_field(text)
    }
}

/// Runtime-tagged value for layout-driven decoding, one variant per
/// [`FieldKind`].
///
/// Serialization is untagged, so a decoded row renders as natural JSON:
/// booleans and numbers as themselves, everything else in its canonical
/// field text form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Char(char),
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(#[serde(serialize_with = "serialize_date_time")] NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
}

// chrono's serde form uses a 'T' separator; field text uses a space.
fn serialize_date_time<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&value.format(DATE_TIME_FORMAT))
}

macro_rules! typed_dispatch {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        impl TypedValue {
            /// Registry tag this value belongs to.
            pub fn kind(&self) -> FieldKind {
                match self {
                    $(TypedValue::$variant(_) => FieldKind::$variant,)*
                }
            }

            /// Render the value in its canonical field text form.
            pub fn to_field(&self) -> String {
                match self {
                    $(TypedValue::$variant(value) => value.to_field(),)*
                }
            }

            /// Decode field text under the given tag; `None` when the text
            /// does not parse as that kind.
            pub fn decode(kind: FieldKind, text: &str) -> Option<TypedValue> {
                match kind {
                    $(FieldKind::$variant => {
                        <$ty>::from_field(text).map(TypedValue::$variant)
                    })*
                }
            }
        }
    };
}

typed_dispatch! {
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
    Decimal => Decimal,
    Char => char,
    Text => String,
    Uuid => Uuid,
    Date => NaiveDate,
    Time => NaiveTime,
    DateTime => NaiveDateTime,
    DateTimeTz => DateTime<FixedOffset>,
}

impl TypedValue {
    /// Interpret a JSON value under the given tag, accepting the natural
    /// JSON form for the kind as well as field text.
    pub fn from_json(kind: FieldKind, value: &serde_json::Value) -> Option<TypedValue> {
        use serde_json::Value;
        match value {
            Value::String(text) => TypedValue::decode(kind, text),
            Value::Bool(flag) if kind == FieldKind::Bool => Some(TypedValue::Bool(*flag)),
            Value::Number(number) => TypedValue::decode(kind, &number.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde_form() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            assert_eq!(FieldKind::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn test_kind_aliases_resolve() {
        assert_eq!(FieldKind::from_name("string"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("str"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("datetime"), Some(FieldKind::DateTime));
        assert_eq!(FieldKind::from_name("DATE"), Some(FieldKind::Date));
        assert_eq!(FieldKind::from_name("varchar"), None);
        let parsed: FieldKind = serde_json::from_str("\"string\"").unwrap();
        assert_eq!(parsed, FieldKind::Text);
    }

    #[test]
    fn test_numeric_decode_tolerates_padding() {
        assert_eq!(i32::from_field("  -42 "), Some(-42));
        assert_eq!(u64::from_field("18000000000000000000"), Some(18_000_000_000_000_000_000));
        assert_eq!(f64::from_field(" 2.5"), Some(2.5));
        assert_eq!(i32::from_field("4 2"), None);
        assert_eq!(u8::from_field("300"), None);
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        assert_eq!(bool::from_field("TRUE "), Some(true));
        assert_eq!(bool::from_field("False"), Some(false));
        assert_eq!(bool::from_field("1"), None);
        assert_eq!(true.to_field(), "true");
    }

    #[test]
    fn test_char_requires_exactly_one_character() {
        assert_eq!(char::from_field("x"), Some('x'));
        assert_eq!(char::from_field("xy"), None);
        assert_eq!(char::from_field(""), None);
    }

    #[test]
    fn test_temporal_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(date.to_field(), "2024-02-29");
        assert_eq!(NaiveDate::from_field("2024-02-29"), Some(date));

        let time = NaiveTime::from_hms_opt(17, 30, 5).unwrap();
        assert_eq!(time.to_field(), "17:30:05");
        assert_eq!(NaiveTime::from_field(" 17:30:05 "), Some(time));

        let stamp = date.and_hms_opt(17, 30, 5).unwrap();
        assert_eq!(stamp.to_field(), "2024-02-29 17:30:05");
        assert_eq!(NaiveDateTime::from_field("2024-02-29 17:30:05"), Some(stamp));
        assert_eq!(NaiveDateTime::from_field("2024-02-29T17:30:05"), None);

        let zoned = DateTime::parse_from_rfc3339("2024-02-29T17:30:05+02:00").unwrap();
        assert_eq!(zoned.to_field(), "2024-02-29T17:30:05+02:00");
        assert_eq!(DateTime::<FixedOffset>::from_field(&zoned.to_field()), Some(zoned));
    }

    #[test]
    fn test_uuid_accepts_any_case() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(id.to_field(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(Uuid::from_field("67E55044-10B1-426F-9247-BB680E5FE0C8"), Some(id));
    }

    #[test]
    fn test_typed_decode_dispatches_on_kind() {
        assert_eq!(TypedValue::decode(FieldKind::I32, "7"), Some(TypedValue::I32(7)));
        assert_eq!(
            TypedValue::decode(FieldKind::Text, "7"),
            Some(TypedValue::Text("7".to_string()))
        );
        assert_eq!(TypedValue::decode(FieldKind::Date, "7"), None);
        assert_eq!(TypedValue::decode(FieldKind::I32, "7").map(|v| v.kind()), Some(FieldKind::I32));
    }

    #[test]
    fn test_typed_value_serializes_naturally() {
        let row = vec![
            TypedValue::Bool(true),
            TypedValue::I32(-7),
            TypedValue::Text("x".to_string()),
            TypedValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 2, 29)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap(),
            ),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[true,-7,"x","2024-02-29 08:00:00"]"#);
    }

    #[test]
    fn test_from_json_accepts_natural_forms() {
        use serde_json::json;
        assert_eq!(
            TypedValue::from_json(FieldKind::Bool, &json!(true)),
            Some(TypedValue::Bool(true))
        );
        assert_eq!(
            TypedValue::from_json(FieldKind::U16, &json!(42)),
            Some(TypedValue::U16(42))
        );
        assert_eq!(
            TypedValue::from_json(FieldKind::Decimal, &json!("1234.56")),
            Some(TypedValue::Decimal(Decimal::new(123_456, 2)))
        );
        assert_eq!(TypedValue::from_json(FieldKind::Bool, &json!("yes")), None);
        assert_eq!(TypedValue::from_json(FieldKind::I8, &json!([1])), None);
    }
}
