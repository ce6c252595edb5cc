//! Layout documents: named, kind-tagged schemas loadable from JSON.
//!
//! A schema is the dynamic counterpart of a [`RecordBinding`](crate::RecordBinding):
//! callers that work from a layout file instead of a Rust type decode rows
//! into [`TypedValue`]s through the registry.

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::convert::{FieldKind, TypedValue};
use crate::error::CodecError;
use crate::field::{FieldSpec, RecordLayout};
use crate::options::CodecOptions;

/// One named column in a schema document. The field shape is flattened, so
/// a column reads as `{"name": "id", "kind": "u32", "length": 6}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(flatten)]
    pub spec: FieldSpec,
}

/// A complete record schema: ordered, named, kind-tagged columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Strip names and kinds down to the positional layout.
    pub fn layout(&self) -> RecordLayout {
        self.columns.iter().map(|c| c.spec).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns a conforming line occupies.
    pub fn total_width(&self) -> usize {
        self.columns.iter().map(|c| c.spec.width()).sum()
    }

    /// Check structural soundness: at least one column, every column named,
    /// no duplicate names. Zero-width columns are legal and not rejected
    /// here.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(anyhow!("schema has no columns"));
        }
        let mut seen: Vec<&str> = Vec::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(anyhow!("schema has a column with an empty name"));
            }
            if seen.contains(&column.name.as_str()) {
                return Err(anyhow!("duplicate column name '{}'", column.name));
            }
            seen.push(column.name.as_str());
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open schema file {}", path.display()))?;
        let reader = BufReader::new(file);
        let schema: Schema = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse schema in {}", path.display()))?;
        Ok(schema)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to write schema file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("failed to serialize schema")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Convert one decoded row into typed values, column by column.
    ///
    /// When data errors are downgraded, a column whose text does not parse
    /// yields `None` (JSON null downstream) and its siblings are unaffected;
    /// otherwise the first rejected column fails the row.
    pub fn typed_row(
        &self,
        values: &[String],
        options: &CodecOptions,
    ) -> Result<Vec<Option<TypedValue>>, CodecError> {
        let mut row = Vec::with_capacity(self.columns.len());
        for (column, text) in self.columns.iter().zip(values) {
            match TypedValue::decode(column.kind, text) {
                Some(value) => row.push(Some(value)),
                None => {
                    if options.fail_on_data_error {
                        return Err(CodecError::DataConversion {
                            label: column.name.clone(),
                            type_name: column.kind.name(),
                            text: text.clone(),
                        });
                    }
                    row.push(None);
                }
            }
        }
        Ok(row)
    }

    /// Render one JSON object into the positional string row the encoder
    /// expects. Missing or null members encode as empty (all-pad) fields.
    pub fn row_from_json(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<String>, CodecError> {
        let mut row = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = match object.get(&column.name) {
                None | Some(serde_json::Value::Null) => String::new(),
                Some(json) => TypedValue::from_json(column.kind, json)
                    .ok_or_else(|| CodecError::DataConversion {
                        label: column.name.clone(),
                        type_name: column.kind.name(),
                        text: json.to_string(),
                    })?
                    .to_field(),
            };
            row.push(value);
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Alignment;
    use tempfile::tempdir;

    fn ledger_schema() -> Schema {
        Schema::new(vec![
            ColumnDef {
                name: "id".to_string(),
                kind: FieldKind::U32,
                spec: FieldSpec::new(6),
            },
            ColumnDef {
                name: "amount".to_string(),
                kind: FieldKind::Decimal,
                spec: FieldSpec::new(10).align(Alignment::Right),
            },
            ColumnDef {
                name: "memo".to_string(),
                kind: FieldKind::Text,
                spec: FieldSpec::new(12),
            },
        ])
    }

    #[test]
    fn test_schema_json_shape_is_flat() {
        let schema = Schema::new(vec![ColumnDef {
            name: "id".to_string(),
            kind: FieldKind::U32,
            spec: FieldSpec::new(6),
        }]);
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"{"columns":[{"name":"id","kind":"u32","length":6}]}"#);
        let parsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);
    }

    #[test]
    fn test_schema_parses_overrides_and_aliases() {
        let raw = r#"{"columns":[
            {"name":"code","kind":"string","length":4,"pad":"0","alignment":"right"},
            {"name":"flag","kind":"bool","length":5,"skip":2,"trim":false}
        ]}"#;
        let schema: Schema = serde_json::from_str(raw).unwrap();
        assert_eq!(schema.columns[0].kind, FieldKind::Text);
        assert_eq!(schema.columns[0].spec.pad_or(' '), '0');
        assert_eq!(schema.columns[1].spec.skip_gap(), 2);
        assert!(!schema.columns[1].spec.trim_or(true));
        assert_eq!(schema.total_width(), 11);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let full = ledger_schema();
        full.save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("}\n"));
        assert_eq!(Schema::load(&path).unwrap(), full);

        // Rewriting with fewer columns must not leave stale bytes behind.
        let trimmed = Schema::new(vec![full.columns[0].clone()]);
        trimmed.save(&path).unwrap();
        assert_eq!(Schema::load(&path).unwrap(), trimmed);
    }

    #[test]
    fn test_validate_rejects_duplicates_and_blanks() {
        assert!(Schema::default().validate().is_err());
        let mut schema = ledger_schema();
        schema.columns[2].name = "id".to_string();
        assert!(schema.validate().is_err());
        schema.columns[2].name = "  ".to_string();
        assert!(schema.validate().is_err());
        assert!(ledger_schema().validate().is_ok());
    }

    #[test]
    fn test_typed_row_downgrades_to_null() {
        let schema = ledger_schema();
        let options = CodecOptions {
            fail_on_data_error: false,
            ..CodecOptions::default()
        };
        let values = vec!["12".to_string(), "oops".to_string(), "memo".to_string()];
        let row = schema.typed_row(&values, &options).unwrap();
        assert_eq!(row[0], Some(TypedValue::U32(12)));
        assert_eq!(row[1], None);
        assert_eq!(row[2], Some(TypedValue::Text("memo".to_string())));

        let err = schema
            .typed_row(&values, &CodecOptions::default())
            .unwrap_err();
        match err {
            CodecError::DataConversion { label, .. } => assert_eq!(label, "amount"),
            other => panic!("expected data conversion error, got {other:?}"),
        }
    }

    #[test]
    fn test_row_from_json_accepts_numbers_and_nulls() {
        let schema = ledger_schema();
        let object = serde_json::json!({
            "id": 7,
            "amount": "150.25",
            "memo": null,
        });
        let row = schema
            .row_from_json(object.as_object().unwrap())
            .unwrap();
        assert_eq!(row, ["7", "150.25", ""]);

        let bad = serde_json::json!({ "id": "seven" });
        let err = schema.row_from_json(bad.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, CodecError::DataConversion { .. }));
    }
}
