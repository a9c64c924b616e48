//! Rendering of rows and schemas as tables or JSON.

use nu_ansi_term::Color::{Blue, Cyan, Green};
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};
use sqlking_db::{rusqlite::types::Value, ColumnDef, ResultRow, TableSchema};
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};

use crate::utils::{term_width, Colored};

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".into(),
        Value::Integer(int) => int.to_string(),
        Value::Real(real) => real.to_string(),
        Value::Text(text) => text.clone(),
        Value::Blob(blob) => format!("<{} bytes>", blob.len()),
    }
}

pub fn json_value(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(int) => JsonValue::from(*int),
        Value::Real(real) => Number::from_f64(*real)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(text) => JsonValue::String(text.clone()),
        Value::Blob(blob) => JsonValue::String(blob.iter().map(|b| format!("{b:02x}")).collect()),
    }
}

pub fn row_json(row: &ResultRow) -> JsonValue {
    let object: Map<String, JsonValue> = row
        .iter()
        .map(|(column, value)| (column.to_string(), json_value(value)))
        .collect();
    JsonValue::Object(object)
}

pub fn rows_table(title: &str, rows: &[ResultRow]) -> String {
    let mut builder = Builder::new();

    if let Some(first) = rows.first() {
        builder.push_record(
            first
                .columns()
                .iter()
                .map(|c| Colored(Cyan, c).to_string()),
        );
    }
    for row in rows {
        builder.push_record(row.values().iter().map(display_value));
    }

    builder
        .build()
        .with(Panel::header(title))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string()
}

#[derive(Serialize)]
pub struct ColumnInfo<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub primary_key: bool,
}

impl<'a> From<&'a ColumnDef> for ColumnInfo<'a> {
    fn from(column: &'a ColumnDef) -> Self {
        Self {
            name: &column.name,
            kind: column.kind.sql_name(),
            primary_key: column.primary_key,
        }
    }
}

pub fn schema_table(schema: &TableSchema) -> String {
    let mut builder = Builder::new();
    builder.push_record(["Column", "Type", "Primary Key"]);

    for column in &schema.columns {
        let info = ColumnInfo::from(column);
        let primary = if info.primary_key {
            Colored(Green, "yes").to_string()
        } else {
            String::new()
        };
        builder.push_record([
            Colored(Blue, info.name).to_string(),
            info.kind.to_string(),
            primary,
        ]);
    }

    builder
        .build()
        .with(Panel::header(schema.table.as_str()))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string()
}
