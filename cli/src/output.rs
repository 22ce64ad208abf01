//! Output formatting

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Tabled)]
struct Row {
    field: String,
    value: String,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Table => {
                let value = serde_json::to_value(data).unwrap_or(Value::Null);
                println!("{}", Table::new(rows(&value)).with(Style::rounded()));
            }
        }
    }
}

/// One `field | value` row per top-level key
fn rows(value: &Value) -> Vec<Row> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Row { field: k.clone(), value: cell(v) })
            .collect(),
        other => vec![Row { field: "value".into(), value: cell(other) }],
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
