//! Output formatting

use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Print `data` as JSON or YAML; `Auto` and `Table` fall back to JSON
pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let json_value = serde_json::to_value(data)?;

    match format {
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Json | OutputFormat::Auto | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
    }

    Ok(())
}

/// Render rows under a header as a table
pub fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Render a flat JSON object as a two-column table
pub fn render_key_values(value: &Value) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    if let Value::Object(obj) = value {
        for (key, val) in obj {
            table.add_row(vec![key.clone(), format_value(val)]);
        }
    }
    table.to_string()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(obj) => obj
            .iter()
            .map(|(k, v)| format!("{}={}", k, format_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_table_contains_cells() {
        let table = render_table(
            &["ID", "State"],
            vec![vec!["cluster-1".to_string(), "READY".to_string()]],
        );
        assert!(table.contains("ID"));
        assert!(table.contains("cluster-1"));
        assert!(table.contains("READY"));
    }

    #[test]
    fn test_key_values_flatten_nested() {
        let table = render_key_values(&json!({
            "id": "cluster-1",
            "extendedProperties": { "dns": "10.0.0.2" },
            "tags": ["a", "b"],
            "workerCount": 3
        }));
        assert!(table.contains("dns=10.0.0.2"));
        assert!(table.contains("a, b"));
        assert!(table.contains("3"));
    }
}
