// Primitives for reading JSON survey exports.

use std::collections::BTreeMap;
use std::fs;

use crate::survey::{io_common::json_to_value, *};

/// Reads a survey table from a JSON file. Two layouts are accepted:
/// - a list of records: `[{"column": value, ...}, ...]`
/// - an object of columns, as written by pandas: `{"column": {"0": value, ...}, ...}`
pub fn read_json(path: &str) -> SurveyResult<SurveyTable> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    let table = table_from_json(&js, path)?;
    info!(
        "read_json: {} responses and {} columns from {}",
        table.num_responses(),
        table.columns().len(),
        path
    );
    Ok(table)
}

pub fn table_from_json(js: &JSValue, path: &str) -> SurveyResult<SurveyTable> {
    let mut builder = Builder::new();
    match js {
        JSValue::Array(records) => {
            for (idx, record) in records.iter().enumerate() {
                let fields = record.as_object().context(JsonShapeSnafu {
                    path,
                    message: format!("record {} is not an object", idx),
                })?;
                builder.add_response(fields.iter().map(|(k, v)| (k.clone(), json_to_value(v))));
            }
        }
        JSValue::Object(columns) => {
            let mut rows: BTreeMap<usize, Vec<(String, SurveyValue)>> = BTreeMap::new();
            for (column, cells) in columns.iter() {
                let cells = cells.as_object().context(JsonShapeSnafu {
                    path,
                    message: format!("column {} is not an object of rows", column),
                })?;
                for (row_key, v) in cells.iter() {
                    let row = row_key.parse::<usize>().ok().context(JsonShapeSnafu {
                        path,
                        message: format!("row index {:?} in column {} is not a number", row_key, column),
                    })?;
                    rows.entry(row)
                        .or_insert_with(Vec::new)
                        .push((column.clone(), json_to_value(v)));
                }
            }
            for (row, fields) in rows {
                debug!("table_from_json: row {}: {} fields", row, fields.len());
                builder.add_response(fields);
            }
        }
        _ => {
            return JsonShapeSnafu {
                path,
                message: "expected a list of records or an object of columns".to_string(),
            }
            .fail();
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records() {
        let js = json!([
            {"project_preference_a": 1, "annual_income": "• < 20.000 €"},
            {"project_preference_a": null, "b_support": -3}
        ]);
        let t = table_from_json(&js, "mem").unwrap();
        assert_eq!(t.columns(), &["project_preference_a", "annual_income", "b_support"]);
        assert_eq!(t.num_responses(), 2);
        assert_eq!(t.get(1, "b_support"), &SurveyValue::Number(-3.0));
        assert!(t.get(1, "annual_income").is_null());
    }

    #[test]
    fn columns() {
        let js = json!({
            "project_preference_a": {"0": 2, "1": 1, "10": 3},
            "project_preference_b": {"0": 1, "1": 2, "10": null}
        });
        let t = table_from_json(&js, "mem").unwrap();
        assert_eq!(t.num_responses(), 3);
        assert_eq!(t.get(2, "project_preference_a"), &SurveyValue::Number(3.0));
        assert!(t.get(2, "project_preference_b").is_null());
        assert_eq!(t.columns(), &["project_preference_a", "project_preference_b"]);
    }

    #[test]
    fn wrong_shape() {
        assert!(matches!(
            table_from_json(&json!(3), "mem"),
            Err(SurveyError::JsonShape { .. })
        ));
        assert!(matches!(
            table_from_json(&json!([1, 2]), "mem"),
            Err(SurveyError::JsonShape { .. })
        ));
        assert!(matches!(
            table_from_json(&json!({"a": {"x": 1}}), "mem"),
            Err(SurveyError::JsonShape { .. })
        ));
    }
}
