use std::collections::HashMap;

pub use crate::config::*;

/// A builder for assembling a survey table, one response at a time.
///
/// Columns are registered in the order in which they are first seen. A
/// response that does not mention a column reads as `Null` in that column.
///
/// ```
/// use survey_voting::builder::Builder;
/// use survey_voting::SurveyValue;
///
/// let mut builder = Builder::new();
/// builder.add_response([
///     ("project_preference_modernization", SurveyValue::from(1)),
///     ("project_preference_water_treatment", SurveyValue::from(2)),
/// ]);
/// builder.add_response([("project_preference_water_treatment", SurveyValue::from(1))]);
/// let table = builder.build();
///
/// assert_eq!(table.num_responses(), 2);
/// assert!(table.get(1, "project_preference_modernization").is_null());
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<SurveyValue>>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds the answers of one respondent. When a field appears twice, the last value is kept.
    pub fn add_response<S, I>(&mut self, fields: I) -> &mut Builder
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, SurveyValue)>,
    {
        let mut row: Vec<SurveyValue> = vec![SurveyValue::Null; self.columns.len()];
        for (name, value) in fields {
            let idx = self.column_position(name.into());
            if idx >= row.len() {
                row.resize(idx + 1, SurveyValue::Null);
            }
            row[idx] = value;
        }
        self.rows.push(row);
        self
    }

    pub fn build(self) -> SurveyTable {
        let num_columns = self.columns.len();
        let rows = self
            .rows
            .into_iter()
            .map(|mut r| {
                r.resize(num_columns, SurveyValue::Null);
                r
            })
            .collect();
        SurveyTable {
            columns: self.columns,
            column_index: self.column_index,
            rows,
        }
    }

    fn column_position(&mut self, name: String) -> usize {
        if let Some(idx) = self.column_index.get(&name) {
            return *idx;
        }
        let idx = self.columns.len();
        self.columns.push(name.clone());
        self.column_index.insert(name, idx);
        idx
    }
}
