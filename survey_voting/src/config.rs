// ********* Input data structures ***********

use std::cmp::Ordering;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use crate::schema::ColumnFamily;

/// The content of one cell of a survey response.
///
/// Survey exports mix numbers, labels and blanks in the same table, so every
/// cell is kept in this loosely typed form and interpreted by each tally.
#[derive(PartialEq, Debug, Clone)]
pub enum SurveyValue {
    /// A missing answer: a JSON null, an empty cell or a field absent from the response.
    Null,
    Number(f64),
    Text(String),
}

static NULL_VALUE: SurveyValue = SurveyValue::Null;

impl SurveyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SurveyValue::Null)
    }

    /// The numeric value of the cell. Text that reads as a number is accepted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SurveyValue::Number(x) if !x.is_nan() => Some(*x),
            SurveyValue::Text(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
            _ => None,
        }
    }

    /// The value as a whole number, if it has no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number()
            .filter(|x| x.fract() == 0.0 && x.abs() < 9.0e15)
            .map(|x| x as i64)
    }

    /// The categorical label of the cell. Only text cells carry labels.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            SurveyValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The textual form of the cell, as written in the survey exports.
    /// Missing values read as `nan`.
    pub fn render(&self) -> String {
        match self {
            SurveyValue::Null => "nan".to_string(),
            SurveyValue::Number(x) => format!("{}", x),
            SurveyValue::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for SurveyValue {
    fn from(x: i64) -> Self {
        SurveyValue::Number(x as f64)
    }
}

impl From<i32> for SurveyValue {
    fn from(x: i32) -> Self {
        SurveyValue::Number(x as f64)
    }
}

impl From<f64> for SurveyValue {
    fn from(x: f64) -> Self {
        SurveyValue::Number(x)
    }
}

impl From<&str> for SurveyValue {
    fn from(s: &str) -> Self {
        SurveyValue::Text(s.to_string())
    }
}

impl From<String> for SurveyValue {
    fn from(s: String) -> Self {
        SurveyValue::Text(s)
    }
}

/// The survey responses, one row per respondent.
///
/// Columns are kept in the order in which they were first encountered. This
/// order is the tie-break order of every tally.
///
/// Tables are assembled with the [`crate::builder::Builder`].
#[derive(PartialEq, Debug, Clone, Default)]
pub struct SurveyTable {
    pub(crate) columns: Vec<String>,
    pub(crate) column_index: HashMap<String, usize>,
    pub(crate) rows: Vec<Vec<SurveyValue>>,
}

impl SurveyTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_responses(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    /// The cell of a response. Absent cells and absent columns read as `Null`.
    pub fn get(&self, row: usize, column: &str) -> &SurveyValue {
        self.column_index
            .get(column)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(*idx)))
            .unwrap_or(&NULL_VALUE)
    }

    /// All the cells of a column, in response order.
    pub fn column(&self, column: &str) -> Option<Vec<&SurveyValue>> {
        let idx = *self.column_index.get(column)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).unwrap_or(&NULL_VALUE))
                .collect(),
        )
    }

    /// The (project, column name) pairs of a column family, in column order.
    pub fn family(&self, family: &ColumnFamily) -> Vec<(String, String)> {
        self.columns
            .iter()
            .filter_map(|c| family.project_of(c).map(|p| (p.to_string(), c.clone())))
            .collect()
    }
}

// ******** Output data structures *********

/// The value of a metric for one project.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectScore<T> {
    pub project: String,
    pub value: T,
}

/// The outcome of a tally: one metric value per project.
#[derive(PartialEq, Debug, Clone)]
pub struct ResultTable<T> {
    pub metric: String,
    pub rows: Vec<ProjectScore<T>>,
}

impl<T> ResultTable<T> {
    pub fn new(metric: &str) -> ResultTable<T> {
        ResultTable {
            metric: metric.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, project: &str, value: T) {
        self.rows.push(ProjectScore {
            project: project.to_string(),
            value,
        });
    }

    pub fn get(&self, project: &str) -> Option<&T> {
        self.rows
            .iter()
            .find(|r| r.project == project)
            .map(|r| &r.value)
    }

    pub fn projects(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.project.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorts the rows, highest value first. The sort is stable: rows with equal
    /// values keep their current order.
    pub fn sort_descending_by<F>(&mut self, compare: F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.rows.sort_by(|a, b| compare(&b.value, &a.value));
    }
}

/// A single, unaggregated answer of one respondent for one project.
#[derive(PartialEq, Debug, Clone)]
pub struct Observation {
    pub project: String,
    pub value: f64,
}

/// Mean of a set of values. Undefined (`None`) when there are no values.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Errors that prevent a tally from completing.
///
/// Averages over no values are not errors: they are reported as `None`.
#[derive(PartialEq, Debug, Clone)]
pub enum TallyError {
    /// A required column is absent from the survey table.
    SchemaMismatch { column: String },
    /// A value that cannot be interpreted for this column.
    ValueOutOfDomain { column: String, value: String },
    /// An index pointing outside of the list it refers to.
    IndexOutOfRange {
        column: String,
        index: i64,
        len: usize,
    },
    /// The category registry does not define a required field.
    MissingRegistryField { field: String },
}

pub type TallyResult<T> = Result<T, TallyError>;

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::SchemaMismatch { column } => {
                write!(f, "missing required column {:?}", column)
            }
            TallyError::ValueOutOfDomain { column, value } => {
                write!(f, "value {:?} is not valid for column {:?}", value, column)
            }
            TallyError::IndexOutOfRange { column, index, len } => write!(
                f,
                "index {} in column {:?} is outside of the range 1..={}",
                index, column, len
            ),
            TallyError::MissingRegistryField { field } => {
                write!(f, "the category registry has no field {:?}", field)
            }
        }
    }
}
