// Destination of the tables and charts produced by the calculations.

use log::{debug, info};
use snafu::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::survey::charts::{to_vega_lite, ChartSpec};
use crate::survey::*;

/// A cell of an output table. Undefined aggregates are `Empty`.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(x) => format!("{}", x),
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> JSValue {
        match self {
            Cell::Empty => JSValue::Null,
            Cell::Int(i) => json!(i),
            Cell::Float(x) => json!(x),
            Cell::Text(s) => json!(s),
        }
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<u64> for Cell {
    fn from(i: u64) -> Self {
        Cell::Int(i as i64)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

impl From<Option<f64>> for Cell {
    fn from(x: Option<f64>) -> Self {
        x.map(Cell::Float).unwrap_or(Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct OutputTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl OutputTable {
    pub fn new(name: &str, headers: &[&str]) -> OutputTable {
        OutputTable {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// The rows as JSON objects keyed by the headers, in header order.
    pub fn to_records(&self) -> Vec<JSValue> {
        self.rows
            .iter()
            .map(|row| {
                let mut record: JSMap<String, JSValue> = JSMap::new();
                for (header, cell) in self.headers.iter().zip(row.iter()) {
                    record.insert(header.clone(), cell.to_json());
                }
                JSValue::Object(record)
            })
            .collect()
    }
}

pub trait ResultSink {
    fn write_table(&mut self, table: &OutputTable) -> SurveyResult<()>;
    fn render_chart(&mut self, chart: &ChartSpec) -> SurveyResult<()>;
}

/// Writes the tables as CSV files and the charts as Vega-Lite files in a directory.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    show: bool,
    written_tables: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir: &Path, show: bool) -> SurveyResult<FileSink> {
        fs::create_dir_all(dir).context(WritingOutputSnafu {
            path: dir.display().to_string(),
        })?;
        Ok(FileSink {
            dir: dir.to_path_buf(),
            show,
            written_tables: Vec::new(),
        })
    }

    pub fn written_tables(&self) -> &[PathBuf] {
        &self.written_tables
    }
}

impl ResultSink for FileSink {
    fn write_table(&mut self, table: &OutputTable) -> SurveyResult<()> {
        let path = self.dir.join(format!("{}.csv", table.name));
        let path_s = path.display().to_string();
        debug!("write_table: {} rows to {}", table.rows.len(), path_s);
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&path)
            .context(CsvWriteSnafu {
                path: path_s.clone(),
            })?;
        wtr.write_record(&table.headers).context(CsvWriteSnafu {
            path: path_s.clone(),
        })?;
        for row in table.rows.iter() {
            wtr.write_record(row.iter().map(Cell::render))
                .context(CsvWriteSnafu {
                    path: path_s.clone(),
                })?;
        }
        wtr.flush().context(WritingOutputSnafu {
            path: path_s.clone(),
        })?;

        if self.show {
            println!("{}", table.name);
            println!("{}", table.headers.join(" | "));
            for row in table.rows.iter() {
                let cells: Vec<String> = row.iter().map(Cell::render).collect();
                println!("{}", cells.join(" | "));
            }
            println!();
        }
        info!("wrote {}", path_s);
        self.written_tables.push(path);
        Ok(())
    }

    fn render_chart(&mut self, chart: &ChartSpec) -> SurveyResult<()> {
        let path = self.dir.join(format!("{}.vl.json", chart.name));
        let path_s = path.display().to_string();
        let js = to_vega_lite(chart);
        let pretty_js = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {
            path: path_s.clone(),
        })?;
        fs::write(&path, pretty_js).context(WritingOutputSnafu {
            path: path_s.clone(),
        })?;
        info!("wrote {}", path_s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::charts::ChartKind;

    #[test]
    fn cells() {
        assert_eq!(Cell::from(13.0).render(), "13");
        assert_eq!(Cell::from(4.0 / 3.0).render(), "1.3333333333333333");
        assert_eq!(Cell::from(None::<f64>).render(), "");
        assert_eq!(Cell::from(-2_i64).render(), "-2");
        assert_eq!(Cell::from(None::<f64>).to_json(), JSValue::Null);
    }

    #[test]
    fn writes_files() {
        let dir = std::env::temp_dir().join("surveytally-sink-test");
        let mut sink = FileSink::new(&dir, false).unwrap();
        let mut t = OutputTable::new("results", &["Project", "Total Score"]);
        t.push_row(vec![Cell::from("a, b"), Cell::from(2.5)]);
        t.push_row(vec![Cell::from("c"), Cell::Empty]);
        sink.write_table(&t).unwrap();
        let chart = ChartSpec::new("results_plot", "Scores", ChartKind::Bar, &t, "Project", "Total Score");
        sink.render_chart(&chart).unwrap();

        let content = fs::read_to_string(dir.join("results.csv")).unwrap();
        assert_eq!(content, "Project,Total Score\n\"a, b\",2.5\nc,\n");
        assert_eq!(sink.written_tables(), &[dir.join("results.csv")]);
        let js: JSValue =
            serde_json::from_str(&fs::read_to_string(dir.join("results_plot.vl.json")).unwrap()).unwrap();
        assert_eq!(js["data"]["values"][0]["Project"], json!("a, b"));
    }
}
