use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_voting::builder::Builder;
use survey_voting::knapsack::DEFAULT_VOTE_MARKER;
use survey_voting::majority::ModeTieBreak;
use survey_voting::*;

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::sink::FileSink;

pub mod calculations;
pub mod charts;
pub mod io_common;
pub mod io_csv;
pub mod io_json;
pub mod io_xlsx;
pub mod registry_reader;
pub mod sink;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Unexpected JSON layout in {path}: {message}"))]
    JsonShape { path: String, message: String },

    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet or no header row found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Unsupported cell on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },

    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing table {path}"))]
    CsvWrite { source: csv::Error, path: String },

    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference file {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the written tables and the reference: {paths:?}"))]
    ReferenceMismatch { paths: Vec<String> },

    #[snafu(display("Calculation {calculation} failed: {source}"))]
    Tally {
        source: TallyError,
        calculation: String,
    },

    #[snafu(display("Unknown input type {input_type}, expected json, csv or xlsx"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Unknown calculation {name}"))]
    UnknownCalculation { name: String },
    #[snafu(display("Unknown tie break {name}, expected first_seen, highest or lowest"))]
    UnknownTieBreak { name: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The calculations, in the order in which they run by default.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Calculation {
    BordaCount,
    ClarkGroves,
    RangeVoting,
    MajorityJudgment,
    MajorityJudgmentDistribution,
    PreferredProject,
    KnapsackVoting,
    PreferenceApproval,
}

impl Calculation {
    pub const ALL: [Calculation; 8] = [
        Calculation::BordaCount,
        Calculation::ClarkGroves,
        Calculation::RangeVoting,
        Calculation::MajorityJudgment,
        Calculation::MajorityJudgmentDistribution,
        Calculation::PreferredProject,
        Calculation::KnapsackVoting,
        Calculation::PreferenceApproval,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Calculation::BordaCount => "borda_count",
            Calculation::ClarkGroves => "clark_groves",
            Calculation::RangeVoting => "range_voting",
            Calculation::MajorityJudgment => "majority_judgment",
            Calculation::MajorityJudgmentDistribution => "majority_judgment_distribution",
            Calculation::PreferredProject => "preferred_project",
            Calculation::KnapsackVoting => "knapsack_voting",
            Calculation::PreferenceApproval => "preference_approval",
        }
    }

    pub fn from_name(name: &str) -> SurveyResult<Calculation> {
        Calculation::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .context(UnknownCalculationSnafu { name })
    }
}

impl Display for Calculation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Json,
    Csv,
    Xlsx,
}

/// Everything a run needs, validated from the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct Settings {
    pub input: String,
    pub input_type: InputType,
    pub out: PathBuf,
    pub show: bool,
    pub calculations: Vec<Calculation>,
    pub registry: Option<String>,
    pub excel_worksheet_name: Option<String>,
    pub tie_break: ModeTieBreak,
    pub marker: String,
    pub reference: Option<PathBuf>,
}

impl Settings {
    pub fn new(input: &str, out: &Path) -> Settings {
        Settings {
            input: input.to_string(),
            input_type: InputType::Json,
            out: out.to_path_buf(),
            show: false,
            calculations: Calculation::ALL.to_vec(),
            registry: None,
            excel_worksheet_name: None,
            tie_break: ModeTieBreak::default(),
            marker: DEFAULT_VOTE_MARKER.to_string(),
            reference: None,
        }
    }

    pub fn from_args(args: &Args) -> SurveyResult<Settings> {
        let input_type = match args.input_type.as_deref() {
            None | Some("json") => InputType::Json,
            Some("csv") => InputType::Csv,
            Some("xlsx") => InputType::Xlsx,
            Some(x) => return UnknownInputTypeSnafu { input_type: x }.fail(),
        };
        let tie_break = match args.mode_tie_break.as_deref() {
            None | Some("first_seen") => ModeTieBreak::FirstSeen,
            Some("highest") => ModeTieBreak::HighestGrade,
            Some("lowest") => ModeTieBreak::LowestGrade,
            Some(x) => return UnknownTieBreakSnafu { name: x }.fail(),
        };
        let calculations = if args.calculation.is_empty() {
            Calculation::ALL.to_vec()
        } else {
            args.calculation
                .iter()
                .map(|name| Calculation::from_name(name))
                .collect::<SurveyResult<Vec<Calculation>>>()?
        };
        let out = args.out.clone().unwrap_or_else(|| "scriptResults".to_string());
        let marker = args
            .marker
            .clone()
            .unwrap_or_else(|| DEFAULT_VOTE_MARKER.to_string());
        if marker.is_empty() {
            whatever!("The vote marker may not be empty");
        }
        Ok(Settings {
            input: args.input.clone(),
            input_type,
            out: PathBuf::from(out),
            show: args.show,
            calculations,
            registry: args.registry.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            tie_break,
            marker,
            reference: args.reference.as_ref().map(PathBuf::from),
        })
    }
}

pub fn read_survey(settings: &Settings) -> SurveyResult<SurveyTable> {
    let path = settings.input.as_str();
    match settings.input_type {
        InputType::Json => io_json::read_json(path),
        InputType::Csv => io_csv::read_csv(path),
        InputType::Xlsx => io_xlsx::read_xlsx(path, settings.excel_worksheet_name.as_deref()),
    }
}

/// Runs all the requested calculations. Reading the registry or the survey
/// may fail the whole run, but a failing calculation does not stop the
/// others: the failures are returned.
pub fn run_all(settings: &Settings) -> SurveyResult<Vec<(Calculation, SurveyError)>> {
    let registry = match &settings.registry {
        Some(path) => registry_reader::read_registry(path)?,
        None => CategoryRegistry::survey_defaults(),
    };
    let table = read_survey(settings)?;
    info!(
        "run_all: {} responses, calculations: {:?}",
        table.num_responses(),
        settings.calculations
    );

    let mut failures: Vec<(Calculation, SurveyError)> = Vec::new();
    for calc in settings.calculations.iter() {
        if let Err(e) = run_calculation_to_files(*calc, &table, &registry, settings) {
            warn!("Calculation {} failed: {}", calc, e);
            failures.push((*calc, e));
        }
    }
    Ok(failures)
}

fn run_calculation_to_files(
    calc: Calculation,
    table: &SurveyTable,
    registry: &CategoryRegistry,
    settings: &Settings,
) -> SurveyResult<()> {
    let dir = settings.out.join(calc.name());
    let mut sink = FileSink::new(&dir, settings.show)?;
    calculations::run_calculation(calc, table, registry, settings, &mut sink)?;

    // The reference tables, if provided for comparison
    if let Some(reference) = &settings.reference {
        check_reference(&reference.join(calc.name()), sink.written_tables())?;
    }
    Ok(())
}

/// Compares every written table with the file of the same name in the reference directory.
pub fn check_reference(reference_dir: &Path, written: &[PathBuf]) -> SurveyResult<()> {
    let mut mismatches: Vec<String> = Vec::new();
    for path in written.iter() {
        let file_name = match path.file_name() {
            Some(n) => n,
            None => whatever!("No file name in {}", path.display()),
        };
        let reference_path = reference_dir.join(file_name);
        debug!(
            "check_reference: {} against {}",
            path.display(),
            reference_path.display()
        );
        let expected = fs::read_to_string(&reference_path).context(ReadingReferenceSnafu {
            path: reference_path.display().to_string(),
        })?;
        let actual = fs::read_to_string(path).context(ReadingReferenceSnafu {
            path: path.display().to_string(),
        })?;
        if expected != actual {
            warn!(
                "Found differences between {} and the reference {}",
                path.display(),
                reference_path.display()
            );
            print_diff(expected.as_str(), actual.as_str(), "\n");
            mismatches.push(path.display().to_string());
        }
    }
    if !mismatches.is_empty() {
        return ReferenceMismatchSnafu { paths: mismatches }.fail();
    }
    Ok(())
}
