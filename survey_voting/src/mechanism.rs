//! Clarke-Groves style mechanism over the `<project>_support` amounts.
//!
//! The primary result is the total signed support of every project. The
//! exploratory correlation view relates, per project, the average income of
//! the respondents that did not reject it, the total opinion points it
//! received and its average support.

use log::{debug, info};

use crate::config::*;
use crate::registry::{CategoryRegistry, Grade};
use crate::schema::{ColumnFamily, ANNUAL_INCOME};

pub const TOTAL_SUPPORT: &str = "Total Support (€)";

/// One point of the correlation view.
#[derive(PartialEq, Debug, Clone)]
pub struct SupportCorrelation {
    pub project: String,
    /// Mean income midpoint of the non-rejecting respondents that disclosed it.
    pub avg_income: Option<f64>,
    /// Sum of the opinion scores over all respondents, 0 without an opinion column.
    pub total_opinion_points: f64,
    pub avg_support: Option<f64>,
}

impl SupportCorrelation {
    /// Non-negative size of the point in a bubble chart.
    pub fn magnitude(&self) -> Option<f64> {
        self.avg_support.map(f64::abs)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct MechanismResult {
    /// Total support per project, highest first.
    pub totals: ResultTable<f64>,
    /// Every numeric support amount, in project order then response order.
    pub observations: Vec<Observation>,
    /// One entry per support column, in column order.
    pub correlation: Vec<SupportCorrelation>,
}

/// Sum of the support amounts of each project, highest first. Missing amounts are skipped.
pub fn total_support(table: &SurveyTable) -> ResultTable<f64> {
    let mut res: ResultTable<f64> = ResultTable::new(TOTAL_SUPPORT);
    for (project, column) in table.family(&ColumnFamily::SUPPORT).iter() {
        let total: f64 = support_values(table, column).iter().sum();
        debug!("total_support: {} -> {}", project, total);
        res.push(project, total);
    }
    res.sort_descending_by(|a, b| a.total_cmp(b));
    res
}

pub fn support_observations(table: &SurveyTable) -> Vec<Observation> {
    table
        .family(&ColumnFamily::SUPPORT)
        .iter()
        .flat_map(|(project, column)| {
            support_values(table, column)
                .into_iter()
                .map(move |value| Observation {
                    project: project.clone(),
                    value,
                })
        })
        .collect()
}

fn support_values(table: &SurveyTable, column: &str) -> Vec<f64> {
    (0..table.num_responses())
        .filter_map(|row| table.get(row, column).as_number())
        .collect()
}

/// The correlation view. Fails when the income column is absent.
///
/// A respondent rejects a project only with an explicit unacceptable grade:
/// missing ratings, unknown labels and a missing rating column all count as
/// not rejecting.
pub fn support_correlation(
    table: &SurveyTable,
    registry: &CategoryRegistry,
) -> TallyResult<Vec<SupportCorrelation>> {
    if !table.has_column(ANNUAL_INCOME) {
        return Err(TallyError::SchemaMismatch {
            column: ANNUAL_INCOME.to_string(),
        });
    }

    let incomes: Vec<Option<f64>> = (0..table.num_responses())
        .map(|row| {
            table
                .get(row, ANNUAL_INCOME)
                .as_label()
                .and_then(|l| registry.income(l).midpoint())
        })
        .collect();

    let mut res: Vec<SupportCorrelation> = Vec::new();
    for (project, column) in table.family(&ColumnFamily::SUPPORT).iter() {
        let rating_column = ColumnFamily::RATING.column_for(project);
        let supporter_incomes: Vec<f64> = incomes
            .iter()
            .enumerate()
            .filter(|(row, _)| {
                let grade = table
                    .get(*row, &rating_column)
                    .as_label()
                    .and_then(|l| registry.grade(l));
                grade != Some(Grade::Unacceptable)
            })
            .filter_map(|(_, income)| *income)
            .collect();

        let opinion_column = ColumnFamily::OPINION.column_for(project);
        let total_opinion_points: f64 = (0..table.num_responses())
            .filter_map(|row| table.get(row, &opinion_column).as_number())
            .sum();

        let entry = SupportCorrelation {
            project: project.clone(),
            avg_income: mean(&supporter_incomes),
            total_opinion_points,
            avg_support: mean(&support_values(table, column)),
        };
        debug!("support_correlation: {:?}", entry);
        res.push(entry);
    }
    Ok(res)
}

pub fn clarke_groves(
    table: &SurveyTable,
    registry: &CategoryRegistry,
) -> TallyResult<MechanismResult> {
    info!(
        "clarke_groves: processing {} responses",
        table.num_responses()
    );
    let totals = total_support(table);
    let observations = support_observations(table);
    let correlation = support_correlation(table, registry)?;
    Ok(MechanismResult {
        totals,
        observations,
        correlation,
    })
}
