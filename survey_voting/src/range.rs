//! Range voting: the sum of the `opinion_<project>_rating` scores.

use log::{debug, info};

use crate::config::*;
use crate::schema::ColumnFamily;

pub const TOTAL_SCORE: &str = "Total Score";

#[derive(PartialEq, Debug, Clone)]
pub struct RangeResult {
    /// Sum of the scores per project, highest first.
    pub totals: ResultTable<f64>,
    /// Every numeric score, in project order then response order.
    pub scores: Vec<Observation>,
}

pub fn range_voting(table: &SurveyTable) -> RangeResult {
    let columns = table.family(&ColumnFamily::OPINION);
    info!(
        "range_voting: processing {} responses over {} projects",
        table.num_responses(),
        columns.len()
    );
    let mut totals: ResultTable<f64> = ResultTable::new(TOTAL_SCORE);
    let mut scores: Vec<Observation> = Vec::new();
    for (project, column) in columns.iter() {
        let mut total = 0.0;
        for row in 0..table.num_responses() {
            if let Some(score) = table.get(row, column).as_number() {
                total += score;
                scores.push(Observation {
                    project: project.clone(),
                    value: score,
                });
            }
        }
        debug!("range_voting: {} -> {}", project, total);
        totals.push(project, total);
    }
    totals.sort_descending_by(|a, b| a.total_cmp(b));
    RangeResult { totals, scores }
}
