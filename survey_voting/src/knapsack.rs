//! Knapsack voting over the free-text `votes_for_<project>` answers.
//!
//! Respondents distribute a budget of votes in free text. Every
//! non-overlapping occurrence of the marker in a response counts as one vote,
//! whatever number is written next to it: "2 Stimmen" is a single vote, while
//! "1 Stimme, 1 Stimme" is two.

use log::{debug, info};

use crate::config::*;
use crate::mechanism::total_support;
use crate::schema::ColumnFamily;

/// Marker of the survey on the Grünheide factory projects.
pub const DEFAULT_VOTE_MARKER: &str = "Stimme";

pub const TOTAL_VOTES: &str = "Total Votes";

#[derive(PartialEq, Debug, Clone)]
pub struct KnapsackResult {
    /// Votes per project, highest first.
    pub votes: ResultTable<u64>,
    /// Total support of each project, in the order of `votes`. Projects without
    /// a support column have no value.
    pub support: ResultTable<Option<f64>>,
}

/// Number of non-overlapping occurrences of the marker in the textual form of a value.
pub fn count_marker(value: &SurveyValue, marker: &str) -> u64 {
    if marker.is_empty() {
        return 0;
    }
    value.render().matches(marker).count() as u64
}

pub fn knapsack_voting(table: &SurveyTable, marker: &str) -> KnapsackResult {
    let columns = table.family(&ColumnFamily::VOTES);
    info!(
        "knapsack_voting: processing {} responses over {} projects, marker {:?}",
        table.num_responses(),
        columns.len(),
        marker
    );
    let mut votes: ResultTable<u64> = ResultTable::new(TOTAL_VOTES);
    for (project, column) in columns.iter() {
        let total: u64 = (0..table.num_responses())
            .map(|row| count_marker(table.get(row, column), marker))
            .sum();
        debug!("knapsack_voting: {} -> {} votes", project, total);
        votes.push(project, total);
    }
    votes.sort_descending_by(|a, b| a.cmp(b));

    let totals = total_support(table);
    let mut support: ResultTable<Option<f64>> = ResultTable::new(&totals.metric);
    for row in votes.rows.iter() {
        support.push(&row.project, totals.get(&row.project).copied());
    }

    KnapsackResult { votes, support }
}
