//! Preference approval voting.
//!
//! A respondent approves a project when rating it acceptable or excellent.
//! Approved projects then earn Borda points from the rank the respondent
//! gave them: with N ranked projects, rank `r` is worth `N - r + 1` points.
//! Rejected projects earn nothing, whatever their rank.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::*;
use crate::registry::CategoryRegistry;
use crate::schema::ColumnFamily;

pub const APPROVAL_SCORE: &str = "Approval Score";

#[derive(PartialEq, Debug, Clone)]
pub struct ApprovalScore {
    pub score: i64,
    /// Mean rank over the approving respondents. Undefined without approvals.
    pub average_rank: Option<f64>,
}

/// Number of approvals a project received at a given rank.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ApprovalBreakdown {
    pub project: String,
    pub rank: i64,
    pub count: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ApprovalResult {
    /// Scores per project, highest first.
    pub scores: ResultTable<ApprovalScore>,
    /// Approved votes only, in project order then rank order.
    pub breakdown: Vec<ApprovalBreakdown>,
}

pub fn preference_approval(table: &SurveyTable, registry: &CategoryRegistry) -> ApprovalResult {
    let columns = table.family(&ColumnFamily::PREFERENCE);
    let num_projects = columns.len() as i64;
    info!(
        "preference_approval: processing {} responses over {} projects",
        table.num_responses(),
        columns.len()
    );

    let mut scores: ResultTable<ApprovalScore> = ResultTable::new(APPROVAL_SCORE);
    let mut breakdown: Vec<ApprovalBreakdown> = Vec::new();

    for (project, pref_column) in columns.iter() {
        let rating_column = ColumnFamily::RATING.column_for(project);
        if !table.has_column(&rating_column) {
            debug!(
                "preference_approval: no rating column for {}, no approvals",
                project
            );
        }

        // Rank -> number of approving respondents
        let mut approved_ranks: BTreeMap<i64, u64> = BTreeMap::new();
        for row in 0..table.num_responses() {
            let approves = table
                .get(row, &rating_column)
                .as_label()
                .and_then(|l| registry.grade(l))
                .map(|g| g.approves())
                .unwrap_or(false);
            if !approves {
                continue;
            }
            match table.get(row, pref_column).as_integer() {
                Some(rank) => *approved_ranks.entry(rank).or_insert(0) += 1,
                None => debug!(
                    "preference_approval: row {}: approval of {} without a rank",
                    row, project
                ),
            }
        }

        let mut score: i64 = 0;
        let mut rank_sum: i64 = 0;
        let mut num_approvals: u64 = 0;
        for (rank, count) in approved_ranks.iter() {
            let weight = *count as i64;
            let points = num_projects.saturating_sub(*rank).saturating_add(1);
            score = score.saturating_add(points.saturating_mul(weight));
            rank_sum = rank_sum.saturating_add(rank.saturating_mul(weight));
            num_approvals += count;
            breakdown.push(ApprovalBreakdown {
                project: project.clone(),
                rank: *rank,
                count: *count,
            });
        }
        let average_rank = if num_approvals > 0 {
            Some(rank_sum as f64 / num_approvals as f64)
        } else {
            None
        };
        debug!(
            "preference_approval: {} -> score {}, average rank {:?}",
            project, score, average_rank
        );
        scores.push(
            project,
            ApprovalScore {
                score,
                average_rank,
            },
        );
    }
    scores.sort_descending_by(|a, b| a.score.cmp(&b.score));

    ApprovalResult { scores, breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn response(b: &mut Builder, answers: &[(&str, i64, &str)]) {
        let mut fields: Vec<(String, SurveyValue)> = Vec::new();
        for (project, rank, rating) in answers {
            fields.push((
                format!("project_preference_{}", project),
                SurveyValue::from(*rank),
            ));
            fields.push((
                format!("project_rating_{}", project),
                SurveyValue::from(*rating),
            ));
        }
        b.add_response(fields);
    }

    #[test]
    fn approved_votes_earn_points() {
        init_logger();
        let mut b = Builder::new();
        response(&mut b, &[("a", 1, "Exzellent."), ("b", 2, "Akzeptabel."), ("c", 3, "Inakzeptabel.")]);
        response(&mut b, &[("a", 2, "Akzeptabel."), ("b", 1, "Exzellent."), ("c", 3, "Inakzeptabel.")]);
        response(&mut b, &[("a", 1, "Exzellent."), ("b", 3, "Inakzeptabel."), ("c", 2, "Akzeptabel.")]);
        let res = preference_approval(&b.build(), &CategoryRegistry::survey_defaults());

        assert_eq!(res.scores.projects(), vec!["a", "b", "c"]);
        let a = res.scores.get("a").unwrap();
        assert_eq!(a.score, 3 + 2 + 3);
        assert_eq!(a.average_rank, Some(4.0 / 3.0));
        let b = res.scores.get("b").unwrap();
        assert_eq!(b.score, 2 + 3);
        assert_eq!(b.average_rank, Some(1.5));
        let c = res.scores.get("c").unwrap();
        assert_eq!(c.score, 2);
        assert_eq!(c.average_rank, Some(2.0));

        assert_eq!(
            res.breakdown,
            vec![
                ApprovalBreakdown {
                    project: "a".to_string(),
                    rank: 1,
                    count: 2
                },
                ApprovalBreakdown {
                    project: "a".to_string(),
                    rank: 2,
                    count: 1
                },
                ApprovalBreakdown {
                    project: "b".to_string(),
                    rank: 1,
                    count: 1
                },
                ApprovalBreakdown {
                    project: "b".to_string(),
                    rank: 2,
                    count: 1
                },
                ApprovalBreakdown {
                    project: "c".to_string(),
                    rank: 2,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn no_approvals_has_undefined_average() {
        let mut b = Builder::new();
        response(&mut b, &[("a", 1, "Inakzeptabel."), ("b", 2, "Akzeptabel.")]);
        response(&mut b, &[("a", 2, "Inakzeptabel."), ("b", 1, "Unbekannt")]);
        let res = preference_approval(&b.build(), &CategoryRegistry::survey_defaults());
        let a = res.scores.get("a").unwrap();
        assert_eq!(a.score, 0);
        assert_eq!(a.average_rank, None);
        assert_eq!(res.scores.get("b").unwrap().score, 1);
        assert_eq!(res.scores.projects(), vec!["b", "a"]);
        assert!(res.breakdown.iter().all(|r| r.project == "b"));
    }

    #[test]
    fn missing_rating_column() {
        let mut b = Builder::new();
        b.add_response([
            ("project_preference_a", SurveyValue::from(1)),
            ("project_preference_b", SurveyValue::from(2)),
            ("project_rating_b", SurveyValue::from("Exzellent.")),
        ]);
        let res = preference_approval(&b.build(), &CategoryRegistry::survey_defaults());
        assert_eq!(res.scores.len(), 2);
        assert_eq!(res.scores.get("a").unwrap().average_rank, None);
        assert_eq!(res.scores.get("b").unwrap().score, 1);
    }

    #[test]
    fn idempotent() {
        let mut b = Builder::new();
        response(&mut b, &[("a", 1, "Akzeptabel."), ("b", 2, "Exzellent.")]);
        response(&mut b, &[("a", 2, "Exzellent."), ("b", 1, "Inakzeptabel.")]);
        let t = b.build();
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(preference_approval(&t, &reg), preference_approval(&t, &reg));
    }

    #[test]
    fn huge_ranks_saturate() {
        let mut b = Builder::new();
        for _ in 0..2000 {
            response(&mut b, &[("a", -8_000_000_000_000_000, "Exzellent."), ("b", 1, "Akzeptabel.")]);
        }
        let res = preference_approval(&b.build(), &CategoryRegistry::survey_defaults());
        assert_eq!(res.scores.get("a").unwrap().score, i64::MAX);
        assert_eq!(res.scores.get("b").unwrap().score, 2 * 2000);
        assert_eq!(res.scores.projects(), vec!["a", "b"]);
    }
}
