//! Borda count over the `project_preference_<project>` ranks.
//!
//! With N ranked projects, a rank `r` is worth `N - r + 1` points: the first
//! choice gets N points and the last one a single point. Ranks are trusted as
//! given and are not clamped to `[1, N]`. Totals saturate instead of
//! overflowing on absurd ranks.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::*;
use crate::registry::CategoryRegistry;
use crate::schema::{ColumnFamily, FACTORY_SENTIMENT};

pub const TOTAL_POINTS: &str = "Total Points";

/// General attitude of a respondent towards the factory.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
}

/// How many times a project received a given rank.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankFrequency {
    pub project: String,
    pub rank: i64,
    pub count: u64,
}

/// The points one respondent gave to one project.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Contribution {
    pub project: String,
    pub points: i64,
    pub sentiment: Sentiment,
}

#[derive(PartialEq, Debug, Clone)]
pub struct BordaResult {
    /// Total points per project, highest first.
    pub totals: ResultTable<i64>,
    /// Project x rank cross-tabulation, in project order then rank order.
    pub rank_frequency: Vec<RankFrequency>,
    /// Individual contributions, only when the sentiment column is present.
    pub contributions: Option<Vec<Contribution>>,
}

pub fn borda_count(table: &SurveyTable, registry: &CategoryRegistry) -> BordaResult {
    let columns = table.family(&ColumnFamily::PREFERENCE);
    let max_points = columns.len() as i64;
    info!(
        "borda_count: processing {} responses over {} projects",
        table.num_responses(),
        columns.len()
    );

    let has_sentiment = table.has_column(FACTORY_SENTIMENT);
    let mut contributions: Vec<Contribution> = Vec::new();
    let mut frequencies: BTreeMap<(usize, i64), u64> = BTreeMap::new();
    let mut totals: ResultTable<i64> = ResultTable::new(TOTAL_POINTS);

    for (pidx, (project, column)) in columns.iter().enumerate() {
        let mut points: i64 = 0;
        for row in 0..table.num_responses() {
            let rank = match table.get(row, column).as_integer() {
                Some(rank) => rank,
                None => {
                    debug!(
                        "borda_count: row {}: skipping rank {:?} of {}",
                        row,
                        table.get(row, column),
                        project
                    );
                    continue;
                }
            };
            let awarded = max_points.saturating_sub(rank).saturating_add(1);
            points = points.saturating_add(awarded);
            *frequencies.entry((pidx, rank)).or_insert(0) += 1;

            if has_sentiment {
                let sentiment = match table.get(row, FACTORY_SENTIMENT).as_label() {
                    Some(label) if registry.is_positive_sentiment(label) => Sentiment::Positive,
                    _ => Sentiment::Negative,
                };
                contributions.push(Contribution {
                    project: project.clone(),
                    points: awarded,
                    sentiment,
                });
            }
        }
        debug!("borda_count: {} -> {} points", project, points);
        totals.push(project, points);
    }
    totals.sort_descending_by(|a, b| a.cmp(b));

    let rank_frequency = frequencies
        .into_iter()
        .map(|((pidx, rank), count)| RankFrequency {
            project: columns[pidx].0.clone(),
            rank,
            count,
        })
        .collect();

    BordaResult {
        totals,
        rank_frequency,
        contributions: if has_sentiment {
            Some(contributions)
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ranks(rows: &[&[(&str, i64)]]) -> SurveyTable {
        let mut b = Builder::new();
        for r in rows {
            b.add_response(
                r.iter()
                    .map(|(p, rank)| (format!("project_preference_{}", p), SurveyValue::from(*rank))),
            );
        }
        b.build()
    }

    #[test]
    fn two_projects_three_respondents() {
        init_logger();
        let t = ranks(&[
            &[("A", 1), ("B", 2)],
            &[("A", 2), ("B", 1)],
            &[("A", 1), ("B", 2)],
        ]);
        let res = borda_count(&t, &CategoryRegistry::survey_defaults());
        assert_eq!(res.totals.projects(), vec!["A", "B"]);
        assert_eq!(res.totals.get("A"), Some(&5));
        assert_eq!(res.totals.get("B"), Some(&4));
        assert_eq!(res.contributions, None);
        assert_eq!(
            res.rank_frequency,
            vec![
                RankFrequency {
                    project: "A".to_string(),
                    rank: 1,
                    count: 2
                },
                RankFrequency {
                    project: "A".to_string(),
                    rank: 2,
                    count: 1
                },
                RankFrequency {
                    project: "B".to_string(),
                    rank: 1,
                    count: 1
                },
                RankFrequency {
                    project: "B".to_string(),
                    rank: 2,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn complete_ballot_awards_triangular_number() {
        let t = ranks(&[&[("a", 3), ("b", 1), ("c", 4), ("d", 2)]]);
        let res = borda_count(&t, &CategoryRegistry::survey_defaults());
        let total: i64 = res.totals.rows.iter().map(|r| r.value).sum();
        assert_eq!(total, 4 * 5 / 2);
        assert_eq!(res.totals.projects(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn out_of_range_ranks_are_not_clamped() {
        let t = ranks(&[&[("a", 5), ("b", 1)]]);
        let res = borda_count(&t, &CategoryRegistry::survey_defaults());
        assert_eq!(res.totals.get("a"), Some(&-2));
        assert_eq!(res.totals.get("b"), Some(&2));
    }

    #[test]
    fn missing_ranks_are_skipped() {
        let mut b = Builder::new();
        b.add_response([
            ("project_preference_a", SurveyValue::from(1)),
            ("project_preference_b", SurveyValue::Null),
        ]);
        b.add_response([
            ("project_preference_a", SurveyValue::from("zwei")),
            ("project_preference_b", SurveyValue::from(1)),
        ]);
        let res = borda_count(&b.build(), &CategoryRegistry::survey_defaults());
        assert_eq!(res.totals.get("a"), Some(&2));
        assert_eq!(res.totals.get("b"), Some(&2));
        assert_eq!(res.rank_frequency.len(), 2);
    }

    #[test]
    fn contributions_by_sentiment() {
        let mut b = Builder::new();
        b.add_response([
            ("project_preference_a", SurveyValue::from(1)),
            ("project_preference_b", SurveyValue::from(2)),
            (FACTORY_SENTIMENT, SurveyValue::from("Neutral.")),
        ]);
        b.add_response([
            ("project_preference_a", SurveyValue::from(2)),
            ("project_preference_b", SurveyValue::from(1)),
            (FACTORY_SENTIMENT, SurveyValue::Null),
        ]);
        let res = borda_count(&b.build(), &CategoryRegistry::survey_defaults());
        let contributions = res.contributions.unwrap();
        assert_eq!(contributions.len(), 4);
        assert_eq!(
            contributions[0],
            Contribution {
                project: "a".to_string(),
                points: 2,
                sentiment: Sentiment::Positive
            }
        );
        assert_eq!(contributions[1].sentiment, Sentiment::Negative);
        assert_eq!(contributions[1].points, 1);
    }

    #[test]
    fn idempotent() {
        let t = ranks(&[&[("a", 2), ("b", 1)], &[("a", 1), ("b", 2)]]);
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(borda_count(&t, &reg), borda_count(&t, &reg));
    }

    #[test]
    fn huge_ranks_saturate() {
        let rows: Vec<[(&str, i64); 2]> = (0..2000)
            .map(|_| [("a", -8_000_000_000_000_000), ("b", 1)])
            .collect();
        let refs: Vec<&[(&str, i64)]> = rows.iter().map(|r| &r[..]).collect();
        let res = borda_count(&ranks(&refs), &CategoryRegistry::survey_defaults());
        assert_eq!(res.totals.get("a"), Some(&i64::MAX));
        assert_eq!(res.totals.get("b"), Some(&(2 * 2000)));
    }
}
