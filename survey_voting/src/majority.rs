//! Majority judgment over the `project_rating_<project>` grades.
//!
//! Two views are computed:
//! - the summary: the most frequent grade of each project,
//! - the distribution: how many times each grade was given, with the
//!   positive (acceptable + excellent) and negative (unacceptable) totals used
//!   by diverging bar charts.
//!
//! Labels that are not grades of the registry are ignored.
//!
//! When several grades are equally frequent, the outcome depends on the
//! [`ModeTieBreak`] policy. The default, `FirstSeen`, keeps the grade that was
//! encountered first while reading the responses: reordering the responses may
//! then change the result.

use log::{debug, info};

use crate::config::*;
use crate::registry::{CategoryRegistry, Grade};
use crate::schema::ColumnFamily;

pub const MAJORITY_RATING: &str = "Majority Rating";

/// How to choose between grades that are equally frequent.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum ModeTieBreak {
    /// The grade encountered first in response order.
    #[default]
    FirstSeen,
    HighestGrade,
    LowestGrade,
}

/// Number of times each grade was given to a project.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GradeDistribution {
    pub project: String,
    pub unacceptable: u64,
    pub acceptable: u64,
    pub excellent: u64,
}

impl GradeDistribution {
    pub fn count(&self, grade: Grade) -> u64 {
        match grade {
            Grade::Unacceptable => self.unacceptable,
            Grade::Acceptable => self.acceptable,
            Grade::Excellent => self.excellent,
        }
    }

    pub fn total(&self) -> u64 {
        self.unacceptable + self.acceptable + self.excellent
    }

    pub fn positive(&self) -> i64 {
        (self.excellent + self.acceptable) as i64
    }

    /// The unacceptable count with a flipped sign.
    pub fn negative(&self) -> i64 {
        -(self.unacceptable as i64)
    }
}

/// The grades of a column that are known to the registry, in response order.
fn grades_of(
    table: &SurveyTable,
    column: &str,
    registry: &CategoryRegistry,
) -> Vec<Grade> {
    (0..table.num_responses())
        .filter_map(|row| {
            let cell = table.get(row, column);
            let grade = cell.as_label().and_then(|l| registry.grade(l));
            if grade.is_none() && !cell.is_null() {
                debug!("grades_of: row {}: ignoring {:?} in {}", row, cell, column);
            }
            grade
        })
        .collect()
}

fn mode(grades: &[Grade], tie_break: ModeTieBreak) -> Option<Grade> {
    // Counts in order of first appearance.
    let mut counts: Vec<(Grade, u64)> = Vec::new();
    for g in grades {
        match counts.iter_mut().find(|(g2, _)| g2 == g) {
            Some((_, c)) => *c += 1,
            None => counts.push((*g, 1)),
        }
    }
    let max_count = counts.iter().map(|(_, c)| *c).max()?;
    let mut tied = counts
        .iter()
        .filter(|(_, c)| *c == max_count)
        .map(|(g, _)| *g);
    match tie_break {
        ModeTieBreak::FirstSeen => tied.next(),
        ModeTieBreak::HighestGrade => tied.max(),
        ModeTieBreak::LowestGrade => tied.min(),
    }
}

/// The most frequent grade of each project, best grades first.
/// A project without any valid grade has an undefined (`None`) rating and comes last.
pub fn majority_judgment(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    tie_break: ModeTieBreak,
) -> ResultTable<Option<Grade>> {
    let columns = table.family(&ColumnFamily::RATING);
    info!(
        "majority_judgment: processing {} responses over {} projects, tie break: {:?}",
        table.num_responses(),
        columns.len(),
        tie_break
    );
    let mut res: ResultTable<Option<Grade>> = ResultTable::new(MAJORITY_RATING);
    for (project, column) in columns.iter() {
        let grades = grades_of(table, column, registry);
        let m = mode(&grades, tie_break);
        debug!("majority_judgment: {} -> {:?}", project, m);
        res.push(project, m);
    }
    res.sort_descending_by(|a, b| a.cmp(b));
    res
}

/// The grade counts of each project, in column order.
pub fn grade_distribution(
    table: &SurveyTable,
    registry: &CategoryRegistry,
) -> Vec<GradeDistribution> {
    let columns = table.family(&ColumnFamily::RATING);
    info!(
        "grade_distribution: processing {} responses over {} projects",
        table.num_responses(),
        columns.len()
    );
    columns
        .iter()
        .map(|(project, column)| {
            let mut dist = GradeDistribution {
                project: project.clone(),
                unacceptable: 0,
                acceptable: 0,
                excellent: 0,
            };
            for g in grades_of(table, column, registry) {
                match g {
                    Grade::Unacceptable => dist.unacceptable += 1,
                    Grade::Acceptable => dist.acceptable += 1,
                    Grade::Excellent => dist.excellent += 1,
                }
            }
            dist
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ratings(rows: &[&[(&str, &str)]]) -> SurveyTable {
        let mut b = Builder::new();
        for r in rows {
            b.add_response(r.iter().map(|(p, label)| {
                let v = if label.is_empty() {
                    SurveyValue::Null
                } else {
                    SurveyValue::from(*label)
                };
                (format!("project_rating_{}", p), v)
            }));
        }
        b.build()
    }

    #[test]
    fn most_frequent_grade() {
        let t = ratings(&[
            &[("a", "Akzeptabel."), ("b", "Exzellent.")],
            &[("a", "Inakzeptabel."), ("b", "Exzellent.")],
            &[("a", "Inakzeptabel."), ("b", "Akzeptabel.")],
        ]);
        let res = majority_judgment(&t, &CategoryRegistry::survey_defaults(), ModeTieBreak::FirstSeen);
        assert_eq!(res.projects(), vec!["b", "a"]);
        assert_eq!(res.get("a"), Some(&Some(Grade::Unacceptable)));
        assert_eq!(res.get("b"), Some(&Some(Grade::Excellent)));
    }

    #[test]
    fn ties_depend_on_encounter_order() {
        init_logger();
        let reg = CategoryRegistry::survey_defaults();
        let first = ratings(&[&[("a", "Akzeptabel.")], &[("a", "Exzellent.")]]);
        let reversed = ratings(&[&[("a", "Exzellent.")], &[("a", "Akzeptabel.")]]);
        assert_eq!(
            majority_judgment(&first, &reg, ModeTieBreak::FirstSeen).get("a"),
            Some(&Some(Grade::Acceptable))
        );
        assert_eq!(
            majority_judgment(&reversed, &reg, ModeTieBreak::FirstSeen).get("a"),
            Some(&Some(Grade::Excellent))
        );
        for t in [&first, &reversed] {
            assert_eq!(
                majority_judgment(t, &reg, ModeTieBreak::HighestGrade).get("a"),
                Some(&Some(Grade::Excellent))
            );
            assert_eq!(
                majority_judgment(t, &reg, ModeTieBreak::LowestGrade).get("a"),
                Some(&Some(Grade::Acceptable))
            );
        }
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let t = ratings(&[
            &[("a", "Super!"), ("b", "")],
            &[("a", "Super!"), ("b", "")],
            &[("a", "Akzeptabel."), ("b", "")],
        ]);
        let reg = CategoryRegistry::survey_defaults();
        let res = majority_judgment(&t, &reg, ModeTieBreak::FirstSeen);
        assert_eq!(res.projects(), vec!["a", "b"]);
        assert_eq!(res.get("a"), Some(&Some(Grade::Acceptable)));
        assert_eq!(res.get("b"), Some(&None));
    }

    #[test]
    fn distribution_counts() {
        let t = ratings(&[
            &[("a", "Akzeptabel."), ("b", "Exzellent.")],
            &[("a", "Inakzeptabel."), ("b", "")],
            &[("a", "Inakzeptabel."), ("b", "ok")],
            &[("a", "Exzellent."), ("b", "Exzellent.")],
        ]);
        let dist = grade_distribution(&t, &CategoryRegistry::survey_defaults());
        assert_eq!(dist.len(), 2);
        let a = &dist[0];
        assert_eq!((a.unacceptable, a.acceptable, a.excellent), (2, 1, 1));
        assert_eq!(a.total(), 4);
        assert_eq!(a.positive(), 2);
        assert_eq!(a.negative(), -2);
        let b = &dist[1];
        assert_eq!(b.project, "b");
        assert_eq!(b.count(Grade::Excellent), 2);
        assert_eq!(b.count(Grade::Unacceptable), 0);
        assert_eq!(b.total(), 2);
        assert_eq!(b.negative(), 0);
    }

    #[test]
    fn idempotent() {
        let t = ratings(&[
            &[("a", "Akzeptabel."), ("b", "Exzellent.")],
            &[("a", "Exzellent."), ("b", "Inakzeptabel.")],
        ]);
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(
            majority_judgment(&t, &reg, ModeTieBreak::FirstSeen),
            majority_judgment(&t, &reg, ModeTieBreak::FirstSeen)
        );
        assert_eq!(grade_distribution(&t, &reg), grade_distribution(&t, &reg));
    }
}
