//! Tally of the single `preferred_project` choice.

use log::{debug, info};

use crate::config::*;
use crate::registry::CategoryRegistry;
use crate::schema::PREFERRED_PROJECT;

pub const VOTES: &str = "Votes";

/// Number of respondents that chose each project, most chosen first.
///
/// The column holds 1-based indexes into the project list of the registry.
/// Only the projects chosen at least once appear, and equal counts keep the
/// registry order. Missing answers are skipped, but an index that is not a
/// whole number or that falls outside of the list fails the whole tally.
pub fn preferred_project(
    table: &SurveyTable,
    registry: &CategoryRegistry,
) -> TallyResult<ResultTable<u64>> {
    if !table.has_column(PREFERRED_PROJECT) {
        return Err(TallyError::SchemaMismatch {
            column: PREFERRED_PROJECT.to_string(),
        });
    }
    let projects = registry.projects()?;
    info!(
        "preferred_project: processing {} responses over {} projects",
        table.num_responses(),
        projects.len()
    );

    let mut counts: Vec<u64> = vec![0; projects.len()];
    for row in 0..table.num_responses() {
        let cell = table.get(row, PREFERRED_PROJECT);
        if cell.is_null() {
            continue;
        }
        let index = cell.as_integer().ok_or_else(|| TallyError::ValueOutOfDomain {
            column: PREFERRED_PROJECT.to_string(),
            value: cell.render(),
        })?;
        let name = registry.project_name(index)?;
        debug!("preferred_project: row {}: {} -> {}", row, index, name);
        counts[(index - 1) as usize] += 1;
    }

    let mut res: ResultTable<u64> = ResultTable::new(VOTES);
    for (project, count) in projects.iter().zip(counts) {
        if count > 0 {
            res.push(project, count);
        }
    }
    res.sort_descending_by(|a, b| a.cmp(b));
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn choices(values: &[SurveyValue]) -> SurveyTable {
        let mut b = Builder::new();
        for v in values {
            b.add_response([(PREFERRED_PROJECT, v.clone())]);
        }
        b.build()
    }

    #[test]
    fn counts_choices() {
        let t = choices(&[
            SurveyValue::from(2),
            SurveyValue::from(6),
            SurveyValue::Null,
            SurveyValue::from(6),
            SurveyValue::from(1),
        ]);
        let res = preferred_project(&t, &CategoryRegistry::survey_defaults()).unwrap();
        assert_eq!(
            res.projects(),
            vec!["battery_recycling", "modernization", "water_treatment"]
        );
        assert_eq!(res.get("battery_recycling"), Some(&2));
        let total: u64 = res.rows.iter().map(|r| r.value).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn out_of_range_index() {
        let reg = CategoryRegistry::survey_defaults();
        let t = choices(&[SurveyValue::from(1), SurveyValue::from(11)]);
        assert_eq!(
            preferred_project(&t, &reg),
            Err(TallyError::IndexOutOfRange {
                column: PREFERRED_PROJECT.to_string(),
                index: 11,
                len: 10
            })
        );
        let t = choices(&[SurveyValue::from(0)]);
        assert!(preferred_project(&t, &reg).is_err());
    }

    #[test]
    fn not_an_index() {
        let t = choices(&[SurveyValue::from("Wasser")]);
        assert_eq!(
            preferred_project(&t, &CategoryRegistry::survey_defaults()),
            Err(TallyError::ValueOutOfDomain {
                column: PREFERRED_PROJECT.to_string(),
                value: "Wasser".to_string()
            })
        );
    }

    #[test]
    fn missing_column() {
        let mut b = Builder::new();
        b.add_response([("annual_income", SurveyValue::Null)]);
        assert!(matches!(
            preferred_project(&b.build(), &CategoryRegistry::survey_defaults()),
            Err(TallyError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn idempotent() {
        let t = choices(&[SurveyValue::from(3), SurveyValue::from(1), SurveyValue::from(3)]);
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(preferred_project(&t, &reg), preferred_project(&t, &reg));
    }
}
