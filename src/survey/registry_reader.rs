use std::fs;

use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegistryField {
    pub name: String,
    pub labels: Vec<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IncomeMidpoint {
    pub label: String,
    /// Absent or null for the labels of undisclosed incomes.
    #[serde(default)]
    pub midpoint: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub fields: Vec<RegistryField>,
    #[serde(rename = "incomeMidpoints")]
    pub income_midpoints: Option<Vec<IncomeMidpoint>>,
}

impl RegistryConfig {
    /// Without income midpoints, the brackets of the Grünheide survey are used.
    pub fn into_registry(self) -> CategoryRegistry {
        let fields = self
            .fields
            .into_iter()
            .map(|f| (f.name, f.labels))
            .collect();
        let income_midpoints = match self.income_midpoints {
            Some(l) => l.into_iter().map(|m| (m.label, m.midpoint)).collect(),
            None => CategoryRegistry::default_income_midpoints(),
        };
        CategoryRegistry::new(fields, income_midpoints)
    }
}

pub fn read_registry(path: &str) -> SurveyResult<CategoryRegistry> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RegistryConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_registry: {:?}", config);
    let registry = config.into_registry();
    if registry.projects().is_err() {
        warn!(
            "read_registry: {} has no projects field, preferred_project will fail",
            path
        );
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_voting::{Grade, Income};

    #[test]
    fn parses_registry() {
        let js = r#"{
            "fields": [
                {"name": "projects", "labels": ["solar", "wind"]},
                {"name": "project_rating", "labels": ["bad", "ok", "great"]}
            ],
            "incomeMidpoints": [
                {"label": "low", "midpoint": 1000},
                {"label": "secret", "midpoint": null},
                {"label": "hidden"}
            ]
        }"#;
        let config: RegistryConfig = serde_json::from_str(js).unwrap();
        let reg = config.into_registry();
        assert_eq!(reg.project_name(2), Ok("wind"));
        assert_eq!(reg.grade("great"), Some(Grade::Excellent));
        assert_eq!(reg.grade("Exzellent."), None);
        assert_eq!(reg.income("low"), Income::Midpoint(1000.0));
        assert_eq!(reg.income("secret"), Income::Undisclosed);
        assert_eq!(reg.income("hidden"), Income::Undisclosed);
    }

    #[test]
    fn default_midpoints() {
        let config: RegistryConfig = serde_json::from_str(r#"{"fields": []}"#).unwrap();
        let reg = config.into_registry();
        assert_eq!(reg.income("• 40.000 - 59.999 €"), Income::Midpoint(50000.0));
    }
}
