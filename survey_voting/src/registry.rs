use log::debug;

use crate::config::*;
use crate::schema::{FACTORY_SENTIMENT, PREFERRED_PROJECT};

/// Field holding the ordered list of project identifiers.
pub const PROJECTS_FIELD: &str = "projects";
/// Field holding the grades of the project ratings, from worst to best.
pub const RATING_FIELD: &str = "project_rating";
/// Field holding the income brackets.
pub const INCOME_FIELD: &str = "annual_income";

/// The three grades a project can receive, ordered from worst to best.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Grade {
    Unacceptable,
    Acceptable,
    Excellent,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Unacceptable, Grade::Acceptable, Grade::Excellent];

    /// Acceptable and excellent grades count as an approval.
    pub fn approves(self) -> bool {
        self != Grade::Unacceptable
    }

    /// The label used in the survey when no registry overrides it.
    pub fn default_label(self) -> &'static str {
        match self {
            Grade::Unacceptable => "Inakzeptabel.",
            Grade::Acceptable => "Akzeptabel.",
            Grade::Excellent => "Exzellent.",
        }
    }

    fn position(self) -> usize {
        match self {
            Grade::Unacceptable => 0,
            Grade::Acceptable => 1,
            Grade::Excellent => 2,
        }
    }
}

/// Decoding of an income bracket label.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Income {
    /// The midpoint of the bracket.
    Midpoint(f64),
    /// The respondent preferred not to say.
    Undisclosed,
    /// The label is not a known bracket.
    Unrecognized,
}

impl Income {
    pub fn midpoint(self) -> Option<f64> {
        match self {
            Income::Midpoint(x) => Some(x),
            _ => None,
        }
    }
}

/// The valid labels of the categorical survey fields.
///
/// The registry is built once when the program starts and then only read.
/// Every tally that decodes a label or an index receives it explicitly.
#[derive(PartialEq, Debug, Clone)]
pub struct CategoryRegistry {
    fields: Vec<(String, Vec<String>)>,
    income_midpoints: Vec<(String, Option<f64>)>,
}

const SURVEY_FIELDS: &[(&str, &[&str])] = &[
    ("age_group", &["18-24", "25-34", "35-44", "45-54", "55-64", "65+"]),
    ("gender", &["Männlich", "Weiblich", "Divers", "Keine Angabe"]),
    (
        "education_level",
        &[
            "Berufsausbildung",
            "Abitur/Fachabitur",
            "Bachelor",
            "Master/Diplom",
            "Promotion",
            "Realschulabschluss",
        ],
    ),
    (
        "occupation",
        &[
            "Angestellt",
            "Selbstständig",
            "In Ausbildung",
            "Arbeitslos",
            "Beamte/Beamter",
            "Im Ruhestand",
        ],
    ),
    (
        "awareness_of_tesla_factory",
        &[
            "Ja, ich habe davon gehört und kenne Details.",
            "Ja, ich habe davon gehört, aber kenne keine Details.",
            "Nein, ich habe noch nie davon gehört.",
        ],
    ),
    (
        "first_heard_about_tesla_factory",
        &[
            "Durch Nachrichten und Medienberichte.",
            "Durch eigene Recherchen im Internet.",
            "Ankündigung von Elon Musk zur Entscheidung wo in Europa die Gigafactory entsteht verfolgt",
        ],
    ),
    (
        FACTORY_SENTIMENT,
        &[
            "Sehr positiv.",
            "Eher positiv.",
            "Neutral.",
            "Eher negativ.",
            "Sehr negativ.",
        ],
    ),
    (
        "awareness_of_controversies",
        &[
            "Ja, sehr gut informiert.",
            "Ja, einigermaßen informiert.",
            "Nein, nur wenig informiert.",
        ],
    ),
    (
        "known_controversies",
        &[
            "Umweltschutz und Wasserverbrauch., Verkehr und Infrastruktur.",
            "Lärmbelästigung und Emissionen., Arbeitsbedingungen und lokale Beschäftigung.",
            "Keine der genannten.",
            "Umweltschutz und Wasserverbrauch., Verkehr und Infrastruktur., Lärmbelästigung und Emissionen., Arbeitsbedingungen und lokale Beschäftigung., Lügen und verdrehte Tatsachen",
        ],
    ),
    (
        "impact_on_local_economy",
        &[
            "Sehr positiv.",
            "Eher positiv.",
            "Neutral.",
            "Eher negativ.",
            "Sehr negativ.",
        ],
    ),
    (
        "impact_on_residence",
        &[
            "Ja, stark betroffen.",
            "Ja, etwas betroffen.",
            "Nein, nicht betroffen.",
        ],
    ),
    (
        "tesla_communication_transparency",
        &[
            "Sehr transparent und informativ.",
            "Eher transparent und informativ.",
            "Eher intransparent und uninformativ.",
            "Sehr intransparent und uninformativ.",
        ],
    ),
    (
        "participation_in_events",
        &[
            "Ja, mehrmals.",
            "Ja, einmal.",
            "Nein, aber ich würde gerne.",
            "Nein, und ich habe auch kein Interesse.",
        ],
    ),
    (
        "influence_on_opinion_on_ev",
        &[
            "Sehr stark, meine Meinung hat sich deutlich verändert.",
            "Ein wenig, meine Meinung hat sich etwas verändert.",
            "Kaum, meine Meinung hat sich kaum verändert.",
            "Überhaupt nicht, meine Meinung ist unverändert.",
        ],
    ),
    (
        INCOME_FIELD,
        &[
            "• < 20.000 €",
            "• 20.000 - 39.999 €",
            "• 40.000 - 59.999 €",
            "• 60.000 - 79.999 €",
            "• 80.000 - 99.999 €",
            "• 100.000 € oder mehr",
            "• Bevorzuge keine Angabe",
        ],
    ),
    (RATING_FIELD, &["Inakzeptabel.", "Akzeptabel.", "Exzellent."]),
    (
        PROJECTS_FIELD,
        &[
            "modernization",
            "water_treatment",
            "second_production_hall",
            "production_capacity_doubling",
            "battery_capacity_increase",
            "battery_recycling",
            "new_infrastructure",
            "employee_facilities",
            "storage_area_reduction",
            "portfolio_reduction",
        ],
    ),
];

const INCOME_MIDPOINTS: &[(&str, Option<f64>)] = &[
    ("• < 20.000 €", Some(10000.0)),
    ("• 20.000 - 39.999 €", Some(30000.0)),
    ("• 40.000 - 59.999 €", Some(50000.0)),
    ("• 60.000 - 79.999 €", Some(70000.0)),
    ("• 80.000 - 99.999 €", Some(90000.0)),
    ("• 100.000 € oder mehr", Some(110000.0)),
    ("• Bevorzuge keine Angabe", None),
];

impl CategoryRegistry {
    /// A registry with custom fields.
    ///
    /// `income_midpoints` maps each income label to the midpoint of its bracket,
    /// or to `None` for labels that mean the respondent did not disclose it.
    pub fn new(
        fields: Vec<(String, Vec<String>)>,
        income_midpoints: Vec<(String, Option<f64>)>,
    ) -> CategoryRegistry {
        CategoryRegistry {
            fields,
            income_midpoints,
        }
    }

    /// The labels of the survey on the Grünheide factory projects.
    pub fn survey_defaults() -> CategoryRegistry {
        let fields = SURVEY_FIELDS
            .iter()
            .map(|(name, labels)| {
                (
                    name.to_string(),
                    labels.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect();
        CategoryRegistry {
            fields,
            income_midpoints: CategoryRegistry::default_income_midpoints(),
        }
    }

    pub fn default_income_midpoints() -> Vec<(String, Option<f64>)> {
        INCOME_MIDPOINTS
            .iter()
            .map(|(label, midpoint)| (label.to_string(), *midpoint))
            .collect()
    }

    pub fn labels(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, labels)| labels.as_slice())
    }

    pub fn contains(&self, field: &str, label: &str) -> bool {
        self.labels(field)
            .map(|labels| labels.iter().any(|l| l == label))
            .unwrap_or(false)
    }

    /// The ordered list of project identifiers.
    pub fn projects(&self) -> TallyResult<&[String]> {
        self.labels(PROJECTS_FIELD)
            .ok_or_else(|| TallyError::MissingRegistryField {
                field: PROJECTS_FIELD.to_string(),
            })
    }

    /// Decodes a 1-based project index. Indexes outside of the list are rejected.
    pub fn project_name(&self, index: i64) -> TallyResult<&str> {
        let projects = self.projects()?;
        if index >= 1 && (index as usize) <= projects.len() {
            Ok(projects[(index - 1) as usize].as_str())
        } else {
            Err(TallyError::IndexOutOfRange {
                column: PREFERRED_PROJECT.to_string(),
                index,
                len: projects.len(),
            })
        }
    }

    /// The grade of a rating label. Labels are matched by their position in the
    /// rating field, worst first.
    pub fn grade(&self, label: &str) -> Option<Grade> {
        let labels = self.labels(RATING_FIELD)?;
        match labels.iter().position(|l| l == label) {
            Some(0) => Some(Grade::Unacceptable),
            Some(1) => Some(Grade::Acceptable),
            Some(2) => Some(Grade::Excellent),
            _ => {
                debug!("grade: unknown rating label {:?}", label);
                None
            }
        }
    }

    pub fn grade_label(&self, grade: Grade) -> &str {
        self.labels(RATING_FIELD)
            .and_then(|labels| labels.get(grade.position()))
            .map(|l| l.as_str())
            .unwrap_or_else(|| grade.default_label())
    }

    pub fn income(&self, label: &str) -> Income {
        match self.income_midpoints.iter().find(|(l, _)| l == label) {
            Some((_, Some(x))) => Income::Midpoint(*x),
            Some((_, None)) => Income::Undisclosed,
            None => Income::Unrecognized,
        }
    }

    /// Very positive, rather positive and neutral opinions on the factory.
    pub fn is_positive_sentiment(&self, label: &str) -> bool {
        self.labels(FACTORY_SENTIMENT)
            .map(|labels| labels.iter().take(3).any(|l| l == label))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_brackets() {
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(reg.income("• 20.000 - 39.999 €"), Income::Midpoint(30000.0));
        assert_eq!(reg.income("• Bevorzuge keine Angabe"), Income::Undisclosed);
        assert_eq!(reg.income("• Bevorzuge keine Angabe").midpoint(), None);
        assert_eq!(reg.income("viel"), Income::Unrecognized);
    }

    #[test]
    fn project_indexes_are_checked() {
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(reg.project_name(1), Ok("modernization"));
        assert_eq!(reg.project_name(10), Ok("portfolio_reduction"));
        assert_eq!(
            reg.project_name(11),
            Err(TallyError::IndexOutOfRange {
                column: PREFERRED_PROJECT.to_string(),
                index: 11,
                len: 10
            })
        );
        assert!(reg.project_name(0).is_err());
        assert!(reg.project_name(-1).is_err());
    }

    #[test]
    fn grades() {
        let reg = CategoryRegistry::survey_defaults();
        assert_eq!(reg.grade("Exzellent."), Some(Grade::Excellent));
        assert_eq!(reg.grade("Inakzeptabel."), Some(Grade::Unacceptable));
        assert_eq!(reg.grade("exzellent"), None);
        assert!(Grade::Excellent > Grade::Acceptable);
        assert!(!Grade::Unacceptable.approves());
        assert_eq!(reg.grade_label(Grade::Acceptable), "Akzeptabel.");
    }

    #[test]
    fn missing_projects_field() {
        let reg = CategoryRegistry::new(vec![], vec![]);
        assert!(matches!(
            reg.projects(),
            Err(TallyError::MissingRegistryField { .. })
        ));
        assert_eq!(reg.grade_label(Grade::Excellent), "Exzellent.");
    }

    #[test]
    fn sentiment() {
        let reg = CategoryRegistry::survey_defaults();
        assert!(reg.is_positive_sentiment("Neutral."));
        assert!(!reg.is_positive_sentiment("Eher negativ."));
        assert!(reg.contains("gender", "Divers"));
        assert!(!reg.contains("gender", "Neutral."));
    }
}
