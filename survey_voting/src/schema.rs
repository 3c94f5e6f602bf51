//! Naming conventions of the survey columns.
//!
//! Per-project answers are spread over families of columns that share a
//! prefix and a suffix around the project identifier, for example
//! `project_preference_<project>` or `<project>_support`.

/// A family of per-project columns.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnFamily {
    pub tag: &'static str,
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl ColumnFamily {
    /// Rank of the project, 1 being the most preferred.
    pub const PREFERENCE: ColumnFamily = ColumnFamily {
        tag: "preference",
        prefix: "project_preference_",
        suffix: "",
    };
    /// Categorical grade of the project.
    pub const RATING: ColumnFamily = ColumnFamily {
        tag: "rating",
        prefix: "project_rating_",
        suffix: "",
    };
    /// Numeric opinion score.
    pub const OPINION: ColumnFamily = ColumnFamily {
        tag: "opinion",
        prefix: "opinion_",
        suffix: "_rating",
    };
    /// Signed monetary support.
    pub const SUPPORT: ColumnFamily = ColumnFamily {
        tag: "support",
        prefix: "",
        suffix: "_support",
    };
    /// Free text repeating a vote marker once per vote.
    pub const VOTES: ColumnFamily = ColumnFamily {
        tag: "votes",
        prefix: "votes_for_",
        suffix: "",
    };

    /// The project identifier of a column, if the column belongs to this family.
    pub fn project_of<'a>(&self, column: &'a str) -> Option<&'a str> {
        let project = column
            .strip_prefix(self.prefix)?
            .strip_suffix(self.suffix)?;
        if project.is_empty() {
            None
        } else {
            Some(project)
        }
    }

    /// The name of the column of this family for a project.
    pub fn column_for(&self, project: &str) -> String {
        format!("{}{}{}", self.prefix, project, self.suffix)
    }
}

/// 1-based index into the list of projects of the registry.
pub const PREFERRED_PROJECT: &str = "preferred_project";

/// Income bracket label.
pub const ANNUAL_INCOME: &str = "annual_income";

/// General opinion on the factory, used to split Borda contributions by sentiment.
pub const FACTORY_SENTIMENT: &str = "opinion_on_tesla_factory_presence";
