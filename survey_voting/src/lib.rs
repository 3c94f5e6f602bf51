/*!
Tallies of a survey in which respondents rank, grade, score, fund and vote
for a list of projects.

The input is a [`SurveyTable`]: one row per respondent, with columns named
after the projects (see [`schema`]). Each tally is a pure function of the
table, and of the [`CategoryRegistry`] when it has to decode labels or indexes:

- [`borda::borda_count`] ranks projects by their Borda points
- [`range::range_voting`] sums the numeric opinion scores
- [`majority::majority_judgment`] and [`majority::grade_distribution`] look at the categorical grades
- [`approval::preference_approval`] counts Borda points of approved projects only
- [`mechanism::clarke_groves`] sums the monetary support
- [`knapsack::knapsack_voting`] counts vote markers in free text answers
- [`preferred::preferred_project`] counts the single preferred project

```
use survey_voting::builder::Builder;
use survey_voting::borda::borda_count;
use survey_voting::{CategoryRegistry, SurveyValue};

let mut builder = Builder::new();
builder.add_response([
    ("project_preference_modernization", SurveyValue::from(1)),
    ("project_preference_water_treatment", SurveyValue::from(2)),
]);
builder.add_response([
    ("project_preference_modernization", SurveyValue::from(2)),
    ("project_preference_water_treatment", SurveyValue::from(1)),
]);
let table = builder.build();

let res = borda_count(&table, &CategoryRegistry::survey_defaults());
assert_eq!(res.totals.get("modernization"), Some(&3));
```

See the [manual] for the details of every calculation.
*/

mod config;

pub mod approval;
pub mod borda;
pub mod builder;
pub mod knapsack;
pub mod majority;
pub mod manual;
pub mod mechanism;
pub mod preferred;
pub mod range;
pub mod registry;
pub mod schema;

pub use crate::config::*;
pub use crate::registry::{CategoryRegistry, Grade, Income};
pub use crate::schema::ColumnFamily;
