/*!

This is the long-form manual for `survey_voting` and `surveytally`.

## Survey columns

Every response is a record of fields. The per-project answers are spread over
families of columns, recognized by their names:

| column                        | content                                      |
|-------------------------------|----------------------------------------------|
| `project_preference_<project>`| rank of the project, 1 is the favourite      |
| `project_rating_<project>`    | grade: `Inakzeptabel.`, `Akzeptabel.` or `Exzellent.` |
| `opinion_<project>_rating`    | numeric opinion score                        |
| `<project>_support`           | signed amount of money, in euros             |
| `votes_for_<project>`         | free text, one marker word per vote          |

A few single columns are also used:
- `preferred_project`: 1-based index into the project list of the registry
- `annual_income`: income bracket label
- `opinion_on_tesla_factory_presence`: general sentiment, used to split the Borda contributions

Columns are read in the order in which they appear in the input. When two
projects have the same score, they keep this order in the results.

Cells may be missing. A missing cell is skipped by every tally, and an
average over no values is reported as an empty cell.

## Calculations

### `borda_count`

With N preference columns, a rank `r` earns `N - r + 1` points. Ranks are not
checked against `[1, N]`. Outputs the total points, the number of times each
project received each rank and, when the sentiment column is present, the
points given by positive and negative respondents.

### `range_voting`

Sum of the opinion scores of each project.

### `majority_judgment`

The most frequent grade of each project, best grades first. Grades that are
not part of the registry are ignored. When grades are equally frequent, the
choice follows `--mode-tie-break`:
- `first_seen` (default): the grade that was read first. Shuffling the
  responses may change the outcome.
- `highest`: the best of the tied grades
- `lowest`: the worst of the tied grades

### `majority_judgment_distribution`

The number of times each grade was given, plus the positive count
(acceptable and excellent) and the negative count (minus the unacceptable
count) used by diverging bar charts.

### `preference_approval`

Acceptable and excellent grades approve a project. Approved projects earn the
Borda points of their rank. The average rank is taken over the approvals only
and is empty when the project was never approved.

### `clark_groves`

Total of the support amounts of each project. The exploratory view lists, per
project, the average income of the respondents who did not grade it
unacceptable, the total opinion points and the average support. This
calculation fails when the `annual_income` column is missing.

### `knapsack_voting`

Number of occurrences of the marker (`--marker`, `Stimme` by default) in the
votes of each project, with the total support of the project as an overlay.

### `preferred_project`

Number of respondents that chose each project. An index that is outside of
the project list fails the calculation.

## Input formats

- `json` (default): a list of records, or an object of columns as written by
  `pandas.DataFrame.to_json`
- `csv`: the first line holds the column names
- `xlsx`: the first line of the worksheet holds the column names. Use
  `--excel-worksheet-name` when the workbook has several worksheets.

## Registry

The labels of the survey are built in. A different registry can be provided
with `--registry` as a JSON file:

```text
{
  "fields": [
    {"name": "projects", "labels": ["modernization", "water_treatment"]},
    {"name": "project_rating", "labels": ["Inakzeptabel.", "Akzeptabel.", "Exzellent."]}
  ],
  "incomeMidpoints": [
    {"label": "• 20.000 - 39.999 €", "midpoint": 30000},
    {"label": "• Bevorzuge keine Angabe", "midpoint": null}
  ]
}
```

The rating labels are listed from the worst to the best grade.

## Outputs

Each calculation writes in its own directory under `--out`:
- CSV tables, with a `Project` column first
- charts, as Vega-Lite specifications (`.vl.json`) embedding their data

With `--reference <dir>`, every CSV is compared with the file at the same
place in the reference directory and the differences are printed.

*/
