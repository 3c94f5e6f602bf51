// Turns the outcome of every tally into output tables and charts.

use survey_voting::approval::preference_approval;
use survey_voting::borda::{borda_count, Sentiment};
use survey_voting::knapsack::knapsack_voting;
use survey_voting::majority::{grade_distribution, majority_judgment, ModeTieBreak};
use survey_voting::mechanism::clarke_groves;
use survey_voting::preferred::preferred_project;
use survey_voting::range::range_voting;

use crate::survey::charts::{ChartKind, ChartSpec};
use crate::survey::sink::{Cell, OutputTable, ResultSink};
use crate::survey::*;

const PROJECT: &str = "Project";

/// Runs one calculation and hands its tables and charts to the sink.
pub fn run_calculation(
    calc: Calculation,
    table: &SurveyTable,
    registry: &CategoryRegistry,
    settings: &Settings,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    info!("run_calculation: {}", calc);
    match calc {
        Calculation::BordaCount => borda_outputs(table, registry, sink),
        Calculation::ClarkGroves => clarke_groves_outputs(table, registry, sink),
        Calculation::RangeVoting => range_outputs(table, sink),
        Calculation::MajorityJudgment => majority_outputs(table, registry, settings.tie_break, sink),
        Calculation::MajorityJudgmentDistribution => distribution_outputs(table, registry, sink),
        Calculation::PreferredProject => preferred_outputs(table, registry, sink),
        Calculation::KnapsackVoting => knapsack_outputs(table, &settings.marker, sink),
        Calculation::PreferenceApproval => approval_outputs(table, registry, sink),
    }
}

/// The (Project, metric) table of a tally result.
fn totals_table<T, F>(name: &str, res: &ResultTable<T>, cell: F) -> OutputTable
where
    F: Fn(&T) -> Cell,
{
    let mut t = OutputTable::new(name, &[PROJECT, res.metric.as_str()]);
    for row in res.rows.iter() {
        t.push_row(vec![Cell::from(row.project.as_str()), cell(&row.value)]);
    }
    t
}

fn observations_table(name: &str, value_header: &str, obs: &[Observation]) -> OutputTable {
    let mut t = OutputTable::new(name, &[PROJECT, value_header]);
    for o in obs.iter() {
        t.push_row(vec![Cell::from(o.project.as_str()), Cell::from(o.value)]);
    }
    t
}

fn borda_outputs(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let res = borda_count(table, registry);

    let totals = totals_table("borda_count_results", &res.totals, |x| Cell::from(*x));
    sink.write_table(&totals)?;
    sink.render_chart(&ChartSpec::new(
        "borda_count_results_bar_plot",
        "Borda Count Results",
        ChartKind::Bar,
        &totals,
        PROJECT,
        &res.totals.metric,
    ))?;

    let mut ranks = OutputTable::new("borda_count_rank_frequency", &[PROJECT, "Rank", "Count"]);
    for r in res.rank_frequency.iter() {
        ranks.push_row(vec![
            Cell::from(r.project.as_str()),
            Cell::from(r.rank),
            Cell::from(r.count),
        ]);
    }
    sink.write_table(&ranks)?;
    sink.render_chart(
        &ChartSpec::new(
            "borda_count_results_dot_plot",
            "Distribution of Ranks for Each Project",
            ChartKind::Scatter,
            &ranks,
            PROJECT,
            "Rank",
        )
        .with_size("Count"),
    )?;
    sink.render_chart(
        &ChartSpec::new(
            "borda_count_results_heatmap",
            "Heatmap of Ranks for Each Project",
            ChartKind::Heatmap,
            &ranks,
            "Rank",
            PROJECT,
        )
        .with_color("Count"),
    )?;

    match &res.contributions {
        Some(contributions) => {
            let mut t = OutputTable::new(
                "borda_count_contributions",
                &[PROJECT, "Points", "Sentiment"],
            );
            for c in contributions.iter() {
                let sentiment = match c.sentiment {
                    Sentiment::Positive => "Positive",
                    Sentiment::Negative => "Negative",
                };
                t.push_row(vec![
                    Cell::from(c.project.as_str()),
                    Cell::from(c.points),
                    Cell::from(sentiment),
                ]);
            }
            sink.write_table(&t)?;
            sink.render_chart(
                &ChartSpec::new(
                    "borda_count_results_box_plot",
                    "Contribution Comparison by Sentiment for Each Project",
                    ChartKind::Box,
                    &t,
                    PROJECT,
                    "Points",
                )
                .with_color("Sentiment"),
            )?;
        }
        None => {
            debug!("borda_outputs: no sentiment column, skipping the contributions");
        }
    }
    Ok(())
}

fn clarke_groves_outputs(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let res = clarke_groves(table, registry).context(TallySnafu {
        calculation: Calculation::ClarkGroves.name(),
    })?;

    let totals = totals_table("clark_groves_mechanism_results", &res.totals, |x| {
        Cell::from(*x)
    });
    sink.write_table(&totals)?;
    sink.render_chart(&ChartSpec::new(
        "clark_groves_mechanism_results_plot",
        "Clark-Groves Mechanism: Total Support per Project",
        ChartKind::Bar,
        &totals,
        PROJECT,
        &res.totals.metric,
    ))?;

    let support = observations_table(
        "clark_groves_mechanism_support_distribution",
        "Support (€)",
        &res.observations,
    );
    sink.write_table(&support)?;
    sink.render_chart(&ChartSpec::new(
        "clark_groves_mechanism_box_plot",
        "Clark-Groves Mechanism: Distribution of Support per Project",
        ChartKind::Box,
        &support,
        PROJECT,
        "Support (€)",
    ))?;

    let mut bubbles = OutputTable::new(
        "clark_groves_mechanism_bubble_data",
        &[
            PROJECT,
            "Avg Income (€)",
            "Total Opinion Points",
            "Avg Support (€)",
            "Bubble Size",
        ],
    );
    for c in res.correlation.iter() {
        bubbles.push_row(vec![
            Cell::from(c.project.as_str()),
            Cell::from(c.avg_income),
            Cell::from(c.total_opinion_points),
            Cell::from(c.avg_support),
            Cell::from(c.magnitude()),
        ]);
    }
    sink.write_table(&bubbles)?;
    sink.render_chart(
        &ChartSpec::new(
            "clark_groves_mechanism_bubble_chart",
            "Clark-Groves Mechanism: Bubble Chart of Average Income vs. Opinion Points",
            ChartKind::Bubble,
            &bubbles,
            "Avg Income (€)",
            "Total Opinion Points",
        )
        .with_size("Bubble Size")
        .with_color(PROJECT),
    )?;
    Ok(())
}

fn range_outputs(table: &SurveyTable, sink: &mut dyn ResultSink) -> SurveyResult<()> {
    let res = range_voting(table);

    let totals = totals_table("range_voting_results", &res.totals, |x| Cell::from(*x));
    sink.write_table(&totals)?;
    sink.render_chart(&ChartSpec::new(
        "range_voting_results_plot",
        "Range Voting Results: Total Score per Project",
        ChartKind::Bar,
        &totals,
        PROJECT,
        &res.totals.metric,
    ))?;

    let scores = observations_table("range_voting_score_distribution", "Score", &res.scores);
    sink.write_table(&scores)?;
    sink.render_chart(&ChartSpec::new(
        "range_voting_results_box_plot",
        "Range Voting Results: Score Distribution per Project",
        ChartKind::Box,
        &scores,
        PROJECT,
        "Score",
    ))?;
    Ok(())
}

fn majority_outputs(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    tie_break: ModeTieBreak,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let res = majority_judgment(table, registry, tie_break);

    let results = totals_table("majority_judgment_results", &res, |g| match g {
        Some(grade) => Cell::from(registry.grade_label(*grade)),
        None => Cell::Empty,
    });
    sink.write_table(&results)?;

    // Grades are categorical: the chart plots their level.
    let mut levels = OutputTable::new(
        "majority_judgment_levels",
        &[PROJECT, res.metric.as_str(), "Grade Level"],
    );
    for row in res.rows.iter() {
        let (label, level) = match row.value {
            Some(grade) => (
                Cell::from(registry.grade_label(grade)),
                Cell::from(grade_level(grade)),
            ),
            None => (Cell::Empty, Cell::Empty),
        };
        levels.push_row(vec![Cell::from(row.project.as_str()), label, level]);
    }
    sink.render_chart(
        &ChartSpec::new(
            "majority_judgment_results_plot",
            "Majority Judgment Results: Majority Rating per Project",
            ChartKind::Bar,
            &levels,
            PROJECT,
            "Grade Level",
        )
        .with_color(&res.metric),
    )?;
    Ok(())
}

fn grade_level(grade: Grade) -> i64 {
    match grade {
        Grade::Unacceptable => 1,
        Grade::Acceptable => 2,
        Grade::Excellent => 3,
    }
}

fn distribution_outputs(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let dist = grade_distribution(table, registry);

    let mut headers: Vec<&str> = vec![PROJECT];
    for g in Grade::ALL.iter() {
        headers.push(registry.grade_label(*g));
    }
    headers.push("Positive");
    headers.push("Negative");
    let mut counts = OutputTable::new("majority_judgment_distribution", &headers);
    let mut diverging = OutputTable::new(
        "majority_judgment_diverging",
        &[PROJECT, "Rating", "Count"],
    );
    for d in dist.iter() {
        let mut row = vec![Cell::from(d.project.as_str())];
        for g in Grade::ALL.iter() {
            row.push(Cell::from(d.count(*g)));
        }
        row.push(Cell::from(d.positive()));
        row.push(Cell::from(d.negative()));
        counts.push_row(row);

        diverging.push_row(vec![
            Cell::from(d.project.as_str()),
            Cell::from("Positive"),
            Cell::from(d.positive()),
        ]);
        diverging.push_row(vec![
            Cell::from(d.project.as_str()),
            Cell::from("Negative"),
            Cell::from(d.negative()),
        ]);
    }
    sink.write_table(&counts)?;
    sink.render_chart(
        &ChartSpec::new(
            "majority_judgment_diverging_bar_chart",
            "Majority Judgment Results: Diverging Bar Chart of Ratings",
            ChartKind::HorizontalBar,
            &diverging,
            PROJECT,
            "Count",
        )
        .with_color("Rating"),
    )?;
    Ok(())
}

fn preferred_outputs(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let res = preferred_project(table, registry).context(TallySnafu {
        calculation: Calculation::PreferredProject.name(),
    })?;

    let votes = totals_table("preferred_project_votes", &res, |x| Cell::from(*x));
    sink.write_table(&votes)?;
    sink.render_chart(&ChartSpec::new(
        "preferred_project_votes_plot",
        "Votes by Preferred Project",
        ChartKind::Bar,
        &votes,
        PROJECT,
        &res.metric,
    ))?;
    sink.render_chart(&ChartSpec::new(
        "preferred_project_votes_pie_plot",
        "Votes by Preferred Project (Share)",
        ChartKind::Pie,
        &votes,
        PROJECT,
        &res.metric,
    ))?;
    Ok(())
}

fn knapsack_outputs(
    table: &SurveyTable,
    marker: &str,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let res = knapsack_voting(table, marker);

    let votes = totals_table("knapsack_voting_results", &res.votes, |x| Cell::from(*x));
    sink.write_table(&votes)?;
    let support = totals_table("knapsack_voting_support_overlay", &res.support, |x| {
        Cell::from(*x)
    });
    sink.write_table(&support)?;

    let mut overlay = OutputTable::new(
        "knapsack_voting_overlay",
        &[PROJECT, res.votes.metric.as_str(), res.support.metric.as_str()],
    );
    for (v, s) in res.votes.rows.iter().zip(res.support.rows.iter()) {
        overlay.push_row(vec![
            Cell::from(v.project.as_str()),
            Cell::from(v.value),
            Cell::from(s.value),
        ]);
    }
    sink.render_chart(
        &ChartSpec::new(
            "knapsack_voting_and_clark_groves_results_plot",
            "Knapsack Voting Results with Clark-Groves Mechanism Overlay",
            ChartKind::BarLine,
            &overlay,
            PROJECT,
            &res.votes.metric,
        )
        .with_y2(&res.support.metric),
    )?;
    Ok(())
}

fn approval_outputs(
    table: &SurveyTable,
    registry: &CategoryRegistry,
    sink: &mut dyn ResultSink,
) -> SurveyResult<()> {
    let res = preference_approval(table, registry);

    let mut scores = OutputTable::new(
        "preference_approval_voting_results",
        &[PROJECT, res.scores.metric.as_str(), "Average Rank"],
    );
    for row in res.scores.rows.iter() {
        scores.push_row(vec![
            Cell::from(row.project.as_str()),
            Cell::from(row.value.score),
            Cell::from(row.value.average_rank),
        ]);
    }
    sink.write_table(&scores)?;
    sink.render_chart(&ChartSpec::new(
        "preference_approval_voting_results_plot",
        "Preference Approval Voting Results: Approval Score per Project",
        ChartKind::Bar,
        &scores,
        PROJECT,
        &res.scores.metric,
    ))?;

    let mut breakdown = OutputTable::new(
        "preference_approval_voting_breakdown",
        &[PROJECT, "Rank", "Count"],
    );
    for b in res.breakdown.iter() {
        breakdown.push_row(vec![
            Cell::from(b.project.as_str()),
            Cell::from(b.rank),
            Cell::from(b.count),
        ]);
    }
    sink.write_table(&breakdown)?;
    sink.render_chart(
        &ChartSpec::new(
            "preference_approval_voting_results_stacked_bar_plot",
            "Preference Approval Voting Results: Approval Breakdown by Rank",
            ChartKind::StackedBar,
            &breakdown,
            PROJECT,
            "Count",
        )
        .with_color("Rank"),
    )?;
    Ok(())
}
