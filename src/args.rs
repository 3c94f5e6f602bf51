use clap::Parser;

/// This is a tabulation program for the project survey.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file containing the survey responses.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default json) The type of the input: json, csv or xlsx. See the manual for the details of each format.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (directory, default scriptResults) Where the tables and the charts are written. Each calculation
    /// writes in its own subdirectory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed as an argument, every table is also printed to the standard output.
    #[clap(long, takes_value = false)]
    pub show: bool,

    /// (repeatable, default all) The calculations to run: borda_count, clark_groves, range_voting,
    /// majority_judgment, majority_judgment_distribution, preferred_project, knapsack_voting,
    /// preference_approval.
    #[clap(long, value_parser)]
    pub calculation: Vec<String>,

    /// (file path, optional) A JSON file with the labels of the survey. The labels of the
    /// Grünheide survey are used by default.
    #[clap(long, value_parser)]
    pub registry: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default first_seen) How to choose between equally frequent grades in majority_judgment:
    /// first_seen, highest or lowest.
    #[clap(long, value_parser)]
    pub mode_tie_break: Option<String>,

    /// (default Stimme) The word that marks one vote in the knapsack answers.
    #[clap(long, value_parser)]
    pub marker: Option<String>,

    /// (directory, optional) A directory containing the expected tables. If provided, surveytally will
    /// check that every written table matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
