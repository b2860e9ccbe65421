use clap::{Parser, Subcommand};

/// Dashboards and metrics for the Process Intelligence survey.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The Excel workbook holding the survey answers, one worksheet per question.
    #[clap(
        short,
        long,
        value_parser,
        env = "SURVEY_WORKBOOK",
        default_value = "maze_process-intelligence.xlsx"
    )]
    pub input: String,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serves the survey page, with one JSON endpoint per chart.
    Serve {
        /// (address) Where to listen.
        #[clap(long, value_parser, default_value = "0.0.0.0:5001")]
        bind: String,
        /// Reads the workbook again on every request.
        #[clap(long, takes_value = false)]
        no_cache: bool,
    },
    /// Serves the interactive dashboard, with CSV exports.
    Dashboard {
        /// (address) Where to listen.
        #[clap(long, value_parser, default_value = "0.0.0.0:8501")]
        bind: String,
        /// Reads the workbook again on every request.
        #[clap(long, takes_value = false)]
        no_cache: bool,
    },
    /// Computes the metrics once and prints them in JSON format.
    Report {
        /// (file path, 'stdout' or empty) If specified, the metrics are written to the given location.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path) A reference file containing the expected metrics in JSON format. If provided, the
        /// computed metrics must match it.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
}
