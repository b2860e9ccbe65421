use log::{debug, error, info, warn};

use snafu::{prelude::*, Snafu};

use std::error::Error;
use std::fs;
use std::path::Path;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod cache;
pub mod dashboard;
pub mod export;
pub mod io_excel;
pub mod metrics;
pub mod pages;
pub mod schema;
pub mod server;

#[cfg(test)]
pub mod fixtures;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DashError {
    #[snafu(display("Survey workbook not found: {path}"))]
    MissingFile { path: String },
    #[snafu(display("Error reading the metadata of {path}"))]
    ReadingMetadata {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no sheet named {sheet:?}"))]
    MissingSheet { path: String, sheet: String },
    #[snafu(display("Sheet {sheet:?} has no column named {column:?}"))]
    MissingColumn { sheet: String, column: String },
    #[snafu(display("Error computing the survey metrics"))]
    Metrics {
        source: survey_metrics::MetricsError,
    },
    #[snafu(display("Error exporting {sheet} as CSV"))]
    CsvExport { source: csv::Error, sheet: String },
    #[snafu(display("Error flushing the CSV export of {sheet}"))]
    CsvFlush {
        source: std::io::Error,
        sheet: String,
    },
    #[snafu(display("Invalid page template {name}"))]
    Template {
        source: handlebars::TemplateError,
        name: String,
    },
    #[snafu(display("Error rendering page {name}"))]
    Render {
        source: handlebars::RenderError,
        name: String,
    },
    #[snafu(display("Error opening {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading or writing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the report to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot listen on {addr}"))]
    Bind {
        source: std::io::Error,
        addr: String,
    },
    #[snafu(display("HTTP server stopped"))]
    Serve { source: std::io::Error },
    #[snafu(display("Difference detected between the computed metrics and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// The message of an error followed by the messages of its causes.
pub fn error_chain(e: &dyn Error) -> String {
    let mut msg = e.to_string();
    let mut cur = e.source();
    while let Some(cause) = cur {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        cur = cause.source();
    }
    msg
}

impl IntoResponse for DashError {
    fn into_response(self) -> Response {
        let msg = error_chain(&self);
        error!("Request failed: {}", msg);
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
    }
}

fn read_reference(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_reference: {:?}", js);
    Ok(js)
}

/// Computes the metrics of the workbook and writes them as JSON.
///
/// When a reference file is given, the computed metrics must match it.
pub fn run_report(input: &str, out: Option<String>, reference: Option<String>) -> DashResult<()> {
    let workbook = io_excel::load_workbook(Path::new(input))?;
    let bundle = metrics::calculate_metrics(&workbook)?;
    let result_js = metrics::bundle_to_json(&bundle);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
            info!("Metrics written to {:?}", path);
        }
    }

    if let Some(reference_path) = reference {
        let reference_js = read_reference(&reference_path)?;
        let pretty_js_reference =
            serde_json::to_string_pretty(&reference_js).context(ParsingJsonSnafu {})?;
        if pretty_js_reference != pretty_js_stats {
            warn!("Found differences with the reference {:?}", reference_path);
            print_diff(
                pretty_js_reference.as_str(),
                pretty_js_stats.as_str(),
                "\n",
            );
            return ReferenceMismatchSnafu {
                path: reference_path,
            }
            .fail();
        }
        info!("Metrics match the reference {:?}", reference_path);
    }
    Ok(())
}
