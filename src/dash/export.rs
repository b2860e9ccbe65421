// CSV export of the raw response tables.

use log::debug;

use snafu::prelude::*;

use survey_metrics::Table;

use crate::dash::*;

/// The table as comma-separated text: the header, then one line per row.
/// Missing answers are empty fields.
pub fn table_to_csv(table: &Table) -> DashResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.columns)
        .context(CsvExportSnafu { sheet: &table.name })?;
    for row in table.rows.iter() {
        let fields: Vec<String> = row
            .iter()
            .map(|c| c.as_ref().map(|d| d.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&fields)
            .context(CsvExportSnafu { sheet: &table.name })?;
    }
    let res = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context(CsvFlushSnafu { sheet: &table.name })?;
    debug!(
        "table_to_csv: {:?}: {} rows, {} bytes",
        table.name,
        table.len(),
        res.len()
    );
    Ok(res)
}
