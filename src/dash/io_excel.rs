// Reading the survey workbook.

use log::{debug, info};

use snafu::prelude::*;

use std::path::{Path, PathBuf};

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use survey_metrics::{Datum, Table};

use crate::dash::schema::Sheet;
use crate::dash::*;

/// The eight response tables of a survey, as read from the workbook.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyWorkbook {
    pub path: PathBuf,
    // One table per sheet, in the order of Sheet::ALL.
    tables: Vec<Table>,
}

impl SurveyWorkbook {
    /// Assembles a workbook by producing the table of every sheet in turn.
    pub fn build<F>(path: &Path, mut read_sheet: F) -> DashResult<SurveyWorkbook>
    where
        F: FnMut(Sheet) -> DashResult<Table>,
    {
        let mut tables: Vec<Table> = Vec::with_capacity(Sheet::ALL.len());
        for sheet in Sheet::ALL {
            tables.push(read_sheet(sheet)?);
        }
        Ok(SurveyWorkbook {
            path: path.to_path_buf(),
            tables,
        })
    }

    pub fn table(&self, sheet: Sheet) -> &Table {
        &self.tables[sheet.index()]
    }

    /// All the tables, keyed by sheet.
    pub fn tables(&self) -> impl Iterator<Item = (Sheet, &Table)> {
        Sheet::ALL.iter().copied().zip(self.tables.iter())
    }
}

/// Opens the workbook and reads all the survey sheets.
///
/// Every expected sheet and column is checked here: a workbook that loads
/// successfully has all of them.
pub fn load_workbook(path: &Path) -> DashResult<SurveyWorkbook> {
    let display = path.display().to_string();
    ensure!(
        path.is_file(),
        MissingFileSnafu {
            path: display.clone()
        }
    );
    info!("Loading survey workbook {:?}", display);

    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: display.clone(),
    })?;
    debug!("load_workbook: sheets: {:?}", workbook.sheet_names());

    let res = SurveyWorkbook::build(path, |sheet| {
        let wrange = workbook
            .worksheet_range(sheet.sheet_name())
            .context(MissingSheetSnafu {
                path: display.clone(),
                sheet: sheet.sheet_name(),
            })?
            .context(OpeningExcelSnafu {
                path: display.clone(),
            })?;
        read_table(sheet, &wrange)
    })?;

    for (sheet, table) in res.tables() {
        debug!(
            "load_workbook: sheet {:?}: {} rows, columns {:?}",
            sheet.sheet_name(),
            table.len(),
            table.columns
        );
    }
    Ok(res)
}

/// Reads one sheet. The first row holds the column names.
pub fn read_table(sheet: Sheet, wrange: &Range<DataType>) -> DashResult<Table> {
    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(cells) => cells
            .iter()
            .enumerate()
            .map(|(idx, c)| column_name(idx, c))
            .collect(),
        None => Vec::new(),
    };
    debug!("read_table: {:?} header: {:?}", sheet.sheet_name(), header);

    for column in sheet.required_columns() {
        ensure!(
            header.iter().any(|h| h == column),
            MissingColumnSnafu {
                sheet: sheet.sheet_name(),
                column: *column,
            }
        );
    }

    let mut table = Table::new(sheet.key(), &header);
    for row in iter {
        table.push_row(row.iter().map(read_datum).collect());
    }
    Ok(table)
}

fn column_name(idx: usize, cell: &DataType) -> String {
    match read_datum(cell) {
        Some(d) => d.to_string(),
        None => format!("Unnamed: {}", idx),
    }
}

// Empty cells and empty strings are missing answers.
#[allow(unreachable_patterns)]
fn read_datum(cell: &DataType) -> Option<Datum> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) if s.is_empty() => None,
        DataType::String(s) => Some(Datum::Text(s.clone())),
        DataType::Int(i) => Some(Datum::Integer(*i)),
        DataType::Float(f) => Some(Datum::Float(*f)),
        // Dates are kept as their serial number.
        DataType::DateTime(f) => Some(Datum::Float(*f)),
        DataType::Bool(b) => Some(Datum::Boolean(*b)),
        DataType::Error(e) => Some(Datum::Text(format!("{:?}", e))),
        other => Some(Datum::Text(format!("{:?}", other))),
    }
}
