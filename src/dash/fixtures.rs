//! A small survey, as an in-memory workbook or written to an xlsx file.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use survey_metrics::{Datum, Table};

use crate::dash::io_excel::SurveyWorkbook;
use crate::dash::schema::*;

pub struct SheetData {
    pub sheet: Sheet,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<Option<&'static str>>>,
}

pub fn survey_sheets() -> Vec<SheetData> {
    vec![
        SheetData {
            sheet: Sheet::UsageTime,
            header: vec![COL_USAGE_TIME, COL_DEPARTMENT],
            rows: vec![
                vec![Some("Mais de 1 ano"), Some("Vendas")],
                vec![Some("Entre 1 e 6 meses"), Some("Financeiro")],
                vec![Some("Mais de 1 ano"), Some("Vendas")],
                vec![Some("Menos de 1 mês"), Some("RH")],
                vec![Some("Mais de 1 ano"), None],
                vec![Some("Entre 1 e 6 meses"), Some("Operações")],
            ],
        },
        SheetData {
            sheet: Sheet::Frequency,
            header: vec![COL_FREQUENCY],
            rows: vec![
                vec![Some("Diariamente")],
                vec![Some("Mensalmente")],
                vec![Some("Semanalmente")],
                vec![Some("Mensalmente")],
                vec![Some("Diariamente")],
                vec![Some("Raramente")],
            ],
        },
        SheetData {
            sheet: Sheet::Department,
            header: vec![COL_DEPARTMENT, COL_AREA_USEFULNESS],
            rows: vec![
                vec![Some("Vendas"), Some("Muito útil")],
                vec![Some("Financeiro"), Some("Útil")],
                vec![Some("Vendas"), Some("Neutro")],
                vec![Some("RH"), Some("Útil")],
                vec![Some("Operações"), None],
                vec![Some("Vendas"), Some("Muito útil")],
            ],
        },
        SheetData {
            sheet: Sheet::ObjectiveFrequency,
            header: vec![COL_OBJECTIVE, COL_FREQUENCY],
            rows: vec![
                vec![Some("Controle"), Some("Diariamente")],
                vec![Some("Automação"), Some("Semanalmente")],
                vec![Some("Controle"), Some("Mensalmente")],
                vec![Some("Relatórios"), Some("Diariamente")],
            ],
        },
        SheetData {
            sheet: Sheet::EaseTime,
            header: vec![COL_EASE, COL_USAGE_TIME],
            rows: vec![
                vec![Some("Fácil"), Some("Mais de 1 ano")],
                vec![Some("Muito fácil"), Some("Menos de 1 mês")],
                vec![Some("Neutro"), Some("Mais de 1 ano")],
                vec![Some("Fácil"), Some("Entre 1 e 6 meses")],
            ],
        },
        SheetData {
            sheet: Sheet::UsefulnessTime,
            header: vec![COL_USEFULNESS, COL_USAGE_TIME],
            rows: vec![
                vec![Some("Útil"), Some("Mais de 1 ano")],
                vec![Some("Pouco útil"), Some("Menos de 1 mês")],
                vec![Some("Muito útil"), Some("Entre 1 e 6 meses")],
            ],
        },
        SheetData {
            sheet: Sheet::EaseComments,
            header: vec![COL_ANSWER],
            rows: vec![
                vec![Some("Muito simples de montar um fluxo")],
                vec![None],
                vec![Some("Interface intuitiva")],
                vec![Some("Poderia ter mais integrações")],
            ],
        },
        SheetData {
            sheet: Sheet::UsefulnessComments,
            header: vec![COL_ANSWER],
            rows: vec![
                vec![Some("Centraliza as solicitações")],
                vec![Some("Reduz retrabalho")],
            ],
        },
    ]
}

pub fn write_sheets(path: &Path, sheets: &[SheetData]) {
    let mut workbook = Workbook::new();
    for data in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(data.sheet.sheet_name()).unwrap();
        for (col, name) in data.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).unwrap();
        }
        for (idx, row) in data.rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    worksheet
                        .write_string((idx + 1) as u32, col as u16, *v)
                        .unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn write_survey_workbook(path: &Path) {
    write_sheets(path, &survey_sheets());
}

pub fn survey_workbook() -> SurveyWorkbook {
    let sheets = survey_sheets();
    SurveyWorkbook::build(Path::new("survey.xlsx"), |sheet| {
        let data = sheets.iter().find(|s| s.sheet == sheet).unwrap();
        let header: Vec<String> = data.header.iter().map(|h| h.to_string()).collect();
        let mut table = Table::new(sheet.key(), &header);
        for row in data.rows.iter() {
            table.push_row(
                row.iter()
                    .map(|c| c.map(|s| Datum::Text(s.to_string())))
                    .collect(),
            );
        }
        Ok(table)
    })
    .unwrap()
}

/// The same survey with no answers at all.
pub fn empty_workbook() -> SurveyWorkbook {
    SurveyWorkbook::build(Path::new("empty.xlsx"), |sheet| {
        let header: Vec<String> = sheet
            .required_columns()
            .iter()
            .map(|h| h.to_string())
            .collect();
        Ok(Table::new(sheet.key(), &header))
    })
    .unwrap()
}
