use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use super::{append_to_file_name, ReportSink};
use crate::report::{Cell, Report, Table};

// Excel refuses longer cell strings, contract bytecode easily exceeds it
const MAX_CELL_CHARS: usize = 32_767;

pub struct XlsxSink;

fn write_cell(worksheet: &mut Worksheet, row: RowNum, col: ColNum, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Cell::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        Cell::Float(x) if x.is_finite() => {
            worksheet.write_number(row, col, *x)?;
        }
        Cell::Float(_) => {}
        Cell::Text(s) => {
            let text: String = s.chars().take(MAX_CELL_CHARS).collect();
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header: &Format) -> Result<()> {
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, ColNum::try_from(col)?, name, header)?;
    }

    for (row, cells) in table.rows.iter().enumerate() {
        let row = RowNum::try_from(row + 1)?;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, ColNum::try_from(col)?, cell)?;
        }
    }

    Ok(())
}

impl ReportSink for XlsxSink {
    fn write(&self, report: &Report, stem: &Path) -> Result<PathBuf> {
        let path = append_to_file_name(stem, ".xlsx")?;
        let header = Format::new().set_bold();
        let mut workbook = Workbook::new();

        for (name, table) in report.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            write_table(worksheet, table, &header)
                .with_context(|| format!("failed to write sheet {}", name))?;
        }

        workbook
            .save(&path)
            .with_context(|| format!("failed to save {}", path.display()))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn report() -> Report {
        let table = Table {
            columns: vec![
                "Hash".to_string(),
                "Value (BTC)".to_string(),
                "Spent".to_string(),
            ],
            rows: vec![
                vec![
                    Cell::Text("aa".to_string()),
                    Cell::Float(0.5),
                    Cell::Bool(true),
                ],
                vec![
                    Cell::Text("x".repeat(40_000)),
                    Cell::Float(f64::NAN),
                    Cell::Empty,
                ],
            ],
        };
        Report {
            summary: table.clone(),
            block: table,
            transaction: Table::default(),
        }
    }

    #[test]
    fn writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = XlsxSink.write(&report(), &dir.path().join("btc_test")).unwrap();

        assert_eq!(path, dir.path().join("btc_test.xlsx"));
        let bytes = fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn keeps_dots_in_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = XlsxSink
            .write(&Report::default(), &dir.path().join("btc_report.a"))
            .unwrap();
        let b = XlsxSink
            .write(&Report::default(), &dir.path().join("btc_report.b"))
            .unwrap();

        assert_eq!(a, dir.path().join("btc_report.a.xlsx"));
        assert_eq!(b, dir.path().join("btc_report.b.xlsx"));
        assert!(a.exists() && b.exists());
    }
}
