use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{append_to_file_name, ReportSink};
use crate::report::{Report, Table};

/// One csv file per sheet, named `{stem}_{sheet}.csv`.
pub struct CsvSink;

fn sheet_path(stem: &Path, sheet: &str) -> Result<PathBuf> {
    append_to_file_name(stem, &format!("_{}.csv", sheet.to_lowercase()))
}

fn write_table(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    // a header without columns would be written as a lone `""` line
    if !table.columns.is_empty() {
        writer.write_record(&table.columns)?;
    }
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

impl ReportSink for CsvSink {
    fn write(&self, report: &Report, stem: &Path) -> Result<PathBuf> {
        for (name, table) in report.sheets() {
            let path = sheet_path(stem, name)?;
            write_table(&path, table)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        Ok(stem
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")))
    }
}
