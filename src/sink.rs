mod csv;
mod xlsx;

pub use self::csv::CsvSink;
pub use self::xlsx::XlsxSink;

use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};

use crate::report::Report;

/// Persists the three report tables under `stem`, returning what was written.
pub trait ReportSink {
    fn write(&self, report: &Report, stem: &Path) -> Result<PathBuf>;
}

/// Appends `suffix` to the last path component. Unlike `with_extension` a dot already in the
/// name is kept.
fn append_to_file_name(stem: &Path, suffix: &str) -> Result<PathBuf> {
    let file_name = stem
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("invalid output path: {}", stem.display()))?;
    Ok(stem.with_file_name(format!("{}{}", file_name, suffix)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match &self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        };
        write!(f, "{}", str)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("invalid output format: {}", s)),
        }
    }
}

impl OutputFormat {
    pub fn sink(&self) -> Box<dyn ReportSink + Send + Sync> {
        match self {
            OutputFormat::Xlsx => Box::new(XlsxSink),
            OutputFormat::Csv => Box::new(CsvSink),
        }
    }
}
