use chrono::{DateTime, Local};

use crate::error::ExportError;
use crate::record::{ProductRecord, ResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

/// Header row plus one row per record.
pub fn to_csv(records: &[ProductRecord]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        wtr.write_record(["name", "price", "description", "rating", "review_count"])?;
    }
    for r in records {
        wtr.serialize(r)?;
    }
    let bytes = wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn from_csv(text: &str) -> Result<ResultSet, ExportError> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let rows = rdr
        .deserialize::<ProductRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Pretty-printed array of objects.
pub fn to_json(records: &[ProductRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn from_json(text: &str) -> Result<ResultSet, ExportError> {
    Ok(serde_json::from_str(text)?)
}

pub fn render(records: &[ProductRecord], format: Format) -> Result<String, ExportError> {
    match format {
        Format::Csv => to_csv(records),
        Format::Json => to_json(records),
    }
}

/// `laptops_YYYYMMDD_HHMMSS.<ext>`
pub fn default_file_name(format: Format, now: DateTime<Local>) -> String {
    format!("laptops_{}.{}", now.format("%Y%m%d_%H%M%S"), format.extension())
}
